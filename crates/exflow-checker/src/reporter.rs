//! Diagnostics for unhandled checked exceptions.

use crate::analyzer::ExceptionAnalyzer;
use crate::sites::UnhandledSite;
use crate::sort::sort_most_specific_first;
use exflow_common::Diagnostic;
use exflow_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use exflow_solver::TypeId;
use exflow_syntax::{NodeData, NodeIndex};

/// Turns [`UnhandledSite`]s into [`Diagnostic`]s.
pub struct UnhandledExceptionReporter<'r, 'a> {
    analyzer: &'r ExceptionAnalyzer<'a>,
}

impl<'r, 'a> UnhandledExceptionReporter<'r, 'a> {
    pub fn new(analyzer: &'r ExceptionAnalyzer<'a>) -> Self {
        UnhandledExceptionReporter { analyzer }
    }

    /// One diagnostic per site under `root` leaving exceptions unhandled
    /// up to `top`.
    pub fn report(&self, root: NodeIndex, top: NodeIndex) -> Vec<Diagnostic> {
        self.analyzer
            .collect_unhandled_sites(root, top)
            .iter()
            .map(|site| self.diagnostic_for(site))
            .collect()
    }

    pub fn diagnostic_for(&self, site: &UnhandledSite) -> Diagnostic {
        let arena = self.analyzer.arena();
        let types = self.analyzer.types();

        let mut ordered: Vec<TypeId> = site.exceptions.iter().collect();
        sort_most_specific_first(types, &mut ordered);
        let names: Vec<String> = ordered.iter().map(|&ty| types.display(ty)).collect();
        let joined = names.join(", ");

        let (template, code) = if site.from_closer {
            (
                diagnostic_messages::UNHANDLED_CLOSER_EXCEPTION,
                diagnostic_codes::UNHANDLED_CLOSER_EXCEPTION,
            )
        } else if names.len() == 1 {
            (
                diagnostic_messages::UNHANDLED_EXCEPTION,
                diagnostic_codes::UNHANDLED_EXCEPTION,
            )
        } else {
            (
                diagnostic_messages::UNHANDLED_EXCEPTIONS,
                diagnostic_codes::UNHANDLED_EXCEPTIONS,
            )
        };

        let file = arena
            .source_file_of(site.site)
            .map(|file| file.file_name.clone())
            .unwrap_or_default();
        let (start, length) = arena
            .get(site.site)
            .map_or((0, 0), |node| (node.pos, node.width()));

        let mut diagnostic = Diagnostic::error(
            file.clone(),
            start,
            length,
            format_message(template, &[&joined]),
            code,
        );

        // A rethrown catch parameter points back at the try block it came from.
        if let Some(try_block) = self.rethrow_origin(site.site) {
            if let Some(node) = arena.get(try_block) {
                for name in &names {
                    diagnostic = diagnostic.with_related(
                        file.clone(),
                        node.pos,
                        node.width(),
                        format_message(diagnostic_messages::THROWN_HERE, &[name]),
                    );
                }
            }
        }
        diagnostic
    }

    fn rethrow_origin(&self, site: NodeIndex) -> Option<NodeIndex> {
        let arena = self.analyzer.arena();
        let throw = match arena.get(site).map(|node| &node.data) {
            Some(NodeData::Throw(throw)) => throw,
            _ => return None,
        };
        let (clause, _) = self.analyzer.caught_parameter(throw.expression)?;
        arena
            .get(arena.parent_of(clause))
            .and_then(|node| arena.get_try(node))
            .map(|try_data| try_data.try_block)
    }
}
