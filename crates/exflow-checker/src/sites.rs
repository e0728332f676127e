//! Per-site collection of unhandled exceptions over a whole subtree.

use crate::analyzer::ExceptionAnalyzer;
use crate::exception_set::ExceptionSet;
use exflow_syntax::{NodeData, NodeIndex, NodeKind};

/// What a single throwing construct leaves unhandled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnhandledSite {
    /// A `Call`, `New`, `Throw`, `MethodRef` or `ResourceVariable` node.
    pub site: NodeIndex,
    /// The site is a try resource and the exceptions come from closing it.
    pub from_closer: bool,
    pub exceptions: ExceptionSet,
}

impl<'a> ExceptionAnalyzer<'a> {
    /// Checked exceptions the construct at `site` throws by itself, operands
    /// excluded, that nothing up to `top` handles.
    pub fn own_unhandled_exceptions(&self, site: NodeIndex, top: NodeIndex) -> ExceptionSet {
        let Some(node) = self.arena.get(site) else {
            return ExceptionSet::new();
        };
        let own = match &node.data {
            NodeData::Call(_) | NodeData::New(_) | NodeData::MethodRef(_) => {
                self.call_site_exceptions(site)
            }
            NodeData::Throw(throw) => {
                let mut set = ExceptionSet::new();
                set.extend_from(self.types, self.throw_statement_types(throw.expression, 0));
                set
            }
            NodeData::ResourceVariable(_) => self.closer_exceptions(site),
            _ if self.is_resource_expression(site) => self.closer_exceptions(site),
            _ => ExceptionSet::new(),
        };
        self.unhandled_among(site, own, top)
    }

    /// Every site under `root` (inclusive) with at least one unhandled
    /// checked exception, in source order. A resource expression that is
    /// itself a call yields two sites: closing it, then the call.
    ///
    /// Bodies of lambdas and classes are visited too; their exceptions are
    /// judged against the lambda's functional method or the enclosing
    /// method, not against `root`'s context.
    #[tracing::instrument(level = "debug", skip(self), fields(root = root.0, top = top.0))]
    pub fn collect_unhandled_sites(&self, root: NodeIndex, top: NodeIndex) -> Vec<UnhandledSite> {
        let mut sites = Vec::new();
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let Some(node) = self.arena.get(idx) else {
                continue;
            };
            let closes = matches!(node.data, NodeData::ResourceVariable(_))
                || self.is_resource_expression(idx);
            if closes {
                let exceptions = self.unhandled_closer_exceptions(idx, top);
                if !exceptions.is_empty() {
                    sites.push(UnhandledSite {
                        site: idx,
                        from_closer: true,
                        exceptions,
                    });
                }
            }
            if matches!(
                node.data,
                NodeData::Call(_) | NodeData::New(_) | NodeData::MethodRef(_) | NodeData::Throw(_)
            ) {
                let exceptions = self.own_unhandled_exceptions(idx, top);
                if !exceptions.is_empty() {
                    sites.push(UnhandledSite {
                        site: idx,
                        from_closer: false,
                        exceptions,
                    });
                }
            }
            stack.extend(self.arena.children(idx).into_iter().rev());
        }
        sites
    }

    /// An expression used directly as a try resource (`try (existing) {}`).
    fn is_resource_expression(&self, idx: NodeIndex) -> bool {
        self.arena.kind_of(self.arena.parent_of(idx)) == Some(NodeKind::ResourceList)
            && self.arena.kind_of(idx) != Some(NodeKind::ResourceVariable)
    }
}
