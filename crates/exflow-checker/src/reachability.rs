//! A syntactic control-flow oracle.
//!
//! Hosts with a real control-flow graph should implement [`FlowOracle`]
//! themselves. This one only knows the statements the syntax tree models:
//! `throw`, `return`, `break` and `continue` never complete normally,
//! blocks complete when every statement does, and try statements follow
//! the usual try/catch/finally rules. Anything opaque is assumed to
//! complete normally.

use crate::oracles::{FlowCancelled, FlowOracle};
use exflow_common::limits::MAX_TREE_WALK_DEPTH;
use exflow_syntax::{NodeArena, NodeData, NodeIndex};

pub struct SyntacticFlowOracle<'a> {
    arena: &'a NodeArena,
    max_depth: u32,
}

impl<'a> SyntacticFlowOracle<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        SyntacticFlowOracle {
            arena,
            max_depth: MAX_TREE_WALK_DEPTH,
        }
    }

    /// Give up (cancel) on statements nested deeper than `max_depth`.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn block_falls_through(
        &self,
        statements: impl IntoIterator<Item = NodeIndex>,
        depth: u32,
    ) -> Result<bool, FlowCancelled> {
        for stmt in statements {
            if !self.statement_falls_through(stmt, depth + 1)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn statement_falls_through(&self, stmt: NodeIndex, depth: u32) -> Result<bool, FlowCancelled> {
        if depth > self.max_depth {
            return Err(FlowCancelled);
        }
        let Some(node) = self.arena.get(stmt) else {
            return Ok(true);
        };
        match &node.data {
            NodeData::Throw(_) | NodeData::Jump(_) => Ok(false),
            NodeData::Block(block) => self.block_falls_through(block.statements.iter(), depth),
            NodeData::Catch(catch) => self.statement_falls_through(catch.block, depth + 1),
            NodeData::Try(try_data) => {
                let mut body_or_catch =
                    self.statement_falls_through(try_data.try_block, depth + 1)?;
                for clause in try_data.catch_clauses.iter() {
                    if body_or_catch {
                        break;
                    }
                    body_or_catch = self.statement_falls_through(clause, depth + 1)?;
                }
                if try_data.finally_block.is_none() {
                    return Ok(body_or_catch);
                }
                let finally = self.statement_falls_through(try_data.finally_block, depth + 1)?;
                Ok(body_or_catch && finally)
            }
            _ => Ok(true),
        }
    }
}

impl FlowOracle for SyntacticFlowOracle<'_> {
    fn block_can_complete_normally(&self, block: NodeIndex) -> Result<bool, FlowCancelled> {
        self.statement_falls_through(block, 0)
    }
}
