//! NodeArena creation methods.
//!
//! Nodes are appended bottom-up. Adding a node adopts every child referenced
//! by its payload, so parent links are complete once the root is added.

use crate::base::NodeIndex;
use crate::node::*;
use tracing::trace;

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Add a node spanning `pos..end` and adopt its children.
    pub fn add_node(&mut self, pos: u32, end: u32, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let children = children_of(&data);
        self.nodes.push(Node { pos, end, data });
        self.extended_info.push(ExtendedNodeInfo::default());
        for child in children {
            self.set_parent(child, index);
        }
        index
    }

    /// Set the parent of `child`. Ignores `NONE` and out-of-range indices.
    pub fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if let Some(ext) = self.get_extended_mut(child) {
            if ext.parent.is_some() && ext.parent != parent {
                trace!(?child, old = ?ext.parent, new = ?parent, "node re-parented");
            }
            ext.parent = parent;
        }
    }
}

/// Children referenced by a payload, in source order.
pub(crate) fn children_of(data: &NodeData) -> smallvec::SmallVec<[NodeIndex; 8]> {
    let mut out = smallvec::SmallVec::new();
    let mut push = |idx: NodeIndex| {
        if idx.is_some() {
            out.push(idx);
        }
    };
    match data {
        NodeData::SourceFile(file) => file.statements.iter().for_each(&mut push),
        NodeData::CodeFragment(fragment) => fragment.statements.iter().for_each(&mut push),
        NodeData::Class(class) => {
            class.arguments.iter().for_each(&mut push);
            class.members.iter().for_each(&mut push);
        }
        NodeData::Method(method) => {
            method.parameters.iter().for_each(&mut push);
            push(method.body);
        }
        NodeData::Field(field) => push(field.initializer),
        NodeData::Initializer(init) => push(init.body),
        NodeData::Parameter(_) | NodeData::Reference(_) => {}
        NodeData::Block(block) => block.statements.iter().for_each(&mut push),
        NodeData::Throw(throw) => push(throw.expression),
        NodeData::Try(try_data) => {
            push(try_data.resource_list);
            push(try_data.try_block);
            try_data.catch_clauses.iter().for_each(&mut push);
            push(try_data.finally_block);
        }
        NodeData::ResourceList(list) => list.resources.iter().for_each(&mut push),
        NodeData::ResourceVariable(resource) => push(resource.initializer),
        NodeData::Catch(catch) => {
            push(catch.parameter);
            push(catch.block);
        }
        NodeData::Jump(jump) => push(jump.expression),
        NodeData::Call(call) => {
            push(call.qualifier);
            call.arguments.iter().for_each(&mut push);
        }
        NodeData::New(new) => {
            new.arguments.iter().for_each(&mut push);
            push(new.anonymous_class);
        }
        NodeData::Lambda(lambda) => {
            lambda.parameters.iter().for_each(&mut push);
            push(lambda.body);
        }
        NodeData::MethodRef(method_ref) => push(method_ref.qualifier),
        NodeData::Other(other) => other.children.iter().for_each(&mut push),
    }
    out
}
