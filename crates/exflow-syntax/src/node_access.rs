//! NodeArena access methods.

use crate::base::NodeIndex;
use crate::node::*;
use crate::node_arena::children_of;
use smallvec::SmallVec;

macro_rules! payload_accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $data:ty) => {
        $(#[$doc])*
        #[inline]
        pub fn $name<'n>(&self, node: &'n Node) -> Option<&'n $data> {
            match &node.data {
                NodeData::$variant(data) => Some(data),
                _ => None,
            }
        }
    };
}

impl NodeArena {
    /// Get a node by index.
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get extended info for a node.
    #[inline]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_extended_mut(&mut self, index: NodeIndex) -> Option<&mut ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get_mut(index.0 as usize)
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of `index`, or `NONE` for roots and unknown indices.
    #[inline]
    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.get_extended(index)
            .map_or(NodeIndex::NONE, |ext| ext.parent)
    }

    #[inline]
    pub fn kind_of(&self, index: NodeIndex) -> Option<NodeKind> {
        self.get(index).map(Node::kind)
    }

    /// Syntactic children of `index` in source order.
    pub fn children(&self, index: NodeIndex) -> SmallVec<[NodeIndex; 8]> {
        self.get(index)
            .map(|node| children_of(&node.data))
            .unwrap_or_default()
    }

    /// Iterate from `index`'s parent up to the root.
    ///
    /// Stops after `len()` steps, so parent cycles made with
    /// [`NodeArena::set_parent`] end the walk instead of looping.
    pub fn ancestors(&self, index: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            current: self.parent_of(index),
            remaining: self.len(),
        }
    }

    /// The source-file root above `index`, if any.
    pub fn source_file_of(&self, index: NodeIndex) -> Option<&SourceFileData> {
        std::iter::once(index)
            .chain(self.ancestors(index))
            .find_map(|idx| self.get(idx).and_then(|node| self.get_source_file(node)))
    }

    /// Constructor declarations among the members of `class_idx`.
    pub fn constructors_of(&self, class_idx: NodeIndex) -> SmallVec<[NodeIndex; 4]> {
        let Some(class) = self.get(class_idx).and_then(|node| self.get_class(node)) else {
            return SmallVec::new();
        };
        class
            .members
            .iter()
            .filter(|&member| {
                self.get(member)
                    .and_then(|node| self.get_method(node))
                    .is_some_and(MethodData::is_constructor)
            })
            .collect()
    }

    payload_accessor!(get_source_file, SourceFile, SourceFileData);
    payload_accessor!(get_class, Class, ClassData);
    payload_accessor!(
        /// Method or constructor data.
        get_method,
        Method,
        MethodData
    );
    payload_accessor!(get_parameter, Parameter, ParameterData);
    payload_accessor!(get_try, Try, TryData);
    payload_accessor!(get_resource_list, ResourceList, ResourceListData);
    payload_accessor!(get_catch_clause, Catch, CatchClauseData);
    payload_accessor!(get_reference, Reference, ReferenceData);
    payload_accessor!(get_other, Other, OtherData);
}

/// Iterator over the ancestors of a node, nearest first.
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    current: NodeIndex,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let current = self.current.to_option()?;
        if self.remaining == 0 {
            tracing::debug!(node = current.0, "parent chain longer than the arena, cycle");
            self.current = NodeIndex::NONE;
            return None;
        }
        self.remaining -= 1;
        self.current = self.arena.parent_of(current);
        Some(current)
    }
}
