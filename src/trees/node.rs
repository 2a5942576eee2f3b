//! Induced tree nodes and a visitor for walking them.
use std::collections::BTreeMap;

/// Decision tree node
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode {
    /// Branches on the value of one attribute.
    Internal {
        /// Feature index in the training schema.
        attribute: usize,
        /// Children keyed by attribute value index.
        children: BTreeMap<usize, TreeNode>,
        /// Number of training records that reached this node.
        records: usize,
    },
    /// Predicts a class value.
    Leaf {
        class: usize,
        /// Number of training records the leaf was built from.
        records: usize,
    },
}

/// The edge a node was reached through: its parent's attribute and the value taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Branch {
    pub attribute: usize,
    pub value: usize,
}

/// Where a visited node sits in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitContext {
    /// 0 for the root.
    pub depth: usize,
    /// `None` for the root.
    pub branch: Option<Branch>,
    /// Whether this is the last child of its parent.
    pub is_last: bool,
}

/// Callbacks for a pre-order walk over a tree.
pub trait TreeVisitor {
    fn visit_internal(&mut self, context: &VisitContext, attribute: usize, records: usize);
    fn visit_leaf(&mut self, context: &VisitContext, class: usize, records: usize);
}

impl TreeNode {
    pub fn leaf(class: usize, records: usize) -> Self {
        TreeNode::Leaf { class, records }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn records(&self) -> usize {
        match self {
            TreeNode::Internal { records, .. } | TreeNode::Leaf { records, .. } => *records,
        }
    }

    /// The child for `value`, if this is an internal node with such a branch.
    pub fn child(&self, value: usize) -> Option<&TreeNode> {
        match self {
            TreeNode::Internal { children, .. } => children.get(&value),
            TreeNode::Leaf { .. } => None,
        }
    }

    pub fn num_nodes(&self) -> usize {
        match self {
            TreeNode::Internal { children, .. } => {
                1 + children.values().map(TreeNode::num_nodes).sum::<usize>()
            }
            TreeNode::Leaf { .. } => 1,
        }
    }

    pub fn num_leaves(&self) -> usize {
        match self {
            TreeNode::Internal { children, .. } => children.values().map(TreeNode::num_leaves).sum(),
            TreeNode::Leaf { .. } => 1,
        }
    }

    /// Length of the longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Internal { children, .. } => {
                1 + children.values().map(TreeNode::depth).max().unwrap_or(0)
            }
            TreeNode::Leaf { .. } => 0,
        }
    }

    /// Walks the tree in pre-order, children in ascending value order.
    pub fn walk<V: TreeVisitor>(&self, visitor: &mut V) {
        let root = VisitContext {
            depth: 0,
            branch: None,
            is_last: true,
        };
        self.walk_from(&root, visitor);
    }

    fn walk_from<V: TreeVisitor>(&self, context: &VisitContext, visitor: &mut V) {
        match self {
            TreeNode::Leaf { class, records } => visitor.visit_leaf(context, *class, *records),
            TreeNode::Internal {
                attribute,
                children,
                records,
            } => {
                visitor.visit_internal(context, *attribute, *records);
                let last = children.len().saturating_sub(1);
                for (i, (&value, child)) in children.iter().enumerate() {
                    let child_context = VisitContext {
                        depth: context.depth + 1,
                        branch: Some(Branch {
                            attribute: *attribute,
                            value,
                        }),
                        is_last: i == last,
                    };
                    child.walk_from(&child_context, visitor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> TreeNode {
        let inner = TreeNode::Internal {
            attribute: 1,
            children: BTreeMap::from([(0, TreeNode::leaf(0, 3)), (1, TreeNode::leaf(1, 2))]),
            records: 5,
        };
        TreeNode::Internal {
            attribute: 0,
            children: BTreeMap::from([(2, inner), (0, TreeNode::leaf(1, 4))]),
            records: 9,
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl TreeVisitor for Recorder {
        fn visit_internal(&mut self, context: &VisitContext, attribute: usize, records: usize) {
            self.0.push(format!(
                "{} {:?} split {} ({}) last={}",
                context.depth,
                context.branch.map(|b| b.value),
                attribute,
                records,
                context.is_last
            ));
        }

        fn visit_leaf(&mut self, context: &VisitContext, class: usize, records: usize) {
            self.0.push(format!(
                "{} {:?} leaf {} ({}) last={}",
                context.depth,
                context.branch.map(|b| b.value),
                class,
                records,
                context.is_last
            ));
        }
    }

    #[test]
    fn test_counts() {
        let tree = tree();
        assert_eq!(tree.num_nodes(), 5);
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.records(), 9);
        assert!(!tree.is_leaf());
        assert!(tree.child(0).is_some_and(TreeNode::is_leaf));
        assert!(tree.child(1).is_none());
    }

    #[test]
    fn test_walk_is_pre_order() {
        let mut recorder = Recorder::default();
        tree().walk(&mut recorder);
        assert_eq!(
            recorder.0,
            vec![
                "0 None split 0 (9) last=true",
                "1 Some(0) leaf 1 (4) last=false",
                "1 Some(2) split 1 (5) last=true",
                "2 Some(0) leaf 0 (3) last=false",
                "2 Some(1) leaf 1 (2) last=true",
            ]
        );
    }

    #[test]
    fn test_single_leaf() {
        let tree = TreeNode::leaf(3, 10);
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.depth(), 0);
        assert!(tree.child(0).is_none());
    }
}
