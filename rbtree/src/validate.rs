use core::fmt;
use std::cmp::Ordering;
use std::error::Error;

use crate::compare::Compare;
use crate::node::NodeId;
use crate::tree::RedBlackTree;

/// A broken structural or red-black property found by
/// [`RedBlackTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    RedRoot(NodeId),
    RootHasParent(NodeId),
    /// A red node has a red child.
    DoubleRed { parent: NodeId, child: NodeId },
    /// Paths through the left and the right child of `node` have a different
    /// number of black nodes.
    BlackHeight {
        node: NodeId,
        left: usize,
        right: usize,
    },
    /// `child` is linked as a child of `parent` but doesn't point back at it.
    ParentLink { parent: NodeId, child: NodeId },
    /// `node` is smaller than the node before it in the in-order walk.
    Order { node: NodeId },
    /// Number of reachable nodes differs from the number of stored values.
    Len { expected: usize, reachable: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot(node) => write!(f, "root {node} is not black"),
            Self::RootHasParent(node) => write!(f, "root {node} has a parent"),
            Self::DoubleRed { parent, child } => {
                write!(f, "red node {parent} has a red child {child}")
            }
            Self::BlackHeight { node, left, right } => write!(
                f,
                "black height differs for {node}; {left} != {right}"
            ),
            Self::ParentLink { parent, child } => {
                write!(f, "child {child} of {parent} has wrong parent")
            }
            Self::Order { node } => write!(f, "{node} is out of order"),
            Self::Len {
                expected,
                reachable,
            } => write!(f, "expected {expected} nodes, {reachable} are reachable"),
        }
    }
}

impl Error for InvariantViolation {}

impl<T, C: Compare<T>> RedBlackTree<T, C> {
    /// Checks that the tree is a valid red-black tree:
    ///  * the root is black and has no parent
    ///  * a red node has no red child
    ///  * every path from a node to its leaves has the same number of black
    ///    nodes
    ///  * every child points back to its parent
    ///  * the in-order walk is sorted by the comparator
    ///
    /// Meant for tests and debugging, it visits every node.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return match self.len() {
                0 => Ok(()),
                expected => Err(InvariantViolation::Len {
                    expected,
                    reachable: 0,
                }),
            };
        };

        if self.nodes.parent(root).is_some() {
            return Err(InvariantViolation::RootHasParent(root));
        }
        if self.nodes.color(root).is_red() {
            return Err(InvariantViolation::RedRoot(root));
        }

        let mut reachable = 0;
        self.black_height(root, &mut reachable)?;
        if reachable != self.len() {
            return Err(InvariantViolation::Len {
                expected: self.len(),
                reachable,
            });
        }

        let mut prev = self.nodes.min_of(root);
        while let Some(node) = self.nodes.successor(prev) {
            let ord = self
                .cmp
                .compare(self.nodes.value(prev), self.nodes.value(node));
            if ord == Ordering::Greater {
                return Err(InvariantViolation::Order { node });
            }
            prev = node;
        }

        Ok(())
    }

    /// Black height of the subtree at `node`, absent leaves count as black.
    fn black_height(
        &self,
        node: NodeId,
        reachable: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        *reachable += 1;
        if *reachable > self.len() {
            // links form a cycle or point at a removed node
            return Err(InvariantViolation::Len {
                expected: self.len(),
                reachable: *reachable,
            });
        }

        let is_red = self.nodes.color(node).is_red();
        let mut heights = [1, 1];
        for (height, child) in heights
            .iter_mut()
            .zip([self.nodes.left(node), self.nodes.right(node)])
        {
            let Some(child) = child else {
                continue;
            };
            if !self.nodes.contains(child) {
                return Err(InvariantViolation::ParentLink {
                    parent: node,
                    child,
                });
            }
            if self.nodes.parent(child) != Some(node) {
                return Err(InvariantViolation::ParentLink {
                    parent: node,
                    child,
                });
            }
            if is_red && self.nodes.color(child).is_red() {
                return Err(InvariantViolation::DoubleRed {
                    parent: node,
                    child,
                });
            }
            *height = self.black_height(child, reachable)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeight { node, left, right });
        }

        Ok(left + usize::from(!is_red))
    }
}
