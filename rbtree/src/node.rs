use core::fmt;

/// Color of a tree node, absent children count as black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns `true` if the color is [`Red`].
    ///
    /// [`Red`]: Color::Red
    #[must_use]
    pub fn is_red(&self) -> bool {
        matches!(self, Self::Red)
    }

    /// Returns `true` if the color is [`Black`].
    ///
    /// [`Black`]: Color::Black
    #[must_use]
    pub fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }
}

/// Index of a node inside the tree.
///
/// Ids are only meaningful for the tree that handed them out and only until
/// the next insert or delete, which may move nodes around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodePos {
    Root,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Links {
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// Storage for the nodes of a tree.
///
/// Topology lives in `links`, values in `values`, both indexed by `NodeId`.
/// `parent` is a plain index, ownership of values stays with the vectors, so
/// dropping `Nodes` drops every value without walking the tree.
///
/// INVARIANTS:
///  * `links.len() == values.len()`, except while a phantom node is pushed in
///    which case the phantom is the single extra slot at the end of `links`
///  * `child.parent == Some(node)` for every child link, except inside a
///    single primitive below
pub(crate) struct Nodes<T> {
    links: Vec<Links>,
    values: Vec<T>,
}

impl<T> Nodes<T> {
    pub(crate) fn new() -> Self {
        Self {
            links: Vec::new(),
            values: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        id.0 < self.values.len()
    }

    pub(crate) fn clear(&mut self) {
        self.links.clear();
        self.values.clear();
    }

    /// Adds an unlinked node.
    pub(crate) fn push(&mut self, value: T, color: Color) -> NodeId {
        debug_assert_eq!(self.links.len(), self.values.len());
        let id = NodeId(self.values.len());
        self.values.push(value);
        self.links.push(Links {
            color,
            parent: None,
            left: None,
            right: None,
        });
        id
    }

    /// Adds a black node without a value.
    ///
    /// It stands in for the absent child of a removed node while the delete
    /// fixup runs and must be removed by [`Nodes::pop_phantom`] before any
    /// other node is added or removed.
    pub(crate) fn push_phantom(&mut self) -> NodeId {
        assert_eq!(
            self.links.len(),
            self.values.len(),
            "only one phantom node may exist at a time"
        );
        let id = NodeId(self.links.len());
        self.links.push(Links {
            color: Color::Black,
            parent: None,
            left: None,
            right: None,
        });
        id
    }

    /// Unlinks the phantom node from its parent and discards it.
    pub(crate) fn pop_phantom(&mut self, phantom: NodeId) {
        assert!(
            phantom.0 == self.values.len() && self.links.len() == self.values.len() + 1,
            "{phantom} is not a phantom node"
        );
        debug_assert!(self.left(phantom).is_none() && self.right(phantom).is_none());
        if let Some(parent) = self.parent(phantom) {
            self.replace_child(parent, phantom, None);
        }
        self.links.pop();
    }

    /// Removes a node that is no longer linked into the tree and returns its
    /// value.
    ///
    /// The last node is moved into the freed slot. If that happens its old id
    /// is returned alongside the value, callers holding that id must replace
    /// it with `id`.
    pub(crate) fn swap_remove(&mut self, id: NodeId) -> (T, Option<NodeId>) {
        assert_eq!(
            self.links.len(),
            self.values.len(),
            "phantom node must be removed first"
        );
        let last = NodeId(self.values.len() - 1);
        let moved = if id != last {
            // point everything that refers to `last` at `id`
            let Links {
                parent,
                left,
                right,
                ..
            } = self.links[last.0];
            if let Some(parent) = parent {
                let p = &mut self.links[parent.0];
                if p.left == Some(last) {
                    p.left = Some(id);
                } else {
                    debug_assert_eq!(p.right, Some(last));
                    p.right = Some(id);
                }
            }
            for child in [left, right].into_iter().flatten() {
                self.links[child.0].parent = Some(id);
            }
            Some(last)
        } else {
            None
        };

        self.links.swap_remove(id.0);
        (self.values.swap_remove(id.0), moved)
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> &T {
        &self.values[id.0]
    }

    #[inline]
    pub(crate) fn swap_values(&mut self, a: NodeId, b: NodeId) {
        self.values.swap(a.0, b.0);
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.links[id.0].parent
    }

    #[inline]
    pub(crate) fn left(&self, id: NodeId) -> Option<NodeId> {
        self.links[id.0].left
    }

    #[inline]
    pub(crate) fn right(&self, id: NodeId) -> Option<NodeId> {
        self.links[id.0].right
    }

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.links[id.0].color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.links[id.0].color = color;
    }

    /// Color of a possibly absent node, absent nodes are black.
    #[inline]
    pub(crate) fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.color(id))
    }

    #[inline]
    pub(crate) fn is_red(&self, id: Option<NodeId>) -> bool {
        self.color_of(id).is_red()
    }

    #[inline]
    pub(crate) fn is_black(&self, id: Option<NodeId>) -> bool {
        self.color_of(id).is_black()
    }

    /// Makes `id` parentless, used when it takes over the root position.
    #[inline]
    pub(crate) fn detach_parent(&mut self, id: NodeId) {
        self.links[id.0].parent = None;
    }

    pub(crate) fn pos(&self, id: NodeId) -> NodePos {
        match self.parent(id) {
            Some(parent) => {
                if self.left(parent) == Some(id) {
                    NodePos::Left
                } else {
                    assert_eq!(self.right(parent), Some(id), "{id} is not a child of {parent}");
                    NodePos::Right
                }
            }
            None => NodePos::Root,
        }
    }

    /// Sets `child` as the left child of `node` and updates the parent of
    /// `child` in the same step.
    pub(crate) fn set_left(&mut self, node: NodeId, child: Option<NodeId>) {
        self.links[node.0].left = child;
        if let Some(child) = child {
            self.links[child.0].parent = Some(node);
        }
    }

    /// Sets `child` as the right child of `node` and updates the parent of
    /// `child` in the same step.
    pub(crate) fn set_right(&mut self, node: NodeId, child: Option<NodeId>) {
        self.links[node.0].right = child;
        if let Some(child) = child {
            self.links[child.0].parent = Some(node);
        }
    }

    /// Replaces the child `old` of `parent` with `new`.
    ///
    /// # Panics
    ///
    /// If `old` is neither the left nor the right child of `parent`.
    pub(crate) fn replace_child(&mut self, parent: NodeId, old: NodeId, new: Option<NodeId>) {
        if self.left(parent) == Some(old) {
            self.set_left(parent, new);
        } else {
            assert_eq!(
                self.right(parent),
                Some(old),
                "{old} is not a child of {parent}"
            );
            self.set_right(parent, new);
        }
    }

    /// Left rotation around `node`, does nothing if `node` has no right child.
    ///
    /// The caller is responsible to update the root of the tree if `node` was
    /// the root.
    pub(crate) fn rotate_left(&mut self, node: NodeId) {
        //    p                       p
        //    |                       |
        // +-node-+               +-right-+
        // |      |      -->      |       |
        // a  +-right-+       +-node-+    c
        //    |       |       |      |
        //    b       c       a      b
        // where a, b, c can be any subtrees
        let Some(right) = self.right(node) else {
            return;
        };

        match self.parent(node) {
            Some(parent) => self.replace_child(parent, node, Some(right)),
            None => self.detach_parent(right),
        }

        let b = self.left(right);
        self.set_left(right, Some(node));
        self.set_right(node, b);
    }

    /// Right rotation around `node`, does nothing if `node` has no left child.
    ///
    /// The caller is responsible to update the root of the tree if `node` was
    /// the root.
    pub(crate) fn rotate_right(&mut self, node: NodeId) {
        //         p              p
        //         |              |
        //     +-node-+       +-left-+
        //     |      |       |      |
        // +-left-+   c  -->  a  +-node-+
        // |      |              |      |
        // a      b              b      c
        // where a, b, c can be any subtrees
        let Some(left) = self.left(node) else {
            return;
        };

        match self.parent(node) {
            Some(parent) => self.replace_child(parent, node, Some(left)),
            None => self.detach_parent(left),
        }

        let b = self.right(left);
        self.set_right(left, Some(node));
        self.set_left(node, b);
    }

    pub(crate) fn min_of(&self, root: NodeId) -> NodeId {
        let mut x = root;
        while let Some(left) = self.left(x) {
            x = left;
        }

        x
    }

    pub(crate) fn max_of(&self, root: NodeId) -> NodeId {
        let mut x = root;
        while let Some(right) = self.right(x) {
            x = right;
        }

        x
    }

    pub(crate) fn successor(&self, mut node: NodeId) -> Option<NodeId> {
        //       +---------- 34 ---------+
        //       |                       |
        // +---- 2 ----+                 58 ----+
        // |           |                        |
        // 1      +--- 9 ----+              +-- 77 --+
        //        |          |              |        |
        //     +- 6       +- 20 -+      +- 71 -+     82
        //     |          |      |      |      |
        //     5         12 -+   24    67      75
        //                   |
        //                   13
        match self.right(node) {
            // 9 -> 12, 2 -> 5, 58 -> 67
            Some(right) => Some(self.min_of(right)),
            None => {
                // 6 -> 9, 1 -> 2, 13 -> 20, 24 -> 34
                // Move up while `node` is a right child, the parent of the first
                // left child on the way up is the successor.
                let mut node_parent = self.parent(node);
                while let Some(parent) = node_parent {
                    if self.left(parent) == Some(node) {
                        break;
                    }
                    node = parent;
                    node_parent = self.parent(node);
                }

                node_parent
            }
        }
    }

    pub(crate) fn predecessor(&self, mut node: NodeId) -> Option<NodeId> {
        match self.left(node) {
            // 2 -> 1, 9 -> 6, 20 -> 13, 77 -> 75
            Some(left) => Some(self.max_of(left)),
            None => {
                // 12 -> 9, 58 -> 34, 67 -> 58
                let mut node_parent = self.parent(node);
                while let Some(parent) = node_parent {
                    if self.right(parent) == Some(node) {
                        break;
                    }
                    node = parent;
                    node_parent = self.parent(node);
                }

                node_parent
            }
        }
    }

    pub(crate) fn height(&self, node: Option<NodeId>) -> usize {
        match node {
            Some(node) => 1 + self.height(self.left(node)).max(self.height(self.right(node))),
            None => 0,
        }
    }
}
