use core::fmt;
use std::cmp::Ordering;

use log::trace;

use crate::compare::{Compare, Natural};
use crate::node::{Color, NodeId, NodePos, Nodes};

/// An ordered multiset backed by a red-black tree.
///
/// Values are ordered by the comparison strategy `C`, which is fixed at
/// construction. [`Natural`] uses the [`Ord`] implementation of `T`, any
/// `Fn(&T, &T) -> Ordering` can be used instead with
/// [`RedBlackTree::with_comparator`].
///
/// Equal values are kept as separate nodes, a new value is placed after the
/// values it compares equal to.
pub struct RedBlackTree<T, C = Natural> {
    // INVARIANTS:
    //  * `root` is `None` iff `nodes` is empty
    //  * `root` is the only node without a parent
    pub(crate) nodes: Nodes<T>,
    pub(crate) root: Option<NodeId>,
    pub(crate) cmp: C,
}

impl<T: Ord> RedBlackTree<T> {
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C: Default> Default for RedBlackTree<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C> RedBlackTree<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: Nodes::new(),
            root: None,
            cmp,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn root(&self) -> Option<NodeRef<'_, T, C>> {
        self.root.map(|id| self.node_ref(id))
    }

    /// Returns the node with the given id if it's part of the tree.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T, C>> {
        self.nodes.contains(id).then(|| self.node_ref(id))
    }

    /// Number of nodes on the longest path from the root to a leaf, 0 for an
    /// empty tree.
    pub fn height(&self) -> usize {
        self.nodes.height(self.root)
    }

    pub fn min(&self) -> Option<NodeRef<'_, T, C>> {
        self.root.map(|root| self.node_ref(self.nodes.min_of(root)))
    }

    pub fn max(&self) -> Option<NodeRef<'_, T, C>> {
        self.root.map(|root| self.node_ref(self.nodes.max_of(root)))
    }

    #[inline]
    pub(crate) fn node_ref(&self, id: NodeId) -> NodeRef<'_, T, C> {
        NodeRef { tree: self, id }
    }

    /// Sets the root to the first parentless node among `top` and at most
    /// `levels` of its ancestors.
    ///
    /// Rotations done by a fixup can only move the root within a few levels
    /// above the node the fixup returned. If no parentless node is found
    /// there, the root didn't change.
    fn reroot(&mut self, top: NodeId, levels: usize) {
        let mut node = top;
        for _ in 0..=levels {
            match self.nodes.parent(node) {
                Some(parent) => node = parent,
                None => {
                    if self.root != Some(node) {
                        trace!("new root {node}");
                    }
                    self.root = Some(node);
                    return;
                }
            }
        }

        debug_assert!(self.root.map_or(true, |root| self.nodes.parent(root).is_none()));
    }

    fn insert_fixup(&mut self, new_node: NodeId) -> NodeId {
        let mut node = new_node;
        while let Some(mut parent) = self.nodes.parent(node) {
            if self.nodes.color(parent).is_black() {
                break;
            }

            debug_assert!(self.nodes.color(node).is_red());
            // red-black properties are violated because red parent has a red child
            //
            // parent cannot be the root as the root is always black, so the
            // grand parent must exist
            let grand_parent = self
                .nodes
                .parent(parent)
                .expect("red node cannot be the root");
            debug_assert!(self.nodes.color(grand_parent).is_black());

            let parent_pos = self.nodes.pos(parent);
            let uncle = match parent_pos {
                NodePos::Left => self.nodes.right(grand_parent),
                NodePos::Right => self.nodes.left(grand_parent),
                NodePos::Root => unreachable!(),
            };

            if let Some(uncle) = uncle.filter(|&u| self.nodes.color(u).is_red()) {
                //     +--- gp:b ---+               +--- gp:r ---+
                //     |            |               |            |
                //  + p:r +      + u:r +   -->   + p:b +      + u:b +
                //  |     |      |     |         |     |      |     |
                // n:r   a:b    b:b   c:b       n:r   a:b    b:b   c:b
                // (a, b, c can be any subtrees)
                //
                // Black height is unchanged, but grand parent may now have a red
                // parent, so repeat for it.
                trace!("insert fixup: red uncle at {grand_parent}");
                self.nodes.set_color(parent, Color::Black);
                self.nodes.set_color(uncle, Color::Black);
                self.nodes.set_color(grand_parent, Color::Red);
                node = grand_parent;
                if self.nodes.parent(node).is_none() {
                    self.nodes.set_color(node, Color::Black);
                }
                continue;
            }

            match parent_pos {
                NodePos::Left => {
                    if self.nodes.pos(node) == NodePos::Right {
                        //       +-- gp:b --+                 +-- gp:b --+
                        //       |          |                 |          |
                        //  +-- p:r --+    u:b  -->       +- n:r --+    u:b
                        //  |         |                   |        |
                        // a:b    +- n:r -+           +- p:r -+   c:b
                        //        |       |           |       |
                        //       b:b     c:b         a:b     b:b
                        trace!("insert fixup: inner grandchild {node}");
                        self.nodes.rotate_left(parent);
                        std::mem::swap(&mut parent, &mut node);
                    }

                    //           +-- gp:b --+            +----- p:b -----+
                    //           |          |            |               |
                    //      +-- p:r --+    u:b  -->   +- n:r -+     +- gp:r -+
                    //      |         |               |       |     |        |
                    //  +- n:r -+    c:b             a:b     b:b   c:b      u:b
                    //  |       |
                    // a:b     b:b
                    trace!("insert fixup: outer grandchild {node}");
                    self.nodes.rotate_right(grand_parent);
                }
                NodePos::Right => {
                    // same as Left branch but left/right are switched
                    if self.nodes.pos(node) == NodePos::Left {
                        trace!("insert fixup: inner grandchild {node}");
                        self.nodes.rotate_right(parent);
                        std::mem::swap(&mut parent, &mut node);
                    }

                    trace!("insert fixup: outer grandchild {node}");
                    self.nodes.rotate_left(grand_parent);
                }
                NodePos::Root => unreachable!(),
            }
            self.nodes.set_color(parent, Color::Black);
            self.nodes.set_color(grand_parent, Color::Red);
            // parent is black now which ends the loop
        }

        if self.nodes.parent(node).is_none() {
            self.nodes.set_color(node, Color::Black);
        }
        node
    }

    /// Removes `node` from the tree and returns its value.
    fn delete_node(&mut self, node: NodeId) -> T {
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
        //
        // A node with at most one child is removed directly (1, 6, 12, 58).
        // Otherwise its successor, which cannot have a left child, is removed
        // instead and its value moved into `node` (9 takes 12, 34 takes 58).
        let to_remove = match (self.nodes.left(node), self.nodes.right(node)) {
            (Some(_), Some(right)) => self.nodes.min_of(right),
            _ => node,
        };

        // Node that takes the place of `to_remove`. If there's no child a
        // phantom black leaf is used so that the fixup has a node to start from.
        let (replacement, phantom) =
            match self.nodes.left(to_remove).or(self.nodes.right(to_remove)) {
                Some(child) => (child, None),
                None => {
                    let phantom = self.nodes.push_phantom();
                    (phantom, Some(phantom))
                }
            };

        match self.nodes.parent(to_remove) {
            Some(parent) => self.nodes.replace_child(parent, to_remove, Some(replacement)),
            None => self.nodes.detach_parent(replacement),
        }

        if to_remove != node {
            self.nodes.swap_values(node, to_remove);
        }

        let top = if self.nodes.color(to_remove).is_black() {
            self.delete_fixup(replacement)
        } else {
            // removing a red node cannot change any black height
            replacement
        };
        self.reroot(top, 3);

        if let Some(phantom) = phantom {
            self.nodes.pop_phantom(phantom);
            if self.root == Some(phantom) {
                self.root = None;
            }
        }

        let (value, moved) = self.nodes.swap_remove(to_remove);
        if moved.is_some() && self.root == moved {
            self.root = Some(to_remove);
        }
        value
    }

    fn delete_fixup(&mut self, mut x: NodeId) -> NodeId {
        // `x` took the place of a removed black node, every path through `x`
        // is one black node short.
        //
        // If x is red, coloring it black restores the black height.
        // If x is the root the whole tree lost one black node which is fine.
        // Otherwise push the missing black node up or fix it with rotations.
        while let Some(parent) = self.nodes.parent(x) {
            if self.nodes.color(x).is_red() {
                break;
            }

            match self.nodes.pos(x) {
                NodePos::Left => {
                    // x is black and one black short, so its sibling subtree has
                    // a black height of at least 1 and cannot be empty
                    let mut sibling = self
                        .nodes
                        .right(parent)
                        .expect("doubly black node must have a sibling");

                    if self.nodes.color(sibling).is_red() {
                        //     +--- p:b ---+                    +--- s:b ---+
                        //     |           |                    |           |
                        // +- x:b -+   +- s:r -+   -->      +- p:r -+      d:b
                        // |       |   |       |            |       |
                        // a       b  c:b     d:b       +- x:b -+  c:b
                        //                              |       |
                        //                              a       b
                        // Turns into case 2, 3 or 4 with c as the new sibling.
                        trace!("delete fixup: red sibling {sibling}");
                        self.nodes.set_color(sibling, Color::Black);
                        self.nodes.set_color(parent, Color::Red);
                        self.nodes.rotate_left(parent);
                        sibling = self
                            .nodes
                            .right(parent)
                            .expect("doubly black node must have a sibling");
                    }

                    let near = self.nodes.left(sibling);
                    let far = self.nodes.right(sibling);
                    if self.nodes.is_black(near) && self.nodes.is_black(far) {
                        // Take one black from both x and sibling, parent now
                        // carries the missing black node.
                        trace!("delete fixup: black sibling {sibling} with black children");
                        self.nodes.set_color(sibling, Color::Red);
                        x = parent;
                        continue;
                    }

                    if self.nodes.is_black(far) {
                        //  +- s:b -+              +- c:b -+
                        //  |       |      -->     |       |
                        // c:r     d:b             e    +- s:r -+
                        //                              |       |
                        //                              f      d:b
                        trace!("delete fixup: red near child of {sibling}");
                        let near = near.expect("red node is present");
                        self.nodes.set_color(near, Color::Black);
                        self.nodes.set_color(sibling, Color::Red);
                        self.nodes.rotate_right(sibling);
                        sibling = self
                            .nodes
                            .right(parent)
                            .expect("doubly black node must have a sibling");
                    }

                    //     +--- p:? ---+                   +--- s:? ---+
                    //     |           |                   |           |
                    // +- x:b -+   +- s:b -+   -->     +- p:b -+      d:b
                    // |       |   |       |           |       |
                    // a       b   c      d:r      +- x:b -+   c
                    //                             |       |
                    //                             a       b
                    // Adds one black node to the paths through x, others keep
                    // their black height. Terminal.
                    trace!("delete fixup: red far child of {sibling}");
                    self.nodes.set_color(sibling, self.nodes.color(parent));
                    self.nodes.set_color(parent, Color::Black);
                    if let Some(far) = self.nodes.right(sibling) {
                        self.nodes.set_color(far, Color::Black);
                    }
                    self.nodes.rotate_left(parent);
                    break;
                }
                NodePos::Right => {
                    // same as Left branch but left/right are switched
                    let mut sibling = self
                        .nodes
                        .left(parent)
                        .expect("doubly black node must have a sibling");

                    if self.nodes.color(sibling).is_red() {
                        trace!("delete fixup: red sibling {sibling}");
                        self.nodes.set_color(sibling, Color::Black);
                        self.nodes.set_color(parent, Color::Red);
                        self.nodes.rotate_right(parent);
                        sibling = self
                            .nodes
                            .left(parent)
                            .expect("doubly black node must have a sibling");
                    }

                    let near = self.nodes.right(sibling);
                    let far = self.nodes.left(sibling);
                    if self.nodes.is_black(near) && self.nodes.is_black(far) {
                        trace!("delete fixup: black sibling {sibling} with black children");
                        self.nodes.set_color(sibling, Color::Red);
                        x = parent;
                        continue;
                    }

                    if self.nodes.is_black(far) {
                        trace!("delete fixup: red near child of {sibling}");
                        let near = near.expect("red node is present");
                        self.nodes.set_color(near, Color::Black);
                        self.nodes.set_color(sibling, Color::Red);
                        self.nodes.rotate_left(sibling);
                        sibling = self
                            .nodes
                            .left(parent)
                            .expect("doubly black node must have a sibling");
                    }

                    trace!("delete fixup: red far child of {sibling}");
                    self.nodes.set_color(sibling, self.nodes.color(parent));
                    self.nodes.set_color(parent, Color::Black);
                    if let Some(far) = self.nodes.left(sibling) {
                        self.nodes.set_color(far, Color::Black);
                    }
                    self.nodes.rotate_right(parent);
                    break;
                }
                NodePos::Root => unreachable!(),
            }
        }

        self.nodes.set_color(x, Color::Black);
        x
    }
}

impl<T, C: Compare<T>> RedBlackTree<T, C> {
    /// Adds `value` to the tree, equal values are kept.
    pub fn insert(&mut self, value: T) {
        let Some(root) = self.root else {
            let id = self.nodes.push(value, Color::Black);
            self.root = Some(id);
            return;
        };

        // Move left/right down the tree until we find an empty slot
        let mut parent = root;
        let mut go_right = false;
        let mut maybe_node = Some(root);
        while let Some(node) = maybe_node {
            parent = node;
            go_right = self.cmp.compare(&value, self.nodes.value(node)) == Ordering::Greater;
            maybe_node = if go_right {
                self.nodes.right(node)
            } else {
                self.nodes.left(node)
            };
        }

        let new_node = self.nodes.push(value, Color::Red);
        if go_right {
            self.nodes.set_right(parent, Some(new_node));
        } else {
            self.nodes.set_left(parent, Some(new_node));
        }

        let top = self.insert_fixup(new_node);
        self.reroot(top, 1);
    }

    /// Removes one value equal to `value`, returns whether one was present.
    pub fn delete(&mut self, value: &T) -> bool {
        self.remove(value).is_some()
    }

    /// Removes one value equal to `value` and returns it.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let node = self.find_raw(value)?;
        Some(self.delete_node(node))
    }

    pub fn find(&self, value: &T) -> Option<NodeRef<'_, T, C>> {
        self.find_raw(value).map(|id| self.node_ref(id))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find_raw(value).is_some()
    }

    pub(crate) fn find_raw(&self, value: &T) -> Option<NodeId> {
        let mut maybe_node = self.root;
        while let Some(node) = maybe_node {
            maybe_node = match self.cmp.compare(value, self.nodes.value(node)) {
                Ordering::Equal => return Some(node),
                Ordering::Greater => self.nodes.right(node),
                Ordering::Less => self.nodes.left(node),
            };
        }

        None
    }

    /// Returns the first node whose value is not less than `value`.
    pub fn lower_bound(&self, value: &T) -> Option<NodeRef<'_, T, C>> {
        self.bound_raw(value, |ord| ord != Ordering::Less)
            .map(|id| self.node_ref(id))
    }

    /// Returns the first node whose value is greater than `value`.
    pub fn upper_bound(&self, value: &T) -> Option<NodeRef<'_, T, C>> {
        self.bound_raw(value, |ord| ord == Ordering::Greater)
            .map(|id| self.node_ref(id))
    }

    /// Leftmost node for which `accept(node.value cmp value)` holds, `accept`
    /// must be monotonic in the in-order sequence.
    pub(crate) fn bound_raw<F>(&self, value: &T, accept: F) -> Option<NodeId>
    where
        F: Fn(Ordering) -> bool,
    {
        let mut found = None;
        let mut maybe_node = self.root;
        while let Some(node) = maybe_node {
            if accept(self.cmp.compare(self.nodes.value(node), value)) {
                found = Some(node);
                maybe_node = self.nodes.left(node);
            } else {
                maybe_node = self.nodes.right(node);
            }
        }

        found
    }
}

impl<T, C: Compare<T>> Extend<T> for RedBlackTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for RedBlackTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C> fmt::Debug for RedBlackTree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct TreeDebug<'a, T, C>(&'a RedBlackTree<T, C>);

        impl<T: fmt::Debug, C> fmt::Debug for TreeDebug<'_, T, C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let tree = self.0;
                let mut f = f.debug_list();
                let mut node = tree.root.map(|root| tree.nodes.min_of(root));
                while let Some(id) = node {
                    f.entry(&tree.node_ref(id));
                    node = tree.nodes.successor(id);
                }
                f.finish()
            }
        }

        f.debug_struct("RedBlackTree")
            .field("len", &self.len())
            .field("root", &self.root())
            .field("nodes", &TreeDebug(self))
            .finish()
    }
}

/// Read-only view of a node.
///
/// It borrows the tree, so no node can be observed across a mutation.
pub struct NodeRef<'a, T, C = Natural> {
    tree: &'a RedBlackTree<T, C>,
    id: NodeId,
}

impl<T, C> Clone for NodeRef<'_, T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C> Copy for NodeRef<'_, T, C> {}

impl<'a, T, C> NodeRef<'a, T, C> {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn value(&self) -> &'a T {
        self.tree.nodes.value(self.id)
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.tree.nodes.color(self.id)
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color().is_red()
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color().is_black()
    }

    pub fn parent(&self) -> Option<Self> {
        self.tree.nodes.parent(self.id).map(|id| self.tree.node_ref(id))
    }

    pub fn left(&self) -> Option<Self> {
        self.tree.nodes.left(self.id).map(|id| self.tree.node_ref(id))
    }

    pub fn right(&self) -> Option<Self> {
        self.tree.nodes.right(self.id).map(|id| self.tree.node_ref(id))
    }

    /// Node holding the next value in sorted order.
    pub fn successor(&self) -> Option<Self> {
        self.tree
            .nodes
            .successor(self.id)
            .map(|id| self.tree.node_ref(id))
    }

    /// Node holding the previous value in sorted order.
    pub fn predecessor(&self) -> Option<Self> {
        self.tree
            .nodes
            .predecessor(self.id)
            .map(|id| self.tree.node_ref(id))
    }

    /// Height of the subtree rooted at this node.
    pub fn height(&self) -> usize {
        self.tree.nodes.height(Some(self.id))
    }
}

impl<T, C> fmt::Debug for NodeRef<'_, T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("Node");
        f.field("value", self.value()).field("color", &self.color());

        let mut dbg_opt_node = |name: &str, node: Option<Self>| match node {
            Some(node) => {
                f.field(name, &(node.value(), node.color()));
            }
            None => {
                f.field(name, &None::<T>);
            }
        };
        dbg_opt_node("parent", self.parent());
        dbg_opt_node("left", self.left());
        dbg_opt_node("right", self.right());

        f.finish()
    }
}
