use allocator_api2::alloc::{ Allocator, Global };
use crate::tree::{
    callback::{ CompareLess, DropFree, TreeCompare, TreeFree, TreeVisitor },
    error::TreeError,
    iter::TreeIterator,
    node::{ color_of, leftmost, rightmost, set_color, Link, NodeColor, NodeDirection, NodePtr, TreeNode }
};
use std::{
    alloc::Layout,
    cmp::Ordering,
    fmt::{ Debug, Display },
    marker::PhantomData
};

/// Ordered set backed by a red-black tree. Every node is allocated from `A`
/// and linked to its parent and children through raw, non-owning links.
pub struct Tree<T, C, F = DropFree, A = Global>
where C: TreeCompare<T>,
      F: TreeFree<T>,
      A: Allocator
{
    root: Link<T>,
    size: usize,
    compare: C,
    free: F,
    _allocator: A,
    _owns: PhantomData<TreeNode<T>>
}

// SAFETY: the tree uniquely owns its nodes, so it moves and shares like a Box<TreeNode<T>>
unsafe impl<T, C, F, A> Send for Tree<T, C, F, A>
where T: Send, C: TreeCompare<T> + Send, F: TreeFree<T> + Send, A: Allocator + Send {}
unsafe impl<T, C, F, A> Sync for Tree<T, C, F, A>
where T: Sync, C: TreeCompare<T> + Sync, F: TreeFree<T> + Sync, A: Allocator + Sync {}

impl<T> Tree<T, CompareLess, DropFree, Global>
where T: Ord
{
    /// Builds a tree in natural order. Duplicates in `vec` are dropped. Running out
    /// of memory aborts through `handle_alloc_error`, like `Vec` does.
    pub fn from_vec(vec: Vec<T>) -> Self {
        let mut new = Self::default();
        for el in vec {
            match new.insert(el) {
                Ok(()) | Err(TreeError::Duplicate(_)) => (),
                Err(_) => std::alloc::handle_alloc_error(Layout::new::<TreeNode<T>>())
            }
        }
        new
    }
}

impl<T> Default for Tree<T, CompareLess, DropFree, Global>
where T: Ord
{
    fn default() -> Self { Self::new_in(CompareLess, DropFree, Global) }
}

impl<T, C, F> Tree<T, C, F, Global>
where C: TreeCompare<T>,
      F: TreeFree<T>
{
    pub fn new(compare: C, free: F) -> Self { Self::new_in(compare, free, Global) }
}

impl<T, C, F, A> Tree<T, C, F, A>
where C: TreeCompare<T>,
      F: TreeFree<T>,
      A: Allocator
{
    pub fn new_in(compare: C, free: F, alloc: A) -> Self {
        Self { root: None, size: 0, compare, free, _allocator: alloc, _owns: PhantomData }
    }
    pub fn len(&self) -> usize { self.size }
    pub fn is_empty(&self) -> bool { self.size == 0 }

    fn new_node(&self, value: T) -> Result<NodePtr<T>, TreeError<T>> {
        let node = match self._allocator.allocate(Layout::new::<TreeNode<T>>()) {
            Ok(v) => v.cast::<TreeNode<T>>(),
            Err(_) => return Err(TreeError::AllocFailed(value))
        };
        unsafe { node.as_ptr().write(TreeNode::new(value)) };
        Ok(node)
    }

    // SAFETY: `node` must have been allocated by `new_node` and be unlinked from the tree
    unsafe fn release_node(&self, node: NodePtr<T>) -> T {
        let TreeNode { data, .. } = node.as_ptr().read();
        self._allocator.deallocate(node.cast(), Layout::new::<TreeNode<T>>());
        data
    }

    pub fn get_root(&self) -> Option<&TreeNode<T>> {
        self.root.map(|n| unsafe { &*n.as_ptr() })
    }

    // Walks from the root, asking `probe` how each node's data orders against the
    // target. Less means the target is further right.
    fn find_node_by<P>(&self, mut probe: P) -> Link<T>
    where P: FnMut(&T) -> Ordering
    {
        let mut current = self.root;
        while let Some(n) = current {
            let node = unsafe { &*n.as_ptr() };
            current = match probe(&node.data) {
                Ordering::Equal => return Some(n),
                Ordering::Less => node.right,
                Ordering::Greater => node.left
            };
        }
        None
    }

    fn find_node(&self, value: &T) -> Link<T> {
        self.find_node_by(|d| self.compare.compare(d, value))
    }

    pub fn contains(&self, value: &T) -> bool { self.find_node(value).is_some() }

    pub fn get(&self, value: &T) -> Option<&T> {
        self.find_node(value).map(|n| unsafe { &(*n.as_ptr()).data })
    }

    // The `*_by` lookups hand the tree's comparator to `probe` so adapters can
    // search by part of an item (e.g. a map key).
    pub(crate) fn get_by<P>(&self, mut probe: P) -> Option<&T>
    where P: FnMut(&C, &T) -> Ordering
    {
        self.find_node_by(|d| probe(&self.compare, d)).map(|n| unsafe { &(*n.as_ptr()).data })
    }

    // Callers must not change anything the comparator looks at.
    pub(crate) fn get_by_mut<P>(&mut self, mut probe: P) -> Option<&mut T>
    where P: FnMut(&C, &T) -> Ordering
    {
        self.find_node_by(|d| probe(&self.compare, d)).map(|n| unsafe { &mut (*n.as_ptr()).data })
    }

    pub fn first(&self) -> Option<&T> {
        self.root.map(|r| unsafe { &(*leftmost(r).as_ptr()).data })
    }

    pub fn last(&self) -> Option<&T> {
        self.root.map(|r| unsafe { &(*rightmost(r).as_ptr()).data })
    }

    // Finds the leaf slot a new value belongs in: the parent-to-be (None for an
    // empty tree) and the side to attach on. Fails on an equal item.
    fn make_initial_insertion(&self, value: &T) -> Option<(Link<T>, NodeDirection)> {
        let mut parent = None;
        let mut dir = NodeDirection::Left;
        let mut current = self.root;
        while let Some(n) = current {
            let node = unsafe { &*n.as_ptr() };
            dir = match self.compare.compare(&node.data, value) {
                // Duplicate entries are not allowed
                Ordering::Equal => return None,
                Ordering::Less => NodeDirection::Right,
                Ordering::Greater => NodeDirection::Left
            };
            parent = Some(n);
            current = node.child(dir);
        }
        Some((parent, dir))
    }

    pub fn insert(&mut self, value: T) -> Result<(), TreeError<T>> {
        let (parent, dir) = match self.make_initial_insertion(&value) {
            Some(v) => v,
            None => return Err(TreeError::Duplicate(value))
        };
        let node = self.new_node(value)?;
        unsafe {
            (*node.as_ptr()).parent = parent;
            match parent {
                Some(p) => (*p.as_ptr()).set_child(dir, Some(node)),
                None => self.root = Some(node)
            }
            self.size += 1;
            self.post_insert_maintain_rbt(node);
        }
        log::trace!("inserted node @ {:?}, size {}", node, self.size);
        Ok(())
    }

    // Points whichever slot held `old` (parent's child or the root) at `new`.
    unsafe fn replace_child(&mut self, parent: Link<T>, old: NodePtr<T>, new: Link<T>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let p = &mut *p.as_ptr();
                if p.left == Some(old) { p.left = new } else { p.right = new }
            }
        }
    }

    //
    //      p           p
    //     /           /
    //    n           r
    //   / \    =>   / \
    //  x   r       n   y
    //     / \     / \
    //    o  y    x   o
    //
    // NOTE: Assume that n and r are valid. p may be absent (n is the root).
    unsafe fn rotate_left(&mut self, n: NodePtr<T>) {
        let Some(r) = (*n.as_ptr()).right else { return };
        let p = (*n.as_ptr()).parent;
        let o = (*r.as_ptr()).left;
        (*n.as_ptr()).right = o;
        if let Some(o) = o { (*o.as_ptr()).parent = Some(n) }
        (*r.as_ptr()).left = Some(n);
        (*n.as_ptr()).parent = Some(r);
        (*r.as_ptr()).parent = p;
        self.replace_child(p, n, Some(r));
    }

    //
    //        p           p
    //       /           /
    //      n           r
    //     / \    =>   / \
    //    r   y       x   n
    //   / \             / \
    //  x  o            o  y
    //
    // NOTE: Assume that n and r are valid. p may be absent (n is the root).
    unsafe fn rotate_right(&mut self, n: NodePtr<T>) {
        let Some(r) = (*n.as_ptr()).left else { return };
        let p = (*n.as_ptr()).parent;
        let o = (*r.as_ptr()).right;
        (*n.as_ptr()).left = o;
        if let Some(o) = o { (*o.as_ptr()).parent = Some(n) }
        (*r.as_ptr()).right = Some(n);
        (*n.as_ptr()).parent = Some(r);
        (*r.as_ptr()).parent = p;
        self.replace_child(p, n, Some(r));
    }

    // Rotates so that `n` moves down towards `dir`.
    unsafe fn rotate(&mut self, n: NodePtr<T>, dir: NodeDirection) {
        match dir {
            NodeDirection::Left => self.rotate_left(n),
            NodeDirection::Right => self.rotate_right(n)
        }
    }

    // NOTE: Assume that n->parent is valid
    unsafe fn get_direction(&self, n: NodePtr<T>, parent: NodePtr<T>) -> NodeDirection {
        match (*parent.as_ptr()).left == Some(n) {
            true => NodeDirection::Left,
            false => NodeDirection::Right
        }
    }

    unsafe fn post_insert_maintain_rbt(&mut self, n: NodePtr<T>) {
        let mut node = n;
        loop {
            // only a red parent violates rb-tree rules
            let mut parent = match (*node.as_ptr()).parent {
                Some(v) if (*v.as_ptr()).color == NodeColor::Red => v,
                _ => break
            };
            // a red node is never the root, so the grandparent exists
            let Some(grandparent) = (*parent.as_ptr()).parent else { break };
            let dir = self.get_direction(parent, grandparent);
            let uncle = (*grandparent.as_ptr()).child(dir.opposite());
            if color_of(uncle) == NodeColor::Red {
                (*parent.as_ptr()).color = NodeColor::Black;
                set_color(uncle, NodeColor::Black);
                (*grandparent.as_ptr()).color = NodeColor::Red;
                // travel up 2 tree levels
                node = grandparent;
            } else {
                if (*parent.as_ptr()).child(dir.opposite()) == Some(node) {
                    // inner grandchild, turn it into an outer one
                    self.rotate(parent, dir);
                    std::mem::swap(&mut node, &mut parent);
                }
                (*parent.as_ptr()).color = NodeColor::Black;
                (*grandparent.as_ptr()).color = NodeColor::Red;
                self.rotate(grandparent, dir.opposite());
                break;
            }
        }
        set_color(self.root, NodeColor::Black);
    }

    /// Removes the item equal to `value` and hands it to the tree's destructor.
    pub fn remove(&mut self, value: &T) -> Result<(), TreeError<T>> {
        let data = self.take(value).ok_or(TreeError::NotFound)?;
        self.free.free(data);
        Ok(())
    }

    /// Removes the item equal to `value` and returns it instead of releasing it.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let node = self.find_node(value)?;
        Some(unsafe { self.remove_node(node) })
    }

    pub(crate) fn take_by<P>(&mut self, mut probe: P) -> Option<T>
    where P: FnMut(&C, &T) -> Ordering
    {
        let node = self.find_node_by(|d| probe(&self.compare, d))?;
        Some(unsafe { self.remove_node(node) })
    }

    // Exchanges the tree positions and colors of `node` and its in-order
    // successor `succ` by relinking. Payloads stay inside their nodes.
    // NOTE: Assume node has two children and succ = leftmost(node->right)
    unsafe fn swap_with_successor(&mut self, node: NodePtr<T>, succ: NodePtr<T>) {
        let n = node.as_ptr();
        let s = succ.as_ptr();
        let n_parent = (*n).parent;
        let n_left = (*n).left;
        let n_right = (*n).right;
        let s_parent = (*s).parent;
        let s_right = (*s).right;

        self.replace_child(n_parent, node, Some(succ));
        (*s).parent = n_parent;
        (*s).left = n_left;
        if let Some(l) = n_left { (*l.as_ptr()).parent = Some(succ) }
        if n_right == Some(succ) {
            // successor is the direct right child
            (*s).right = Some(node);
            (*n).parent = Some(succ);
        } else {
            (*s).right = n_right;
            if let Some(r) = n_right { (*r.as_ptr()).parent = Some(succ) }
            // a leftmost node that isn't the subtree root is a left child
            if let Some(sp) = s_parent { (*sp.as_ptr()).left = Some(node) }
            (*n).parent = s_parent;
        }
        (*n).left = None;
        (*n).right = s_right;
        if let Some(r) = s_right { (*r.as_ptr()).parent = Some(node) }
        std::mem::swap(&mut (*n).color, &mut (*s).color);
    }

    // SAFETY: `node` must be a live node of this tree
    unsafe fn remove_node(&mut self, node: NodePtr<T>) -> T {
        if self.size == 1 {
            // We are the only node!
            self.root = None;
            self.size = 0;
            log::trace!("removed last node @ {:?}", node);
            return self.release_node(node);
        }
        if let (Some(_), Some(right)) = ((*node.as_ptr()).left, (*node.as_ptr()).right) {
            self.swap_with_successor(node, leftmost(right));
        }
        // at most one child from here on
        let child = (*node.as_ptr()).left.or((*node.as_ptr()).right);
        let parent = (*node.as_ptr()).parent;
        let dir = match parent {
            Some(p) => self.get_direction(node, p),
            None => NodeDirection::Left
        };
        if let Some(c) = child { (*c.as_ptr()).parent = parent }
        self.replace_child(parent, node, child);
        if (*node.as_ptr()).color == NodeColor::Black {
            self.post_remove_maintain_rbt(child, parent, dir);
        }
        self.size -= 1;
        log::trace!("removed node @ {:?}, size {}", node, self.size);
        self.release_node(node)
    }

    // `node` may be absent, so its parent and side are passed in separately.
    unsafe fn post_remove_maintain_rbt(&mut self, node: Link<T>, parent: Link<T>, dir: NodeDirection) {
        let mut node = node;
        let mut parent = parent;
        let mut dir = dir;
        while color_of(node) == NodeColor::Black {
            // reached the root
            let Some(p) = parent else { break };
            let mut sibling = (*p.as_ptr()).child(dir.opposite());
            if color_of(sibling) == NodeColor::Red {
                set_color(sibling, NodeColor::Black);
                (*p.as_ptr()).color = NodeColor::Red;
                self.rotate(p, dir);
                sibling = (*p.as_ptr()).child(dir.opposite());
            }
            let Some(mut s) = sibling else {
                // nothing to borrow from, push the missing black up a level
                node = Some(p);
                if (*p.as_ptr()).color == NodeColor::Red { break }
                parent = (*p.as_ptr()).parent;
                if let Some(pp) = parent { dir = self.get_direction(p, pp) }
                continue;
            };
            let near = (*s.as_ptr()).child(dir);
            let far = (*s.as_ptr()).child(dir.opposite());
            if color_of(near) == NodeColor::Black && color_of(far) == NodeColor::Black {
                (*s.as_ptr()).color = NodeColor::Red;
                node = Some(p);
                if (*p.as_ptr()).color == NodeColor::Red { break }
                parent = (*p.as_ptr()).parent;
                if let Some(pp) = parent { dir = self.get_direction(p, pp) }
                continue;
            }
            if color_of(far) == NodeColor::Black {
                // red nephew is the near one, rotate it to the far side
                set_color(near, NodeColor::Black);
                (*s.as_ptr()).color = NodeColor::Red;
                self.rotate(s, dir.opposite());
                s = match (*p.as_ptr()).child(dir.opposite()) {
                    Some(v) => v,
                    None => break
                };
            }
            (*s.as_ptr()).color = (*p.as_ptr()).color;
            (*p.as_ptr()).color = NodeColor::Black;
            set_color((*s.as_ptr()).child(dir.opposite()), NodeColor::Black);
            self.rotate(p, dir);
            node = self.root;
            break;
        }
        set_color(node, NodeColor::Black);
    }

    pub fn iter(&self) -> TreeIterator<'_, T> { self.into_iter() }

    /// Visits every item in ascending order until the visitor returns `false`.
    pub fn for_each<V>(&self, mut visitor: V) -> Result<(), TreeError<T>>
    where V: TreeVisitor<T>
    {
        for v in self {
            if !visitor.visit(v) { return Err(TreeError::Stopped) }
        }
        Ok(())
    }

    /// Releases every item through the destructor and frees every node.
    /// Children are released before their parent. Calling it again is a no-op.
    pub fn clear(&mut self) {
        let mut current = self.root.take();
        if current.is_none() { return }
        log::debug!("releasing {} tree nodes", self.size);
        self.size = 0;
        while let Some(n) = current {
            // SAFETY: the walk only ever holds nodes still linked below the old root
            unsafe {
                let node = &mut *n.as_ptr();
                if let Some(l) = node.left { current = Some(l); continue }
                if let Some(r) = node.right { current = Some(r); continue }
                // leaf: detach, release, climb back up
                let parent = node.parent;
                if let Some(p) = parent {
                    let p = &mut *p.as_ptr();
                    if p.left == Some(n) { p.left = None } else { p.right = None }
                }
                let data = self.release_node(n);
                self.free.free(data);
                current = parent;
            }
        }
    }
}

impl<T, C, F, A> Tree<T, C, F, A>
where T: Debug,
      C: TreeCompare<T>,
      F: TreeFree<T>,
      A: Allocator
{
    /// Logs every node with its links and color at trace level.
    pub fn log_structure(&self) {
        log::trace!("Tree with {} nodes, root {:?}", self.size, self.root);
        if let Some(r) = self.get_root() { r.log_structure(0) }
    }
}

impl<T, C, F, A> Drop for Tree<T, C, F, A>
where C: TreeCompare<T>,
      F: TreeFree<T>,
      A: Allocator
{
    fn drop(&mut self) { self.clear() }
}

impl<'a, T, C, F, A> IntoIterator for &'a Tree<T, C, F, A>
where C: TreeCompare<T>,
      F: TreeFree<T>,
      A: Allocator
{
    type Item = &'a T;
    type IntoIter = TreeIterator<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        TreeIterator::new(self.root, self.size)
    }
}

impl<T, C, F, A> Debug for Tree<T, C, F, A>
where T: Debug,
      C: TreeCompare<T>,
      F: TreeFree<T>,
      A: Allocator
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C, F, A> Display for Tree<T, C, F, A>
where T: Display,
      C: TreeCompare<T>,
      F: TreeFree<T>,
      A: Allocator
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() { return write!(f, "Tree [ ]") }
        let items: Vec<String> = self.iter().map(|v| format!("{}", v)).collect();
        write!(f, "Tree [ {} ]", items.join(", "))
    }
}
