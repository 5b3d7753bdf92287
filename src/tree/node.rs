use std::{
    fmt::Debug,
    ptr::NonNull
};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeColor {
    Red = 0,
    Black
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeDirection {
    Left = 0,
    Right
}

impl NodeDirection {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left
        }
    }
}

pub(crate) type NodePtr<T> = NonNull<TreeNode<T>>;
// None stands for the (black) nil leaf
pub(crate) type Link<T> = Option<NodePtr<T>>;

/// A tree vertex. Links are non-owning: the tree owns every node reachable from its root.
#[repr(C)]
pub struct TreeNode<T> {
    pub(crate) left: Link<T>,
    pub(crate) parent: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) color: NodeColor,
    pub(crate) data: T
}

impl<T> TreeNode<T> {
    // new nodes always start red
    pub(crate) fn new(data: T) -> Self {
        Self { left: None, parent: None, right: None, color: NodeColor::Red, data }
    }

    pub fn data(&self) -> &T { &self.data }
    pub fn color(&self) -> NodeColor { self.color }

    // SAFETY (all getters): links only ever point at live nodes owned by the same tree
    pub fn get_parent(&self) -> Option<&Self> { self.parent.map(|p| unsafe { &*p.as_ptr() }) }
    pub fn get_left(&self) -> Option<&Self> { self.left.map(|p| unsafe { &*p.as_ptr() }) }
    pub fn get_right(&self) -> Option<&Self> { self.right.map(|p| unsafe { &*p.as_ptr() }) }

    pub(crate) fn child(&self, dir: NodeDirection) -> Link<T> {
        match dir {
            NodeDirection::Left => self.left,
            NodeDirection::Right => self.right
        }
    }

    pub(crate) fn set_child(&mut self, dir: NodeDirection, child: Link<T>) {
        match dir {
            NodeDirection::Left => self.left = child,
            NodeDirection::Right => self.right = child
        }
    }
}

/// Color of a possibly absent node. Absent children count as black.
/// SAFETY: `link` must be None or point at a live node.
pub(crate) unsafe fn color_of<T>(link: Link<T>) -> NodeColor {
    match link {
        Some(n) => (*n.as_ptr()).color,
        None => NodeColor::Black
    }
}

/// SAFETY: `link` must be None or point at a live node.
pub(crate) unsafe fn set_color<T>(link: Link<T>, color: NodeColor) {
    if let Some(n) = link { (*n.as_ptr()).color = color }
}

/// Leftmost node of the subtree rooted at `n`.
/// SAFETY: `n` must point at a live node.
pub(crate) unsafe fn leftmost<T>(n: NodePtr<T>) -> NodePtr<T> {
    let mut curr = n;
    while let Some(l) = (*curr.as_ptr()).left { curr = l }
    curr
}

/// SAFETY: `n` must point at a live node.
pub(crate) unsafe fn rightmost<T>(n: NodePtr<T>) -> NodePtr<T> {
    let mut curr = n;
    while let Some(r) = (*curr.as_ptr()).right { curr = r }
    curr
}

impl<T> TreeNode<T>
where T: Debug
{
    pub(crate) fn log_structure(&self, depth: usize) {
        if let Some(l) = self.get_left() { l.log_structure(depth + 1) }
        log::trace!("{:indent$}Node @ 0x{:x}: <l:{:?} p:{:?} r:{:?}> [{:?}, {:?}]", "",
            &raw const *self as usize, self.left, self.parent, self.right, self.data, self.color,
            indent = depth * 2);
        if let Some(r) = self.get_right() { r.log_structure(depth + 1) }
    }
}
