use crate::tree::node::{ Link, TreeNode };
use std::marker::PhantomData;

/// In-order iterator. Keeps the path of pending ancestors on an explicit stack
/// instead of recursing.
pub struct TreeIterator<'a, T> {
    current: Link<T>,
    stack: Vec<&'a TreeNode<T>>,
    remaining: usize,
    _marker: PhantomData<&'a T>
}

impl<'a, T> TreeIterator<'a, T> {
    pub(crate) fn new(root: Link<T>, len: usize) -> Self {
        Self { current: root, stack: vec![], remaining: len, _marker: PhantomData }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: nodes live as long as the shared borrow of the tree ('a)
        while let Some(n) = self.current {
            let node = unsafe { &*n.as_ptr() };
            self.stack.push(node);
            self.current = node.left;
        }
        let out = self.stack.pop()?;
        self.current = out.right;
        self.remaining -= 1;
        Some(&out.data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for TreeIterator<'a, T> {}
