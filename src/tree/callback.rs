use std::cmp::Ordering;

// Capabilities a tree is configured with. Closures can be used for all three.

/// Total order over stored items. Must stay consistent for the lifetime of the tree.
pub trait TreeCompare<T> {
    fn compare(&self, d0: &T, d1: &T) -> Ordering;
}

/// Releases an item once the tree gives it up (on removal or teardown).
/// Implementations must not panic: teardown has no way to resume afterwards.
pub trait TreeFree<T> {
    fn free(&self, data: T);
}

/// Called once per item during an in-order walk. Return `false` to stop early.
pub trait TreeVisitor<T> {
    fn visit(&mut self, data: &T) -> bool;
}

pub struct CompareLess; // ascending, like std::less
impl<T: Ord> TreeCompare<T> for CompareLess {
    fn compare(&self, d0: &T, d1: &T) -> Ordering { d0.cmp(d1) }
}

pub struct CompareGreater; // descending, like std::greater
impl<T: Ord> TreeCompare<T> for CompareGreater {
    fn compare(&self, d0: &T, d1: &T) -> Ordering { d1.cmp(d0) }
}

impl<T, F> TreeCompare<T> for F
where F: Fn(&T, &T) -> Ordering
{
    fn compare(&self, d0: &T, d1: &T) -> Ordering { self(d0, d1) }
}

/// Hands the item to its own `Drop` impl.
pub struct DropFree;
impl<T> TreeFree<T> for DropFree {
    fn free(&self, data: T) { drop(data) }
}

impl<T, F> TreeFree<T> for F
where F: Fn(T)
{
    fn free(&self, data: T) { self(data) }
}

impl<T, F> TreeVisitor<T> for F
where F: FnMut(&T) -> bool
{
    fn visit(&mut self, data: &T) -> bool { self(data) }
}
