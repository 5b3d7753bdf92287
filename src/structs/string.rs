use crate::tree::{
    callback::{ DropFree, TreeCompare },
    rbtree::Tree
};
use std::cmp::Ordering;

/// Byte-wise lexicographic order, the same order `strcmp` gives.
pub struct StringCompare;
impl TreeCompare<String> for StringCompare {
    fn compare(&self, d0: &String, d1: &String) -> Ordering {
        d0.as_bytes().cmp(d1.as_bytes())
    }
}

pub type StringTree = Tree<String, StringCompare, DropFree>;

impl StringTree {
    pub fn new_strings() -> Self { Self::new(StringCompare, DropFree) }
}

/// Joins every word in order, each one followed by a newline.
pub fn concatenate(tree: &StringTree) -> String {
    let mut out = String::with_capacity(tree.iter().map(|w| w.len() + 1).sum());
    let _ = tree.for_each(|w: &String| {
        out.push_str(w);
        out.push('\n');
        true
    });
    out
}
