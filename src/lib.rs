pub mod tree {
    pub mod callback;
    pub mod error;
    pub mod iter;
    pub mod map;
    pub mod node;
    pub mod rbtree;
}
pub mod structs {
    pub mod string;
    pub mod vector;
}

pub use tree::{
    callback::{ CompareGreater, CompareLess, DropFree, TreeCompare, TreeFree, TreeVisitor },
    error::TreeError,
    map::Map,
    rbtree::Tree
};
