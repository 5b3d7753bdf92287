use crate::tree::{
    callback::{ DropFree, TreeCompare },
    rbtree::Tree
};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    coords: Vec<f64>
}

impl Vector {
    pub fn new(coords: Vec<f64>) -> Self { Self { coords } }
    pub fn coords(&self) -> &[f64] { &self.coords }
    pub fn len(&self) -> usize { self.coords.len() }
    pub fn is_empty(&self) -> bool { self.coords.is_empty() }
    /// Euclidean (L2) norm. Zero for a vector with no coordinates.
    pub fn norm(&self) -> f64 {
        self.coords.iter().map(|c| c * c).sum::<f64>().sqrt()
    }
}

impl From<Vec<f64>> for Vector {
    fn from(coords: Vec<f64>) -> Self { Self::new(coords) }
}

/// Compares coordinate by coordinate: the first larger coordinate decides.
/// If one vector is a prefix of the other, the shorter one is smaller.
pub struct VectorCompare;
impl TreeCompare<Vector> for VectorCompare {
    fn compare(&self, d0: &Vector, d1: &Vector) -> Ordering {
        for (a, b) in d0.coords.iter().zip(d1.coords.iter()) {
            match a.total_cmp(b) {
                Ordering::Equal => continue,
                ord => return ord
            }
        }
        d0.len().cmp(&d1.len())
    }
}

pub type VectorTree = Tree<Vector, VectorCompare, DropFree>;

impl VectorTree {
    pub fn new_vectors() -> Self { Self::new(VectorCompare, DropFree) }
}

/// Replaces `max` with a copy of `vector` if `vector` has a strictly larger norm,
/// or if there is no maximum yet. Vectors without coordinates never replace it.
/// Returns whether `max` was replaced.
pub fn copy_if_norm_is_larger(vector: &Vector, max: &mut Option<Vector>) -> bool {
    if vector.is_empty() { return false }
    match max {
        Some(m) if m.norm() >= vector.norm() => false,
        Some(m) => {
            m.coords.clone_from(&vector.coords);
            true
        },
        None => {
            *max = Some(vector.clone());
            true
        }
    }
}

/// Copy of the vector with the largest norm. Among equal norms the one found first
/// in tree order wins.
pub fn find_max_norm_vector(tree: &VectorTree) -> Option<Vector> {
    let mut max = None;
    let _ = tree.for_each(|v: &Vector| {
        copy_if_norm_is_larger(v, &mut max);
        true
    });
    max
}

#[cfg(test)]
pub mod tests {
    use super::{ copy_if_norm_is_larger, find_max_norm_vector, Vector, VectorCompare, VectorTree };
    use crate::tree::callback::TreeCompare;
    use pretty_assertions::assert_eq;
    use std::{
        cmp::Ordering,
        error::Error
    };

    type TestReturn = Result<(), Box<dyn Error>>;

    #[test]
    pub fn vector_norm() -> TestReturn {
        assert!(Vector::from(vec![3.0, 4.0]).norm() == 5.0, "Norm of (3, 4) should be 5");
        assert!(Vector::default().norm() == 0.0, "Empty vector has zero norm");
        Ok(())
    }

    #[test]
    pub fn compare_element_by_element() -> TestReturn {
        let cmp = VectorCompare;
        let a = Vector::from(vec![1.0, 2.0, 3.0]);
        let b = Vector::from(vec![1.0, 5.0]);
        let c = Vector::from(vec![1.0, 2.0]);
        assert!(cmp.compare(&a, &b) == Ordering::Less, "First larger coordinate should decide");
        assert!(cmp.compare(&c, &a) == Ordering::Less, "Shorter prefix should be smaller");
        assert!(cmp.compare(&a, &a.clone()) == Ordering::Equal, "Same coordinates should be equal");
        Ok(())
    }

    #[test]
    pub fn copy_keeps_larger_norm() -> TestReturn {
        let mut max = None;
        assert!(!copy_if_norm_is_larger(&Vector::default(), &mut max), "Empty vector should never win");
        assert!(max.is_none(), "Max should still be unset");
        assert!(copy_if_norm_is_larger(&Vector::from(vec![1.0, 1.0]), &mut max), "First vector should win");
        assert!(copy_if_norm_is_larger(&Vector::from(vec![0.0, 3.0, 0.0]), &mut max), "Larger norm should win");
        assert!(!copy_if_norm_is_larger(&Vector::from(vec![-3.0]), &mut max), "Tie should keep current max");
        assert_eq!(max, Some(Vector::from(vec![0.0, 3.0, 0.0])));
        Ok(())
    }

    #[test]
    pub fn find_max_norm_in_tree() -> TestReturn {
        let mut tree = VectorTree::new_vectors();
        assert!(find_max_norm_vector(&tree).is_none(), "Empty tree has no maximum");
        for v in [vec![1.0, 2.0], vec![-7.0], vec![2.0, 2.0, 2.0], vec![0.5; 10]] {
            tree.insert(Vector::from(v))?;
        }
        let max = find_max_norm_vector(&tree);
        assert_eq!(max, Some(Vector::from(vec![-7.0])));
        // the result is a copy, the tree still holds its own
        assert!(tree.len() == 4, "Tree should still have 4 vectors, got {}", tree.len());
        assert!(tree.contains(&Vector::from(vec![-7.0])), "Tree should still hold (-7)");
        Ok(())
    }
}
