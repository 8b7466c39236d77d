use std::collections::BTreeSet;
use std::hash::Hash;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition is a different view on an equivalence relation, by grouping elements of
/// type `I` into their respective classes under the relation. Classes are kept in the order
/// of their smallest element.
#[derive(Debug, Clone)]
pub struct Partition<I: Hash + Eq>(Vec<BTreeSet<I>>);

impl<I: Hash + Eq> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Hash + Eq> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Hash + Eq> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Hash + Eq> Eq for Partition<I> {}

impl<I: Hash + Eq + Ord + Copy> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators
    /// which yield elements of type `I`. Empty classes are dropped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        let mut classes: Vec<BTreeSet<I>> = iter
            .into_iter()
            .map(|it| it.into_iter().collect::<BTreeSet<_>>())
            .filter(|class| !class.is_empty())
            .collect();
        classes.sort_by_key(|class| class.first().copied());
        Self(classes)
    }

    /// Returns the position of the class that contains `element`, if there is one.
    pub fn class_of(&self, element: I) -> Option<usize> {
        self.0.iter().position(|class| class.contains(&element))
    }

    /// Returns a map which sends every element to the position of its class.
    pub fn class_map(&self) -> Map<I, usize> {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(i, class)| class.iter().map(move |x| (*x, i)))
            .collect()
    }
}

impl<I: Hash + Eq + Ord + Copy> From<Vec<BTreeSet<I>>> for Partition<I> {
    fn from(value: Vec<BTreeSet<I>>) -> Self {
        Self::new(value)
    }
}
