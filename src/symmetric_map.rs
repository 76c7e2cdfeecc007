use fnv::FnvHashMap;

/// A map keyed by unordered index pairs, so `(a, b)` and `(b, a)` are the same key.
#[derive(Clone, Debug, Default)]
pub struct SymmetricMap<T> {
    map: FnvHashMap<(usize, usize), T>,
}

impl<T> SymmetricMap<T> {
    pub fn new() -> Self {
        SymmetricMap {
            map: FnvHashMap::default(),
        }
    }

    fn order_indices(i1: usize, i2: usize) -> (usize, usize) {
        if i1 > i2 {
            (i2, i1)
        } else {
            (i1, i2)
        }
    }

    pub fn get(&self, i1: usize, i2: usize) -> Option<&T> {
        self.map.get(&Self::order_indices(i1, i2))
    }

    /// Keeps the existing value if the pair is already present.
    pub fn insert_first(&mut self, i1: usize, i2: usize, value: T) {
        self.map
            .entry(Self::order_indices(i1, i2))
            .or_insert(value);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}
