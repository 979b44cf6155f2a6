/*!
 * Disjoint-set structure over quote ids.
 *
 * Cross-language equivalence is transitive: if A matches B and B matches C,
 * all three belong to one bilingual group. Modelling the classes as a
 * union-find keeps that consistent no matter in which order pairs are
 * discovered.
 */

use std::collections::HashMap;

/// Union-find with path compression and union by rank
#[derive(Debug, Default, Clone)]
pub struct UnionFind {
    parent: HashMap<i64, i64>,
    rank: HashMap<i64, u32>,
}

impl UnionFind {
    /// Create an empty structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element as its own singleton class
    pub fn insert(&mut self, id: i64) {
        self.parent.entry(id).or_insert(id);
        self.rank.entry(id).or_insert(0);
    }

    /// Find the representative of an element's class, compressing the path.
    /// Unknown elements are registered on the fly.
    pub fn find(&mut self, id: i64) -> i64 {
        self.insert(id);

        // Walk up to the root
        let mut root = id;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }

        // Compress the path behind us
        let mut current = id;
        while self.parent[&current] != root {
            let next = self.parent[&current];
            self.parent.insert(current, root);
            current = next;
        }

        root
    }

    /// Merge the classes of two elements
    pub fn union(&mut self, a: i64, b: i64) {
        let root_a = self.find(a);
        let root_b = self.find(b);

        if root_a == root_b {
            return;
        }

        let rank_a = self.rank[&root_a];
        let rank_b = self.rank[&root_b];

        if rank_a < rank_b {
            self.parent.insert(root_a, root_b);
        } else if rank_a > rank_b {
            self.parent.insert(root_b, root_a);
        } else {
            self.parent.insert(root_b, root_a);
            self.rank.insert(root_a, rank_a + 1);
        }
    }

    /// Whether two elements share a class
    pub fn connected(&mut self, a: i64, b: i64) -> bool {
        self.find(a) == self.find(b)
    }

    /// All classes, members sorted ascending. Order of the outer vec is
    /// deterministic (sorted by the smallest member).
    pub fn classes(&mut self) -> Vec<Vec<i64>> {
        let ids: Vec<i64> = self.parent.keys().copied().collect();
        let mut by_root: HashMap<i64, Vec<i64>> = HashMap::new();
        for id in ids {
            let root = self.find(id);
            by_root.entry(root).or_default().push(id);
        }

        let mut classes: Vec<Vec<i64>> = by_root.into_values().collect();
        for class in &mut classes {
            class.sort_unstable();
        }
        classes.sort_unstable_by_key(|class| class[0]);
        classes
    }
}
