//! Pair catalog - every admissible cross-group pairing

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::registry::{TeamId, TeamRegistry};

/// Unordered pair of teams, stored with the smaller id first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pair {
    a: TeamId,
    b: TeamId,
}

impl Pair {
    pub fn new(x: TeamId, y: TeamId) -> Self {
        debug_assert_ne!(x, y, "a team cannot be paired with itself");
        Self { a: x.min(y), b: x.max(y) }
    }

    pub fn a(&self) -> TeamId {
        self.a
    }

    pub fn b(&self) -> TeamId {
        self.b
    }

    pub fn teams(&self) -> (TeamId, TeamId) {
        (self.a, self.b)
    }

    pub fn contains(&self, team: TeamId) -> bool {
        self.a == team || self.b == team
    }
}

/// Immutable list of all admissible pairs for one session
///
/// Pairs are enumerated group pair by group pair (`i < j`), and within a
/// group pair as every team of `i` against every team of `j`.
#[derive(Clone, Debug)]
pub struct PairCatalog {
    pairs: Vec<Pair>,
}

impl PairCatalog {
    pub fn build(registry: &TeamRegistry) -> Self {
        let groups = registry.groups();
        let mut pairs = Vec::new();
        for (i, group_i) in groups.iter().enumerate() {
            for group_j in &groups[i + 1..] {
                for &t1 in group_i {
                    for &t2 in group_j {
                        pairs.push(Pair::new(t1, t2));
                    }
                }
            }
        }

        Self { pairs }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, pair: &Pair) -> bool {
        self.pairs.contains(pair)
    }

    /// Fresh shuffled copy for one attempt; the catalog itself never changes
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Pair> {
        let mut pairs = self.pairs.clone();
        pairs.shuffle(rng);
        pairs
    }
}
