use crate::haplogroup::tree::{NodeId, ReferenceTree};
use crate::haplogroup::types::Mutation;
use std::collections::HashSet;

/// Scores closer than this are treated as equal.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Weighted sums behind one node's score.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BranchMetrics {
    /// Weight of the node's full defining set.
    pub expected: f64,
    /// Weight of the defining mutations present in the profile.
    pub matched: f64,
}

impl BranchMetrics {
    /// Weighted Kulczynski similarity, the mean of weighted recall and precision.
    ///
    /// Recall is `matched / expected`, precision is `matched / profile_weight`; an empty
    /// denominator contributes zero. The result lies in [0, 1].
    pub fn score(&self, profile_weight: f64) -> f64 {
        let recall = if self.expected > 0.0 {
            self.matched / self.expected
        } else {
            0.0
        };
        let precision = if profile_weight > 0.0 {
            self.matched / profile_weight
        } else {
            0.0
        };
        (0.5 * (recall + precision)).clamp(0.0, 1.0)
    }
}

/// Sum of the tree weights of a set of mutations.
pub fn total_weight<'a>(tree: &ReferenceTree, mutations: impl IntoIterator<Item = &'a Mutation>) -> f64 {
    mutations.into_iter().map(|m| tree.weight(m)).sum()
}

/// Metrics for every node in one pass over the arena.
///
/// The arena is breadth-first, so each node starts from its parent's sums and only adds its
/// own mutations and subtracts the reverted ones.
pub fn branch_metrics(tree: &ReferenceTree, profile: &HashSet<Mutation>) -> Vec<BranchMetrics> {
    let mut metrics: Vec<BranchMetrics> = Vec::with_capacity(tree.len());
    for (_, node) in tree.iter() {
        let mut bm = node.parent.map(|p| metrics[p]).unwrap_or_default();
        for mutation in &node.mutations {
            let w = tree.weight(mutation);
            bm.expected += w;
            if profile.contains(mutation) {
                bm.matched += w;
            }
        }
        for mutation in &node.reverted {
            let w = tree.weight(mutation);
            bm.expected -= w;
            if profile.contains(mutation) {
                bm.matched -= w;
            }
        }
        bm.expected = bm.expected.max(0.0);
        bm.matched = bm.matched.max(0.0);
        metrics.push(bm);
    }
    metrics
}

/// Scores a single node directly from its full defining set.
pub fn score_node(tree: &ReferenceTree, node: NodeId, profile: &HashSet<Mutation>) -> f64 {
    let expected = tree.expected_mutations(node);
    let bm = BranchMetrics {
        expected: total_weight(tree, expected),
        matched: total_weight(tree, expected.iter().filter(|m| profile.contains(*m))),
    };
    bm.score(total_weight(tree, profile))
}
