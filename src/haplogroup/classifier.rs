use crate::haplogroup::scoring::{branch_metrics, total_weight, SCORE_EPSILON};
use crate::haplogroup::tree::{NodeId, ReferenceTree};
use crate::haplogroup::types::{HaplogroupAssignment, Mutation, MutationProfile};
use log::debug;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Finds the haplogroup whose defining path best explains the profile.
///
/// Every node is scored; the best score wins, ties go to the deeper node and then to the
/// lexically smaller label. Empty profiles, and profiles nothing in the tree matches, come back
/// as the root with quality 0.
pub fn classify(tree: &ReferenceTree, profile: &MutationProfile) -> HaplogroupAssignment {
    let mutations: Vec<Mutation> = {
        let mut m = profile.mutations();
        m.sort();
        m.dedup();
        m
    };
    if mutations.is_empty() {
        return unassigned(tree, profile, Vec::new());
    }

    let profile_set: HashSet<Mutation> = mutations.iter().copied().collect();
    let profile_weight = total_weight(tree, &mutations);
    let scores: Vec<f64> = branch_metrics(tree, &profile_set)
        .iter()
        .map(|bm| bm.score(profile_weight))
        .collect();

    let best = (0..tree.len())
        .max_by(|&a, &b| compare_candidates(tree, &scores, a, b))
        .unwrap_or_else(|| tree.root());
    let quality = scores[best];
    if quality <= 0.0 {
        return unassigned(tree, profile, mutations);
    }

    let mut tied_with: Vec<String> = (0..tree.len())
        .filter(|&id| id != best && (scores[id] - quality).abs() <= SCORE_EPSILON)
        .map(|id| tree.label(id).to_string())
        .collect();
    tied_with.sort();
    if !tied_with.is_empty() {
        debug!(
            "Sample {} ({}): {} ties with {} at score {:.4}",
            profile.sample_id,
            profile.tag,
            tree.label(best),
            tied_with.join(", "),
            quality
        );
    }

    let expected = tree.expected_mutations(best);
    let (matched, unexplained): (Vec<Mutation>, Vec<Mutation>) = mutations
        .iter()
        .copied()
        .partition(|m| expected.binary_search(m).is_ok());

    HaplogroupAssignment {
        tag: profile.tag,
        haplogroup: tree.label(best).to_string(),
        node: best,
        quality: quality.clamp(0.0, 1.0),
        depth: tree.node(best).depth,
        matched,
        unexplained,
        tied_with,
    }
}

/// `Greater` means `a` is the better candidate.
fn compare_candidates(tree: &ReferenceTree, scores: &[f64], a: NodeId, b: NodeId) -> Ordering {
    let (sa, sb) = (scores[a], scores[b]);
    if (sa - sb).abs() > SCORE_EPSILON {
        return sa.partial_cmp(&sb).unwrap_or(Ordering::Equal);
    }
    tree.node(a)
        .depth
        .cmp(&tree.node(b).depth)
        .then_with(|| tree.label(b).cmp(tree.label(a)))
}

fn unassigned(
    tree: &ReferenceTree,
    profile: &MutationProfile,
    unexplained: Vec<Mutation>,
) -> HaplogroupAssignment {
    let root = tree.root();
    HaplogroupAssignment {
        tag: profile.tag,
        haplogroup: tree.label(root).to_string(),
        node: root,
        quality: 0.0,
        depth: 0,
        matched: Vec::new(),
        unexplained,
        tied_with: Vec::new(),
    }
}
