//! Mitochondrial phylogeny and haplogroup classification.

pub mod classifier;
pub mod loader;
pub mod scoring;
pub mod tree;
pub mod types;

pub use classifier::classify;
pub use loader::load_tree;
pub use tree::{NodeId, NodeSpec, ReferenceTree, TreeBuilder};
pub use types::{HaplogroupAssignment, Mutation, MutationProfile, ProfileEntry, ProfileTag};
