use crate::error::{HaplocheckError, Result};
use crate::haplogroup::types::Mutation;
use log::debug;
use std::collections::{HashMap, VecDeque};

/// Index of a node in the [`ReferenceTree`] arena.
pub type NodeId = usize;

/// A haplogroup as handed over by a loader, before the tree is validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub label: String,
    pub parent: Option<String>,
    pub mutations: Vec<Mutation>,
    /// Back mutations: the inherited mutation at each of these positions is reverted.
    pub back_mutations: Vec<Mutation>,
}

impl NodeSpec {
    pub fn new(label: impl Into<String>, parent: Option<&str>, mutations: Vec<Mutation>) -> Self {
        Self {
            label: label.into(),
            parent: parent.map(str::to_string),
            mutations,
            back_mutations: Vec::new(),
        }
    }

    pub fn with_back_mutations(mut self, back_mutations: Vec<Mutation>) -> Self {
        self.back_mutations = back_mutations;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub label: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: u32,
    /// Defining mutations on the edge from the parent.
    pub mutations: Vec<Mutation>,
    /// Inherited mutations this node no longer carries.
    pub reverted: Vec<Mutation>,
    /// Full defining set from the root down to this node, sorted.
    path_mutations: Vec<Mutation>,
}

/// Rooted, immutable mitochondrial phylogeny.
///
/// Nodes live in one arena and reference each other by index, so a `&ReferenceTree` can be
/// shared by any number of classifier threads.
#[derive(Debug, Clone)]
pub struct ReferenceTree {
    version: String,
    nodes: Vec<TreeNode>,
    labels: HashMap<String, NodeId>,
    weights: HashMap<Mutation, f64>,
    default_weight: f64,
    root: NodeId,
}

#[derive(Debug, Default)]
pub struct TreeBuilder {
    version: String,
    specs: Vec<NodeSpec>,
    weights: HashMap<Mutation, f64>,
    default_weight: Option<f64>,
}

impl TreeBuilder {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn node(mut self, spec: NodeSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn nodes(mut self, specs: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    pub fn weights(mut self, weights: HashMap<Mutation, f64>) -> Self {
        self.weights = weights;
        self
    }

    /// Weight of mutations missing from the weight table.
    pub fn default_weight(mut self, weight: f64) -> Self {
        self.default_weight = Some(weight);
        self
    }

    /// Validates the structure and lays the nodes out in breadth-first order.
    pub fn build(self) -> Result<ReferenceTree> {
        let default_weight = self.default_weight.unwrap_or(1.0);
        if !default_weight.is_finite() || default_weight <= 0.0 {
            return Err(HaplocheckError::reference(format!(
                "default mutation weight must be positive, got {}",
                default_weight
            )));
        }
        for (mutation, weight) in &self.weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(HaplocheckError::reference(format!(
                    "weight of {} must be positive, got {}",
                    mutation, weight
                )));
            }
        }
        if self.specs.is_empty() {
            return Err(HaplocheckError::reference("tree has no nodes"));
        }

        let mut spec_index: HashMap<&str, usize> = HashMap::with_capacity(self.specs.len());
        for (idx, spec) in self.specs.iter().enumerate() {
            if spec.label.is_empty() {
                return Err(HaplocheckError::reference("haplogroup with an empty label"));
            }
            if spec_index.insert(spec.label.as_str(), idx).is_some() {
                return Err(HaplocheckError::reference(format!(
                    "haplogroup '{}' is defined more than once",
                    spec.label
                )));
            }
        }

        let roots: Vec<usize> = (0..self.specs.len())
            .filter(|&idx| self.specs[idx].parent.is_none())
            .collect();
        let root_spec = match roots.as_slice() {
            [] => return Err(HaplocheckError::reference("tree has no root node")),
            [root] => *root,
            _ => {
                return Err(HaplocheckError::reference(format!(
                    "tree has {} root nodes",
                    roots.len()
                )))
            }
        };

        let mut spec_children: Vec<Vec<usize>> = vec![Vec::new(); self.specs.len()];
        for (idx, spec) in self.specs.iter().enumerate() {
            if let Some(parent) = &spec.parent {
                let parent_idx = *spec_index.get(parent.as_str()).ok_or_else(|| {
                    HaplocheckError::reference(format!(
                        "haplogroup '{}' names unknown parent '{}'",
                        spec.label, parent
                    ))
                })?;
                spec_children[parent_idx].push(idx);
            }
        }

        // Breadth-first from the root; anything not reached sits on a cycle.
        let mut order = Vec::with_capacity(self.specs.len());
        let mut arena_index = vec![usize::MAX; self.specs.len()];
        let mut queue = VecDeque::from([root_spec]);
        while let Some(idx) = queue.pop_front() {
            arena_index[idx] = order.len();
            order.push(idx);
            queue.extend(spec_children[idx].iter().copied());
        }
        if order.len() != self.specs.len() {
            let stray: Vec<&str> = (0..self.specs.len())
                .filter(|&idx| arena_index[idx] == usize::MAX)
                .map(|idx| self.specs[idx].label.as_str())
                .take(5)
                .collect();
            return Err(HaplocheckError::reference(format!(
                "{} haplogroups are not reachable from the root (cycle?): {}",
                self.specs.len() - order.len(),
                stray.join(", ")
            )));
        }

        let mut nodes: Vec<TreeNode> = Vec::with_capacity(order.len());
        for &spec_idx in &order {
            let spec = &self.specs[spec_idx];
            let parent = spec
                .parent
                .as_deref()
                .map(|label| arena_index[spec_index[label]]);
            let (depth, inherited) = match parent {
                Some(p) => (nodes[p].depth + 1, nodes[p].path_mutations.as_slice()),
                None => (0, &[][..]),
            };

            let mut own = spec.mutations.clone();
            own.sort();
            own.dedup();

            // A back mutation or a recurrent mutation replaces what the path carried there.
            let reverted: Vec<Mutation> = inherited
                .iter()
                .filter(|m| {
                    spec.back_mutations.iter().any(|b| b.position == m.position)
                        || own.iter().any(|o| o.position == m.position)
                })
                .copied()
                .collect();

            let mut path_mutations: Vec<Mutation> = inherited
                .iter()
                .filter(|m| !reverted.contains(m))
                .copied()
                .chain(own.iter().copied())
                .collect();
            path_mutations.sort();

            nodes.push(TreeNode {
                label: spec.label.clone(),
                parent,
                children: spec_children[spec_idx]
                    .iter()
                    .map(|&c| arena_index[c])
                    .collect(),
                depth,
                mutations: own,
                reverted,
                path_mutations,
            });
        }

        let labels = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.label.clone(), idx))
            .collect();

        debug!(
            "Built reference tree {} with {} nodes and {} weighted mutations",
            self.version,
            nodes.len(),
            self.weights.len()
        );

        Ok(ReferenceTree {
            version: self.version,
            nodes,
            labels,
            weights: self.weights,
            default_weight,
            root: 0,
        })
    }
}

impl ReferenceTree {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.nodes[id].label
    }

    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).copied()
    }

    /// Nodes in breadth-first order; a parent always precedes its children.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().enumerate()
    }

    /// Own plus inherited defining mutations of a node, sorted.
    pub fn expected_mutations(&self, id: NodeId) -> &[Mutation] {
        &self.nodes[id].path_mutations
    }

    pub fn weight(&self, mutation: &Mutation) -> f64 {
        self.weights
            .get(mutation)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Node ids from `id` up to and including the root.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Number of edges on the path between two nodes.
    pub fn distance(&self, a: NodeId, b: NodeId) -> u32 {
        let (mut a, mut b) = (a, b);
        let mut edges = 0;
        while self.nodes[a].depth > self.nodes[b].depth {
            a = self.parent_of(a);
            edges += 1;
        }
        while self.nodes[b].depth > self.nodes[a].depth {
            b = self.parent_of(b);
            edges += 1;
        }
        while a != b {
            a = self.parent_of(a);
            b = self.parent_of(b);
            edges += 2;
        }
        edges
    }

    /// The child of the root that `id` descends from; the root for the root itself.
    pub fn top_level_clade(&self, id: NodeId) -> NodeId {
        let path = self.path_to_root(id);
        if path.len() >= 2 {
            path[path.len() - 2]
        } else {
            self.root
        }
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        // Only the root lacks a parent and the depth checks above never step past it.
        self.nodes[id].parent.unwrap_or(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> Mutation {
        s.parse().unwrap()
    }

    fn small_tree() -> ReferenceTree {
        TreeBuilder::new("test")
            .node(NodeSpec::new("mt-MRCA", None, vec![]))
            .node(NodeSpec::new("L3", Some("mt-MRCA"), vec![m("769G"), m("1018G")]))
            .node(NodeSpec::new("N", Some("L3"), vec![m("8701A")]))
            .node(NodeSpec::new("R", Some("N"), vec![m("12705C")]))
            .node(NodeSpec::new("H", Some("R"), vec![m("2706A")]))
            .node(
                NodeSpec::new("H1", Some("H"), vec![m("3010A")])
                    .with_back_mutations(vec![m("8701G")]),
            )
            .node(NodeSpec::new("L0", Some("mt-MRCA"), vec![m("263A")]))
            .build()
            .unwrap()
    }

    #[test]
    fn path_mutations_accumulate_and_honour_back_mutations() {
        let tree = small_tree();
        let h = tree.find("H").unwrap();
        assert_eq!(
            tree.expected_mutations(h),
            &[m("769G"), m("1018G"), m("2706A"), m("8701A"), m("12705C")]
        );
        let h1 = tree.find("H1").unwrap();
        assert!(!tree.expected_mutations(h1).contains(&m("8701A")));
        assert!(tree.expected_mutations(h1).contains(&m("3010A")));
        assert_eq!(tree.node(h1).reverted, vec![m("8701A")]);
    }

    #[test]
    fn distance_and_clades() {
        let tree = small_tree();
        let h1 = tree.find("H1").unwrap();
        let l0 = tree.find("L0").unwrap();
        let n = tree.find("N").unwrap();
        assert_eq!(tree.distance(h1, l0), 6);
        assert_eq!(tree.distance(h1, n), 3);
        assert_eq!(tree.distance(n, n), 0);
        assert_eq!(tree.label(tree.top_level_clade(h1)), "L3");
        assert_eq!(tree.top_level_clade(tree.root()), tree.root());
        assert_eq!(tree.path_to_root(n).len(), 3);
    }

    #[test]
    fn rejects_structural_problems() {
        let no_root = TreeBuilder::new("t")
            .node(NodeSpec::new("A", Some("B"), vec![]))
            .node(NodeSpec::new("B", Some("A"), vec![]))
            .build();
        assert!(matches!(no_root, Err(HaplocheckError::ReferenceData(_))));

        let two_roots = TreeBuilder::new("t")
            .node(NodeSpec::new("A", None, vec![]))
            .node(NodeSpec::new("B", None, vec![]))
            .build();
        assert!(matches!(two_roots, Err(HaplocheckError::ReferenceData(_))));

        let cycle = TreeBuilder::new("t")
            .node(NodeSpec::new("root", None, vec![]))
            .node(NodeSpec::new("A", Some("B"), vec![]))
            .node(NodeSpec::new("B", Some("A"), vec![]))
            .build();
        assert!(matches!(cycle, Err(HaplocheckError::ReferenceData(_))));

        let unknown_parent = TreeBuilder::new("t")
            .node(NodeSpec::new("root", None, vec![]))
            .node(NodeSpec::new("A", Some("missing"), vec![]))
            .build();
        assert!(matches!(unknown_parent, Err(HaplocheckError::ReferenceData(_))));

        let duplicate = TreeBuilder::new("t")
            .node(NodeSpec::new("root", None, vec![]))
            .node(NodeSpec::new("A", Some("root"), vec![]))
            .node(NodeSpec::new("A", Some("root"), vec![]))
            .build();
        assert!(matches!(duplicate, Err(HaplocheckError::ReferenceData(_))));

        let bad_weight = TreeBuilder::new("t")
            .node(NodeSpec::new("root", None, vec![]))
            .weights(HashMap::from([(m("73G"), 0.0)]))
            .build();
        assert!(matches!(bad_weight, Err(HaplocheckError::ReferenceData(_))));
    }

    #[test]
    fn unknown_mutations_use_default_weight() {
        let tree = TreeBuilder::new("t")
            .node(NodeSpec::new("root", None, vec![]))
            .weights(HashMap::from([(m("73G"), 7.5)]))
            .default_weight(2.0)
            .build()
            .unwrap();
        assert_eq!(tree.weight(&m("73G")), 7.5);
        assert_eq!(tree.weight(&m("263G")), 2.0);
    }
}
