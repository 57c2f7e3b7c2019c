use crate::error::{HaplocheckError, Result};
use crate::haplogroup::tree::{NodeSpec, ReferenceTree, TreeBuilder};
use crate::haplogroup::types::Mutation;
use log::{debug, info, trace};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[derive(Deserialize, Debug)]
struct MtSnp {
    /// Insertions carry a fractional position such as `315.1`.
    #[serde(alias = "position")]
    pos: f64,
    #[serde(default)]
    ancestral: String,
    derived: String,
    #[serde(default)]
    back_mutation: bool,
}

#[derive(Deserialize, Debug)]
struct MtHaplogroup {
    name: String,
    #[serde(default)]
    snps: Vec<MtSnp>,
    #[serde(default)]
    children: Vec<MtHaplogroup>,
}

/// Loads the phylogeny and, optionally, its weight table.
///
/// Both files may be plain or compressed (gzip, bzip2, xz, zstd).
pub fn load_tree(
    tree_path: &Path,
    weights_path: Option<&Path>,
    version: &str,
    default_weight: f64,
) -> Result<ReferenceTree> {
    let reader = open(tree_path)?;
    let specs = parse_tree_json(reader)?;

    let weights = match weights_path {
        Some(path) => parse_weights(open(path)?)?,
        None => HashMap::new(),
    };

    let tree = TreeBuilder::new(version)
        .nodes(specs)
        .weights(weights)
        .default_weight(default_weight)
        .build()?;

    info!(
        "Loaded phylogeny {} from {} ({} haplogroups)",
        tree.version(),
        tree_path.display(),
        tree.len()
    );
    Ok(tree)
}

fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| HaplocheckError::io(e, path))?;
    let (reader, _format) = niffler::get_reader(Box::new(file)).map_err(|e| {
        HaplocheckError::reference(format!("cannot open {}: {}", path.display(), e))
    })?;
    Ok(reader)
}

/// Flattens the nested `{name, snps, children}` layout into node specs, parents first.
pub fn parse_tree_json<R: Read>(reader: R) -> Result<Vec<NodeSpec>> {
    let root: MtHaplogroup = serde_json::from_reader(reader)
        .map_err(|e| HaplocheckError::reference(format!("malformed phylogeny JSON: {}", e)))?;

    let mut specs = Vec::new();
    let mut skipped = 0usize;
    let mut stack: Vec<(MtHaplogroup, Option<String>)> = vec![(root, None)];
    while let Some((haplogroup, parent)) = stack.pop() {
        let mut mutations = Vec::new();
        let mut back_mutations = Vec::new();
        for snp in &haplogroup.snps {
            let Some(mutation) = snp_to_mutation(snp) else {
                trace!(
                    "Haplogroup {}: skipping {} > {} at {}",
                    haplogroup.name,
                    snp.ancestral,
                    snp.derived,
                    snp.pos
                );
                skipped += 1;
                continue;
            };
            if snp.back_mutation {
                back_mutations.push(mutation);
            } else {
                mutations.push(mutation);
            }
        }

        for child in haplogroup.children.into_iter().rev() {
            stack.push((child, Some(haplogroup.name.clone())));
        }

        specs.push(NodeSpec {
            label: haplogroup.name,
            parent,
            mutations,
            back_mutations,
        });
    }

    if skipped > 0 {
        debug!("Skipped {} non-SNV defining mutation(s) in the phylogeny", skipped);
    }
    Ok(specs)
}

/// Single-base substitutions only; indels can never match a profile.
fn snp_to_mutation(snp: &MtSnp) -> Option<Mutation> {
    if snp.pos < 1.0 || snp.pos.fract() != 0.0 || snp.pos > u32::MAX as f64 {
        return None;
    }
    let mut derived = snp.derived.trim().chars();
    match (derived.next(), derived.next()) {
        (Some(base), None) if matches!(base.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T') => {
            Some(Mutation::new(snp.pos as u32, base))
        }
        _ => None,
    }
}

/// Parses `<mutation> <weight>` lines; `#` starts a comment.
pub fn parse_weights<R: Read>(reader: R) -> Result<HashMap<Mutation, f64>> {
    let mut weights = HashMap::new();
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(mutation), Some(weight)) = (fields.next(), fields.next()) else {
            return Err(HaplocheckError::reference(format!(
                "weights line {}: expected '<mutation> <weight>'",
                idx + 1
            )));
        };
        let mutation: Mutation = mutation
            .parse()
            .map_err(|e| HaplocheckError::reference(format!("weights line {}: {}", idx + 1, e)))?;
        let weight: f64 = weight.parse().map_err(|_| {
            HaplocheckError::reference(format!(
                "weights line {}: '{}' is not a number",
                idx + 1,
                weight
            ))
        })?;
        weights.insert(mutation, weight);
    }
    Ok(weights)
}
