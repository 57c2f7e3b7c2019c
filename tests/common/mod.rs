#![allow(dead_code)]

use haplocheck_tools::haplogroup::{loader::parse_tree_json, ReferenceTree, TreeBuilder};
use haplocheck_tools::{Sample, VariantCall};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Two clades under the root: H2a1 (100A 200C) and L3e2b (300T).
pub const TWO_CLADE_TREE: &str = r#"{
  "name": "mt-MRCA",
  "snps": [],
  "children": [
    {
      "name": "H2a1",
      "snps": [
        {"pos": 100, "ancestral": "G", "derived": "A"},
        {"pos": 200, "ancestral": "T", "derived": "C"}
      ]
    },
    {
      "name": "L3e2b",
      "snps": [{"pos": 300, "ancestral": "C", "derived": "T"}]
    }
  ]
}"#;

pub fn two_clade_tree() -> ReferenceTree {
    let specs = parse_tree_json(TWO_CLADE_TREE.as_bytes()).expect("parse tree");
    TreeBuilder::new("test").nodes(specs).build().expect("build tree")
}

pub fn call(position: u32, reference: char, observed: char, fraction: f64) -> VariantCall {
    VariantCall::new(position, reference, observed, fraction, Some(100))
}

/// H2a1 fixed, with L3e2b's mutation present at the given fraction.
pub fn mixed_sample(id: &str, minor_fraction: f64) -> Sample {
    Sample::new(
        id,
        vec![
            call(100, 'G', 'A', 0.99),
            call(200, 'T', 'C', 0.99),
            call(300, 'C', 'T', minor_fraction),
        ],
    )
    .expect("sample")
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create file");
    file.write_all(content.as_bytes()).expect("write file");
    path
}
