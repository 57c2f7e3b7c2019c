use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A derived allele at a position of the mitochondrial reference, e.g. `73G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Mutation {
    pub position: u32,
    pub allele: char,
}

impl Mutation {
    pub fn new(position: u32, allele: char) -> Self {
        Self {
            position,
            allele: allele.to_ascii_uppercase(),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.position, self.allele)
    }
}

impl FromStr for Mutation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
        let (pos, rest) = s.split_at(digits);
        let position: u32 = pos
            .parse()
            .map_err(|_| format!("mutation '{}' does not start with a position", s))?;
        let mut alleles = rest.chars();
        match (alleles.next(), alleles.next()) {
            (Some(allele), None) if allele.is_ascii_alphabetic() => Ok(Mutation::new(position, allele)),
            _ => Err(format!("mutation '{}' must end in a single base", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileTag {
    Major,
    Minor,
}

impl fmt::Display for ProfileTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileTag::Major => write!(f, "major"),
            ProfileTag::Minor => write!(f, "minor"),
        }
    }
}

/// One allele selected into a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub position: u32,
    pub reference: char,
    pub allele: char,
    pub fraction: f64,
}

impl ProfileEntry {
    /// `None` when the selected allele is the reference base.
    pub fn mutation(&self) -> Option<Mutation> {
        (self.allele != self.reference).then(|| Mutation::new(self.position, self.allele))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationProfile {
    pub sample_id: String,
    pub tag: ProfileTag,
    pub entries: Vec<ProfileEntry>,
}

impl MutationProfile {
    pub fn new(sample_id: impl Into<String>, tag: ProfileTag) -> Self {
        Self {
            sample_id: sample_id.into(),
            tag,
            entries: Vec::new(),
        }
    }

    /// Mutations relative to the reference, in locus order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.entries.iter().filter_map(ProfileEntry::mutation).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_at(&self, position: u32) -> Option<&ProfileEntry> {
        self.entries
            .binary_search_by_key(&position, |e| e.position)
            .ok()
            .map(|idx| &self.entries[idx])
    }
}

/// Best match of a profile in the reference tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaplogroupAssignment {
    pub tag: ProfileTag,
    pub haplogroup: String,
    #[serde(skip)]
    pub node: usize,
    pub quality: f64,
    pub depth: u32,
    /// Defining mutations of the node's path found in the profile.
    pub matched: Vec<Mutation>,
    /// Profile mutations the node does not explain.
    pub unexplained: Vec<Mutation>,
    /// Other labels that scored equal to the chosen one.
    pub tied_with: Vec<String>,
}

impl HaplogroupAssignment {
    /// A profile with nothing to classify; the quality of zero marks it unassigned.
    pub fn is_assigned(&self) -> bool {
        self.quality > 0.0
    }
}
