use crate::error::{HaplocheckError, Result};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Every knob of a contamination run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Alleles at or below this fraction are noise and never form a minor allele.
    #[serde(default = "default_major_minor_split_threshold")]
    pub major_minor_split_threshold: f64,
    /// A single allele at or above this fraction is fixed (homoplasmic).
    #[serde(default = "default_fixed_allele_threshold")]
    pub fixed_allele_threshold: f64,
    #[serde(default = "default_min_quality_for_contamination")]
    pub min_quality_for_contamination: f64,
    /// The tree distance between major and minor haplogroup must exceed this many edges.
    #[serde(default = "default_min_distance_for_contamination")]
    pub min_distance_for_contamination: f64,
    /// Major and minor haplogroup must also sit in different top-level clades.
    #[serde(default = "default_require_distinct_top_level_clade")]
    pub require_distinct_top_level_clade: bool,
    /// The contamination level must exceed this.
    #[serde(default = "default_min_detectable_level")]
    pub min_detectable_level: f64,
    #[serde(default = "default_phylogeny_version")]
    pub phylogeny_version: String,
    /// Weight for mutations missing from the weight table.
    #[serde(default = "default_mutation_weight")]
    pub default_mutation_weight: f64,
    /// Worker threads; 0 uses all available cores.
    #[serde(default)]
    pub threads: usize,
}

fn default_major_minor_split_threshold() -> f64 {
    0.01
}

fn default_fixed_allele_threshold() -> f64 {
    0.97
}

fn default_min_quality_for_contamination() -> f64 {
    0.5
}

fn default_min_distance_for_contamination() -> f64 {
    1.0
}

fn default_require_distinct_top_level_clade() -> bool {
    true
}

fn default_min_detectable_level() -> f64 {
    0.01
}

fn default_phylogeny_version() -> String {
    "phylotree17".to_string()
}

fn default_mutation_weight() -> f64 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            major_minor_split_threshold: default_major_minor_split_threshold(),
            fixed_allele_threshold: default_fixed_allele_threshold(),
            min_quality_for_contamination: default_min_quality_for_contamination(),
            min_distance_for_contamination: default_min_distance_for_contamination(),
            require_distinct_top_level_clade: default_require_distinct_top_level_clade(),
            min_detectable_level: default_min_detectable_level(),
            phylogeny_version: default_phylogeny_version(),
            default_mutation_weight: default_mutation_weight(),
            threads: 0,
        }
    }
}

impl Config {
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "haplocheck", "haplocheck-tools")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The user's `config.toml` if there is a readable one, defaults otherwise.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match Self::from_file(&config_path) {
                    Ok(config) => return config,
                    Err(e) => warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        debug!("Using default configuration");
        Config::default()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HaplocheckError::io(e, path))?;
        toml::from_str(&content).map_err(|e| HaplocheckError::config(e.to_string()))
    }

    /// Stores the configuration as the user's default and returns where it went.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()
            .ok_or_else(|| HaplocheckError::config("no user configuration directory"))?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            fs::create_dir_all(config_dir).map_err(|e| HaplocheckError::io(e, config_dir))?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HaplocheckError::config(e.to_string()))?;
        fs::write(path, content).map_err(|e| HaplocheckError::io(e, path))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("major_minor_split_threshold", self.major_minor_split_threshold),
            ("fixed_allele_threshold", self.fixed_allele_threshold),
            ("min_quality_for_contamination", self.min_quality_for_contamination),
            ("min_detectable_level", self.min_detectable_level),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(HaplocheckError::config(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.major_minor_split_threshold >= self.fixed_allele_threshold {
            return Err(HaplocheckError::config(format!(
                "major_minor_split_threshold ({}) must be below fixed_allele_threshold ({})",
                self.major_minor_split_threshold, self.fixed_allele_threshold
            )));
        }
        if !(self.min_distance_for_contamination >= 0.0) {
            return Err(HaplocheckError::config(
                "min_distance_for_contamination must not be negative",
            ));
        }
        if !(self.default_mutation_weight > 0.0) || !self.default_mutation_weight.is_finite() {
            return Err(HaplocheckError::config(
                "default_mutation_weight must be a positive number",
            ));
        }
        if self.phylogeny_version.trim().is_empty() {
            return Err(HaplocheckError::config("phylogeny_version must not be empty"));
        }
        Ok(())
    }

    /// Resolved worker count.
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fixed_allele_threshold, 0.97);
        assert_eq!(config.phylogeny_version, "phylotree17");
        assert!(config.require_distinct_top_level_clade);
        assert!(config.worker_threads() >= 1);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("min_detectable_level = 0.05\nthreads = 2\n").unwrap();
        assert_eq!(config.min_detectable_level, 0.05);
        assert_eq!(config.major_minor_split_threshold, 0.01);
        assert_eq!(config.worker_threads(), 2);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let config = Config {
            major_minor_split_threshold: 0.98,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(HaplocheckError::Config(_))));

        let config = Config {
            min_quality_for_contamination: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "phylogeny_version = \"phylotree16\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.phylogeny_version, "phylotree16");

        fs::write(&path, "threads = \"many\"\n").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn saved_config_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            min_detectable_level: 0.02,
            require_distinct_top_level_clade: false,
            threads: 3,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }
}
