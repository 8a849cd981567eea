// Copyright 2025 Sigmafold Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Configuration for the analysis pipeline
//!
//! The chain length `n` is bounded to a configured closed range with a
//! configured default. Detector and layout both default to a fixed random
//! seed so repeated runs are comparable; setting `seed` to `None` opts in
//! to entropy seeding.

use crate::error::{Result, SigmafoldError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest chain length served by the upstream database
pub const DEFAULT_MIN_N: u32 = 8;

/// Largest chain length served by the upstream database
pub const DEFAULT_MAX_N: u32 = 14;

/// Chain length used when the caller does not pick one
pub const DEFAULT_N: u32 = 10;

/// Fixed seed used unless the caller opts into nondeterminism
pub const DEFAULT_SEED: u64 = 42;

/// Top-level pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Lower bound of the supported chain-length range (inclusive)
    #[serde(default = "default_min_n")]
    pub min_n: u32,

    /// Upper bound of the supported chain-length range (inclusive)
    #[serde(default = "default_max_n")]
    pub max_n: u32,

    /// Chain length used when none is given
    #[serde(default = "default_n")]
    pub default_n: u32,

    /// Root directory for cached records and graphs
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub detect: DetectorConfig,

    #[serde(default)]
    pub layout: LayoutConfig,
}

fn default_min_n() -> u32 {
    DEFAULT_MIN_N
}

fn default_max_n() -> u32 {
    DEFAULT_MAX_N
}

fn default_n() -> u32 {
    DEFAULT_N
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./sigmafold-data")
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_n: DEFAULT_MIN_N,
            max_n: DEFAULT_MAX_N,
            default_n: DEFAULT_N,
            data_dir: default_data_dir(),
            detect: DetectorConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| SigmafoldError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }

    /// Check that `n` lies inside the configured closed range
    pub fn validate_n(&self, n: u32) -> Result<()> {
        if n < self.min_n || n > self.max_n {
            return Err(SigmafoldError::OutOfRange {
                n,
                min: self.min_n,
                max: self.max_n,
            });
        }
        Ok(())
    }
}

/// Community detection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectorConfig {
    /// Resolution parameter (higher = more communities)
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    /// Maximum outer iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Minimum modularity improvement to continue iterating
    #[serde(default = "default_min_improvement")]
    pub min_improvement: f64,

    /// Random seed; `None` seeds from entropy
    #[serde(default = "default_seed")]
    pub seed: Option<u64>,
}

fn default_resolution() -> f64 {
    1.0
}

fn default_max_iterations() -> usize {
    100
}

fn default_min_improvement() -> f64 {
    1e-6
}

fn default_seed() -> Option<u64> {
    Some(DEFAULT_SEED)
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            max_iterations: default_max_iterations(),
            min_improvement: default_min_improvement(),
            seed: default_seed(),
        }
    }
}

/// Force-directed layout configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Number of simulation steps
    #[serde(default = "default_layout_iterations")]
    pub iterations: usize,

    /// Half-extent of the output square; positions land in [-scale, scale]
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Random seed for initial placement; `None` seeds from entropy
    #[serde(default = "default_seed")]
    pub seed: Option<u64>,
}

fn default_layout_iterations() -> usize {
    50
}

fn default_scale() -> f64 {
    1.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: default_layout_iterations(),
            scale: default_scale(),
            seed: default_seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.min_n, 8);
        assert_eq!(config.max_n, 14);
        assert_eq!(config.default_n, 10);
        assert_eq!(config.detect.seed, Some(DEFAULT_SEED));
        assert_eq!(config.layout.seed, Some(DEFAULT_SEED));
    }

    #[test]
    fn test_validate_n() {
        let config = AnalysisConfig::default();
        assert!(config.validate_n(8).is_ok());
        assert!(config.validate_n(14).is_ok());
        assert!(config.validate_n(7).is_err());
        assert!(config.validate_n(15).is_err());

        match config.validate_n(20) {
            Err(SigmafoldError::OutOfRange { n, min, max }) => {
                assert_eq!((n, min, max), (20, 8, 14));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AnalysisConfig = toml::from_str("min_n = 6\n").unwrap();
        assert_eq!(config.min_n, 6);
        assert_eq!(config.max_n, DEFAULT_MAX_N);
        assert_eq!(config.detect.resolution, 1.0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sigmafold.toml");
        std::fs::write(
            &path,
            "default_n = 12\ndata_dir = \"/var/lib/sigmafold\"\n\n[detect]\nresolution = 1.5\n",
        )
        .unwrap();

        let config = AnalysisConfig::load(&path).unwrap();
        assert_eq!(config.default_n, 12);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/sigmafold"));
        assert_eq!(config.detect.resolution, 1.5);
        // unspecified fields fall back to defaults
        assert_eq!(config.max_n, DEFAULT_MAX_N);
        assert_eq!(config.layout.seed, Some(DEFAULT_SEED));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        match AnalysisConfig::load(dir.path().join("absent.toml")) {
            Err(SigmafoldError::Io(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
