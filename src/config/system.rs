//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::axis::AxisTuning;
use super::pair::PairTuning;
use super::rig::RigConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Named single-axis tunings.
    #[serde(default)]
    pub axes: FnvIndexMap<String<32>, AxisTuning, 8>,

    /// Named motor-pair tunings.
    #[serde(default)]
    pub pairs: FnvIndexMap<String<32>, PairTuning, 4>,

    /// Named rig configurations.
    #[serde(default)]
    pub rigs: FnvIndexMap<String<32>, RigConfig, 4>,
}

impl SystemConfig {
    /// Get an axis tuning by name.
    pub fn axis(&self, name: &str) -> Option<&AxisTuning> {
        self.axes
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a pair tuning by name.
    pub fn pair(&self, name: &str) -> Option<&PairTuning> {
        self.pairs
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a rig configuration by name.
    pub fn rig(&self, name: &str) -> Option<&RigConfig> {
        self.rigs
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(|s| s.as_str())
    }

    /// List all pair names.
    pub fn pair_names(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(|s| s.as_str())
    }

    /// List all rig names.
    pub fn rig_names(&self) -> impl Iterator<Item = &str> {
        self.rigs.keys().map(|s| s.as_str())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            axes: FnvIndexMap::new(),
            pairs: FnvIndexMap::new(),
            rigs: FnvIndexMap::new(),
        }
    }
}
