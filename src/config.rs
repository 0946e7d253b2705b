use std::path::PathBuf;

use crate::limits::DEFAULT_COMPACT_THRESHOLD;
use crate::model::OverlapPolicy;

/// Startup settings, read from `WEEKGRID_*` environment variables.
/// Missing or unparseable values fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub policy: OverlapPolicy,
    pub compact_threshold: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("WEEKGRID_DATA_DIR").unwrap_or_else(|| "./data".into());
        let policy = lookup("WEEKGRID_POLICY")
            .and_then(|s| match s.parse::<OverlapPolicy>() {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!("{e}; using the default policy");
                    None
                }
            })
            .unwrap_or_default();
        let compact_threshold = lookup("WEEKGRID_COMPACT_THRESHOLD")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_COMPACT_THRESHOLD);
        Self {
            data_dir: PathBuf::from(data_dir),
            policy,
            compact_threshold,
        }
    }

    pub fn wal_path(&self) -> PathBuf {
        self.data_dir.join("availability.wal")
    }
}
