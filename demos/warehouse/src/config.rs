//! Demo configuration, optionally loaded from a JSON file.
//!
//! Every field has a default, so `{}` or a partial document works:
//!
//! ```json
//! {
//!   "layout":   { "shelves": 6, "columns_per_shelf": 4 },
//!   "dispatch": { "topic_prefix": "site-a", "prerequisite_timeout_ms": 2000 },
//!   "arrivals": 80,
//!   "order_probability": 0.4,
//!   "seed": 7
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use wh_core::DispatchConfig;
use wh_graph::LayoutConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub layout:            LayoutConfig,
    pub dispatch:          DispatchConfig,
    /// Pallet and order arrivals to generate.
    pub arrivals:          u32,
    /// Chance that an arrival is an order rather than a pallet.
    pub order_probability: f64,
    pub seed:              u64,
    /// Hops an AGV drives per arrival interval.
    pub agv_hops_per_step: u32,
    pub output_dir:        PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            layout:            LayoutConfig::default(),
            dispatch:          DispatchConfig::default(),
            arrivals:          40,
            order_probability: 0.35,
            seed:              42,
            agv_hops_per_step: 12,
            output_dir:        PathBuf::from("output/warehouse"),
        }
    }
}

impl DemoConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.dispatch.validate()?;
        ensure!(
            (0.0..=1.0).contains(&self.order_probability),
            "order_probability must be within 0..=1, got {}",
            self.order_probability
        );
        ensure!(self.agv_hops_per_step > 0, "agv_hops_per_step must be positive");
        Ok(())
    }
}
