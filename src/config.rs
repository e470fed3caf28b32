//! Runtime settings for the pagination pipeline

use crate::error::ConfigError;
use crate::layout::PackingPolicy;
use crate::template::DEFAULT_PAGE_GAP;
use serde::{Deserialize, Serialize};

/// Quiet period before an edit triggers a recompute
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginatorConfig {
    pub debounce_ms: u64,
    /// Heights below this are raised to it before packing (empty blocks)
    pub minimum_block_height: f32,
    /// Page space left after a block taller than a whole page
    pub minimum_remaining: f32,
    /// Gap between pages when the template does not set one
    pub default_page_gap: String,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            minimum_block_height: 0.0,
            minimum_remaining: 0.0,
            default_page_gap: DEFAULT_PAGE_GAP.to_string(),
        }
    }
}

impl PaginatorConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn packing_policy(&self) -> PackingPolicy {
        PackingPolicy {
            minimum_block_height: self.minimum_block_height.max(0.0),
            minimum_remaining: self.minimum_remaining.max(0.0),
        }
    }
}
