//! Level descriptions loaded from JSON files.
//!
//! A level file bundles everything one generation run needs:
//!
//! ```json
//! {
//!   "config": { "layout": { "strategy": "area" } },
//!   "graph": { "width": 60, "height": 40, "min_gap": 2,
//!              "rooms": [{ "id": 0, "type": "Entrance" }], "edges": [] },
//!   "rules": [],
//!   "catalog": { "rooms": {}, "fallback": [] }
//! }
//! ```
//!
//! Only `graph` and `catalog` are required.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::RoomCatalog;
use crate::config::GenerationConfig;
use crate::error::LevelFileError;
use crate::rewrite::RuleSet;
use crate::room_graph::RoomGraph;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelFile {
    #[serde(default)]
    pub config: GenerationConfig,
    pub graph: RoomGraph,
    #[serde(default)]
    pub rules: RuleSet,
    pub catalog: RoomCatalog,
}

impl LevelFile {
    pub fn from_json_str(json: &str) -> Result<Self, LevelFileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelFileError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LevelFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
