//! Commands described as data, for scripts and other non-interactive callers.
//!
//! Figures are addressed by their path from the root: `[]` is the root,
//! `[0, 2]` the third figure contained in the root's first figure.

use figure::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandRequest {
    /// Create a figure of a registered type spanning two corners.
    CreateFigure {
        figure_type: String,
        from: Point,
        to: Point,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, Value>,
    },
    ChangeRect {
        target: Vec<usize>,
        rect: Rect,
    },
    Move {
        target: Vec<usize>,
        delta: Point,
    },
    ChangeAttribute {
        target: Vec<usize>,
        attribute: String,
        value: Value,
    },
    Remove {
        target: Vec<usize>,
    },
    Undo,
    Redo,
}

impl CommandRequest {
    /// Parses a JSON array of requests.
    pub fn parse_script(json: &str) -> Result<Vec<CommandRequest>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
