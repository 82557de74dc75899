use serde::Deserialize;

use crate::error::{Result, TreemapError};

/// A record exactly as it appears in a dataset file.
///
/// Internal nodes carry `children`; leaves carry `category` and `value`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawNode {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub value: Option<RawValue>,
    #[serde(default)]
    pub children: Option<Vec<RawNode>>,
}

/// Leaf values show up both as JSON numbers and as numeric strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Parse into a finite, non-negative weight.
    pub fn to_weight(&self, at: &str) -> Result<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                TreemapError::invalid_data(at, format!("value {s:?} is not a number"))
            })?,
        };

        if !value.is_finite() {
            return Err(TreemapError::invalid_data(
                at,
                format!("value {value} is not finite"),
            ));
        }
        if value < 0.0 {
            return Err(TreemapError::invalid_data(
                at,
                format!("negative value {value}"),
            ));
        }
        Ok(value)
    }
}

impl RawNode {
    pub fn leaf(name: &str, category: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            category: Some(category.to_string()),
            value: Some(RawValue::Number(value)),
            children: None,
        }
    }

    pub fn group(name: &str, children: Vec<RawNode>) -> Self {
        Self {
            name: name.to_string(),
            category: None,
            value: None,
            children: Some(children),
        }
    }

    /// Number of leaf records below (or at) this node.
    pub fn leaf_count(&self) -> usize {
        match &self.children {
            None => 1,
            Some(children) => children.iter().map(RawNode::leaf_count).sum(),
        }
    }
}

/// Parse a dataset document. Malformed JSON is reported as invalid data.
pub fn parse_dataset(json: &str) -> Result<RawNode> {
    serde_json::from_str(json)
        .map_err(|e| TreemapError::invalid_data("<document>", e.to_string()))
}
