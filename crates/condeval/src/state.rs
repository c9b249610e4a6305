//! The opaque document tree bound as evaluation state.
//!
//! Nodes are reference-counted so that `Value::Array`/`Value::Object`
//! handles derived from them compare by identity rather than by structural
//! equality, matching the data model's "opaque handle" wording for these two
//! kinds.

use std::rc::Rc;
use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;

/// A node in a caller-supplied JSON-like document.
#[derive(Debug, Clone, PartialEq)]
pub enum StateNode {
    Null,
    Boolean(bool),
    Number(Decimal),
    String(String),
    Array(Vec<Rc<StateNode>>),
    Object(IndexMap<String, Rc<StateNode>>),
}

impl StateNode {
    /// Converts a `serde_json::Value` document into a `StateNode` tree.
    ///
    /// JSON numbers are parsed through their decimal string form, not
    /// through `f64`, so integral values like `2147483648` keep full
    /// precision.
    pub fn from_json(value: &serde_json::Value) -> Rc<StateNode> {
        let node = match value {
            serde_json::Value::Null => StateNode::Null,
            serde_json::Value::Bool(b) => StateNode::Boolean(*b),
            serde_json::Value::Number(n) => {
                StateNode::Number(Decimal::from_str(&n.to_string()).unwrap_or(Decimal::ZERO))
            }
            serde_json::Value::String(s) => StateNode::String(s.clone()),
            serde_json::Value::Array(items) => {
                StateNode::Array(items.iter().map(StateNode::from_json).collect())
            }
            serde_json::Value::Object(map) => StateNode::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), StateNode::from_json(value)))
                    .collect(),
            ),
        };
        Rc::new(node)
    }

    /// Looks up an array element by position.
    pub fn get_index(&self, index: usize) -> Option<Rc<StateNode>> {
        match self {
            StateNode::Array(items) => items.get(index).cloned(),
            _ => None,
        }
    }

    /// Looks up an object property by name.
    pub fn get_property(&self, key: &str) -> Option<Rc<StateNode>> {
        match self {
            StateNode::Object(map) => map.get(key).cloned(),
            _ => None,
        }
    }
}
