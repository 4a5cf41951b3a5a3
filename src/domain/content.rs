//! Story content model
//!
//! Story content arrives as schema-less JSON. Every value is lifted into a
//! [`ContentNode`] once at the boundary so that traversal code dispatches on
//! variants instead of probing JSON shapes ad hoc.

use indexmap::IndexMap;
use serde_json::{Number, Value};

/// Field carrying the component tag of a content block.
pub const COMPONENT_FIELD: &str = "component";

/// Field holding the canonical child sequence of a block.
pub const BODY_FIELD: &str = "body";

/// Ordered field map of a block or plain mapping.
pub type Fields = IndexMap<String, ContentNode>;

/// Scalar content value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

/// A mapping tagged with a non-empty `component` string.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Component tag, e.g. `teaser`
    pub component: String,
    /// Remaining fields in document order (without `component`)
    pub fields: Fields,
}

impl Block {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            fields: Fields::new(),
        }
    }

    /// Builder-style field insertion, mainly for tests and fixtures.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<ContentNode>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The `body` field, if present.
    pub fn body(&self) -> Option<&ContentNode> {
        self.fields.get(BODY_FIELD)
    }
}

/// Node of a story content tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Primitive(Primitive),
    Block(Block),
    Mapping(Fields),
    Sequence(Vec<ContentNode>),
}

impl ContentNode {
    /// Component tag when this node is a block.
    pub fn component(&self) -> Option<&str> {
        match self {
            ContentNode::Block(block) => Some(block.component.as_str()),
            _ => None,
        }
    }

    /// Field map for blocks and mappings.
    pub fn fields(&self) -> Option<&Fields> {
        match self {
            ContentNode::Block(block) => Some(&block.fields),
            ContentNode::Mapping(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, ContentNode::Block(_))
    }
}

impl From<&Value> for ContentNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ContentNode::Primitive(Primitive::Null),
            Value::Bool(b) => ContentNode::Primitive(Primitive::Bool(*b)),
            Value::Number(n) => ContentNode::Primitive(Primitive::Number(n.clone())),
            Value::String(s) => ContentNode::Primitive(Primitive::Text(s.clone())),
            Value::Array(items) => ContentNode::Sequence(items.iter().map(Self::from).collect()),
            Value::Object(map) => {
                let tag = match map.get(COMPONENT_FIELD) {
                    Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                };
                match tag {
                    Some(component) => {
                        let fields = map
                            .iter()
                            .filter(|(k, _)| k.as_str() != COMPONENT_FIELD)
                            .map(|(k, v)| (k.clone(), Self::from(v)))
                            .collect();
                        ContentNode::Block(Block { component, fields })
                    }
                    // an unusable tag stays an ordinary field
                    None => ContentNode::Mapping(
                        map.iter().map(|(k, v)| (k.clone(), Self::from(v))).collect(),
                    ),
                }
            }
        }
    }
}

impl From<Value> for ContentNode {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

impl From<Block> for ContentNode {
    fn from(block: Block) -> Self {
        ContentNode::Block(block)
    }
}

impl From<Vec<ContentNode>> for ContentNode {
    fn from(items: Vec<ContentNode>) -> Self {
        ContentNode::Sequence(items)
    }
}

impl From<&str> for ContentNode {
    fn from(s: &str) -> Self {
        ContentNode::Primitive(Primitive::Text(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_object_with_component_when_lifting_then_becomes_block_without_tag_field() {
        let node = ContentNode::from(json!({"component": "hero", "title": "Hi"}));

        let ContentNode::Block(block) = node else {
            panic!("expected block");
        };
        assert_eq!(block.component, "hero");
        assert!(!block.fields.contains_key(COMPONENT_FIELD));
        assert_eq!(block.fields.get("title"), Some(&ContentNode::from("Hi")));
    }

    #[test]
    fn given_non_string_component_when_lifting_then_stays_mapping() {
        let node = ContentNode::from(json!({"component": 42}));
        assert!(matches!(node, ContentNode::Mapping(ref f) if f.contains_key(COMPONENT_FIELD)));

        let node = ContentNode::from(json!({"component": ""}));
        assert!(!node.is_block());
    }

    #[test]
    fn given_field_order_when_lifting_then_document_order_is_kept() {
        let node = ContentNode::from(json!({"component": "grid", "b": 1, "a": 2, "c": 3}));
        let keys: Vec<_> = node.fields().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
