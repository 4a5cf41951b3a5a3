//! Component tag extraction
//!
//! Walks a story content tree and collects every component tag reachable from
//! the root. The walk is fail-open: unexpected shapes are skipped and the depth
//! guard truncates instead of erroring.

use indexmap::IndexSet;
use tracing::{trace, warn};

use crate::domain::content::{ContentNode, Fields, BODY_FIELD};

/// Default nesting limit for a single traversal.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Distinct component tags in first-discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentNameSet(IndexSet<String>);

impl ComponentNameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Returns `true` if it was not present yet.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tags of `self` that are missing from `registered`, in discovery order.
    pub fn missing_from<'a>(&'a self, registered: &'a [String]) -> impl Iterator<Item = &'a str> {
        self.iter()
            .filter(move |name| !registered.iter().any(|r| r.as_str() == *name))
    }
}

impl Extend<String> for ComponentNameSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<S: Into<String>> FromIterator<S> for ComponentNameSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for ComponentNameSet {
    type Item = String;
    type IntoIter = indexmap::set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ComponentNameSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Collects component tags from a content tree.
///
/// Traversal rules:
/// - a block contributes its own tag
/// - every element of a `body` sequence is visited as a node, tagged or not
/// - any other field is followed only into blocks, either directly or as
///   elements of a sequence
#[derive(Debug, Clone, Copy)]
pub struct ComponentExtractor {
    max_depth: usize,
}

impl Default for ComponentExtractor {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ComponentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Add every tag reachable from `node` to `acc` and return it.
    ///
    /// An absent node returns `acc` untouched. Hitting the depth limit logs a
    /// warning and returns what was found so far.
    pub fn extract(&self, node: Option<&ContentNode>, mut acc: ComponentNameSet) -> ComponentNameSet {
        let Some(node) = node else {
            return acc;
        };
        if self.visit(node, 0, &mut acc) {
            warn!(
                max_depth = self.max_depth,
                found = acc.len(),
                "content nested deeper than limit, result is partial"
            );
        }
        acc
    }

    /// Returns `true` if any branch was cut by the depth limit.
    fn visit(&self, node: &ContentNode, depth: usize, acc: &mut ComponentNameSet) -> bool {
        if depth > self.max_depth {
            return true;
        }
        match node {
            ContentNode::Primitive(_) => false,
            ContentNode::Block(block) => {
                if acc.insert(block.component.as_str()) {
                    trace!(component = %block.component, depth, "discovered");
                }
                self.visit_fields(&block.fields, depth, acc)
            }
            ContentNode::Mapping(fields) => self.visit_fields(fields, depth, acc),
            ContentNode::Sequence(items) => items
                .iter()
                .fold(false, |cut, item| self.visit_value(item, depth, acc) | cut),
        }
    }

    fn visit_fields(&self, fields: &Fields, depth: usize, acc: &mut ComponentNameSet) -> bool {
        let mut cut = false;

        if let Some(ContentNode::Sequence(body)) = fields.get(BODY_FIELD) {
            for item in body {
                cut |= self.visit(item, depth + 1, acc);
            }
        }

        for (name, value) in fields {
            // a body sequence was fully handled above
            if name == BODY_FIELD && matches!(value, ContentNode::Sequence(_)) {
                continue;
            }
            cut |= self.visit_value(value, depth, acc);
        }
        cut
    }

    fn visit_value(&self, value: &ContentNode, depth: usize, acc: &mut ComponentNameSet) -> bool {
        match value {
            ContentNode::Sequence(items) => items
                .iter()
                .filter(|item| item.is_block())
                .fold(false, |cut, item| self.visit(item, depth + 1, acc) | cut),
            ContentNode::Block(_) => self.visit(value, depth + 1, acc),
            _ => false,
        }
    }
}

/// Extract with the default depth limit.
pub fn extract_components(node: Option<&ContentNode>, acc: ComponentNameSet) -> ComponentNameSet {
    ComponentExtractor::default().extract(node, acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_tagged_body_field_that_is_not_a_sequence_when_extracting_then_follows_it() {
        let node = ContentNode::from(json!({
            "component": "page",
            "body": {"component": "hero"}
        }));

        let found = extract_components(Some(&node), ComponentNameSet::new());

        assert_eq!(found.iter().collect::<Vec<_>>(), vec!["page", "hero"]);
    }

    #[test]
    fn given_zero_depth_when_extracting_then_only_root_tag_is_found() {
        let node = ContentNode::from(json!({
            "component": "page",
            "body": [{"component": "teaser"}]
        }));

        let found = ComponentExtractor::with_max_depth(0).extract(Some(&node), ComponentNameSet::new());

        assert_eq!(found.iter().collect::<Vec<_>>(), vec!["page"]);
    }

    #[test]
    fn given_registered_names_when_diffing_then_reports_unregistered_in_order() {
        let found: ComponentNameSet = ["mysore", "teaser", "grid"].into_iter().collect();
        let registered = vec!["mysore".to_string()];

        let missing: Vec<_> = found.missing_from(&registered).collect();

        assert_eq!(missing, vec!["teaser", "grid"]);
    }
}
