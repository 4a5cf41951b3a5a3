//! Nested component outline for terminal display

use termtree::Tree;

use crate::domain::content::{ContentNode, Fields, BODY_FIELD};

/// Label of the outline root when the content itself is not a block.
const ROOT_LABEL: &str = "(content)";

/// Build a tree of blocks following the same reachability rules as
/// [`ComponentExtractor`](crate::domain::ComponentExtractor).
///
/// Each block is labelled `component [field]`. Untagged `body` elements are
/// transparent: their blocks are attached to the enclosing block.
pub fn component_outline(node: &ContentNode, max_depth: usize) -> Tree<String> {
    let label = node
        .component()
        .map(str::to_string)
        .unwrap_or_else(|| ROOT_LABEL.to_string());
    Tree::new(label).with_leaves(children_of(node, 0, max_depth))
}

fn children_of(node: &ContentNode, depth: usize, max_depth: usize) -> Vec<Tree<String>> {
    if depth >= max_depth {
        return if has_child_blocks(node) {
            vec![Tree::new("…".to_string())]
        } else {
            Vec::new()
        };
    }
    match node {
        ContentNode::Block(block) => fields_children(&block.fields, depth, max_depth),
        ContentNode::Mapping(fields) => fields_children(fields, depth, max_depth),
        ContentNode::Sequence(items) => items
            .iter()
            .filter(|item| item.is_block())
            .map(|item| block_tree(item, "", depth + 1, max_depth))
            .collect(),
        ContentNode::Primitive(_) => Vec::new(),
    }
}

fn fields_children(fields: &Fields, depth: usize, max_depth: usize) -> Vec<Tree<String>> {
    let mut leaves = Vec::new();

    for (name, value) in fields {
        match value {
            ContentNode::Sequence(items) if name == BODY_FIELD => {
                for item in items {
                    if item.is_block() {
                        leaves.push(block_tree(item, name, depth + 1, max_depth));
                    } else {
                        leaves.extend(children_of(item, depth + 1, max_depth));
                    }
                }
            }
            ContentNode::Sequence(items) => leaves.extend(
                items
                    .iter()
                    .filter(|item| item.is_block())
                    .map(|item| block_tree(item, name, depth + 1, max_depth)),
            ),
            ContentNode::Block(_) => leaves.push(block_tree(value, name, depth + 1, max_depth)),
            _ => {}
        }
    }
    leaves
}

/// Whether `node` would contribute at least one leaf to the outline.
fn has_child_blocks(node: &ContentNode) -> bool {
    let fields = match node {
        ContentNode::Block(block) => &block.fields,
        ContentNode::Mapping(fields) => fields,
        ContentNode::Sequence(items) => return items.iter().any(ContentNode::is_block),
        ContentNode::Primitive(_) => return false,
    };
    fields.iter().any(|(name, value)| match value {
        ContentNode::Sequence(items) if name == BODY_FIELD => items
            .iter()
            .any(|item| item.is_block() || has_child_blocks(item)),
        ContentNode::Sequence(items) => items.iter().any(ContentNode::is_block),
        ContentNode::Block(_) => true,
        _ => false,
    })
}

fn block_tree(node: &ContentNode, field: &str, depth: usize, max_depth: usize) -> Tree<String> {
    let component = node.component().unwrap_or_default();
    let label = if field.is_empty() {
        component.to_string()
    } else {
        format!("{component} [{field}]")
    };
    Tree::new(label).with_leaves(children_of(node, depth, max_depth))
}
