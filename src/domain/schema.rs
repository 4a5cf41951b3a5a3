//! Content type schema definitions sent to the management API

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the content type created by `component create` and `setup`.
pub const BLOG_POST: &str = "blog_post";

/// Storyblok field types used by the bundled schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Richtext,
    Asset,
    Date,
}

/// Single schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filetypes: Vec<String>,
}

impl FieldSchema {
    pub fn new(field_type: FieldType, display_name: impl Into<String>) -> Self {
        Self {
            field_type,
            display_name: display_name.into(),
            required: false,
            filetypes: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn filetypes(mut self, types: &[&str]) -> Self {
        self.filetypes = types.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// Component (content type or nestable block) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSchema {
    pub name: String,
    pub display_name: String,
    /// `true` makes the component a content type
    pub is_root: bool,
    pub is_nestable: bool,
    pub schema: IndexMap<String, FieldSchema>,
}

impl ComponentSchema {
    /// Blog post content type: title, slug, excerpt, rich text body, featured
    /// image, author and publish date.
    pub fn blog_post() -> Self {
        let schema = [
            ("title", FieldSchema::new(FieldType::Text, "Title").required()),
            ("slug", FieldSchema::new(FieldType::Text, "Slug").required()),
            ("excerpt", FieldSchema::new(FieldType::Textarea, "Excerpt")),
            ("content", FieldSchema::new(FieldType::Richtext, "Content")),
            (
                "featured_image",
                FieldSchema::new(FieldType::Asset, "Featured Image").filetypes(&["images"]),
            ),
            ("author", FieldSchema::new(FieldType::Text, "Author")),
            ("publish_date", FieldSchema::new(FieldType::Date, "Publish Date")),
        ]
        .into_iter()
        .map(|(name, field)| (name.to_string(), field))
        .collect();

        Self {
            name: BLOG_POST.to_string(),
            display_name: "Blog Post".to_string(),
            is_root: true,
            is_nestable: false,
            schema,
        }
    }
}

/// Request envelope for `POST /spaces/{id}/components`.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentEnvelope<'a> {
    pub component: &'a ComponentSchema,
}
