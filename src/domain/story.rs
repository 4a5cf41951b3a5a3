//! Stories: the fetched delivery shape and the drafts sent for creation

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::content::ContentNode;
use crate::domain::error::DomainError;
use crate::domain::schema::BLOG_POST;

/// Which revision of a story the delivery API returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoryVersion {
    #[default]
    Draft,
    Published,
}

impl StoryVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryVersion::Draft => "draft",
            StoryVersion::Published => "published",
        }
    }
}

impl FromStr for StoryVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(StoryVersion::Draft),
            "published" => Ok(StoryVersion::Published),
            _ => Err(DomainError::UnknownVersion(s.to_string())),
        }
    }
}

/// Story as returned by the delivery and management APIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Story {
    pub id: Option<u64>,
    pub uuid: Option<String>,
    pub name: String,
    pub slug: String,
    pub full_slug: String,
    /// Raw content document, kept verbatim for display
    pub content: Value,
}

impl Story {
    /// Content lifted into the traversal model. `None` when the story has no content.
    pub fn content_tree(&self) -> Option<ContentNode> {
        if self.content.is_null() {
            None
        } else {
            Some(ContentNode::from(&self.content))
        }
    }
}

/// Response wrapper `{ "story": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryEnvelope {
    pub story: Story,
}

/// Validate a story slug for the delivery API path.
///
/// Slugs are path-like (`folder/story`); empty segments and whitespace are rejected.
pub fn validate_slug(slug: &str) -> Result<&str, DomainError> {
    let trimmed = slug.trim_matches('/');
    if trimmed.is_empty()
        || trimmed.split('/').any(|segment| segment.is_empty())
        || trimmed.chars().any(char::is_whitespace)
    {
        return Err(DomainError::InvalidSlug(slug.to_string()));
    }
    Ok(trimmed)
}

/// Rich text node (`doc`, `paragraph`, `text`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<RichText>,
}

impl RichText {
    /// Document with one paragraph per entry.
    pub fn doc<S: AsRef<str>>(paragraphs: &[S]) -> Self {
        Self {
            kind: "doc".to_string(),
            text: None,
            content: paragraphs
                .iter()
                .map(|p| Self {
                    kind: "paragraph".to_string(),
                    text: None,
                    content: vec![Self {
                        kind: "text".to_string(),
                        text: Some(p.as_ref().to_string()),
                        content: Vec::new(),
                    }],
                })
                .collect(),
        }
    }
}

/// Content of a `blog_post` story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostContent {
    pub component: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: RichText,
    pub author: String,
    /// `YYYY-MM-DD`
    pub publish_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

/// Story to be created through the management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDraft {
    pub name: String,
    pub slug: String,
    pub content: BlogPostContent,
}

const INTRO_PARAGRAPH: &str = "This is the content of my first blog post. I can add rich text formatting, images, and more using Storyblok's rich text editor.";
const EDITING_PARAGRAPH: &str =
    "You can edit this content in the Storyblok Visual Editor or via the Management API.";

impl StoryDraft {
    /// The sample blog post created by `story create`, dated `publish_date`.
    pub fn sample_blog_post(publish_date: NaiveDate) -> Self {
        Self::blog_post(publish_date, &[INTRO_PARAGRAPH, EDITING_PARAGRAPH])
    }

    /// The shorter sample created by `setup`: intro paragraph only.
    pub fn setup_blog_post(publish_date: NaiveDate) -> Self {
        Self::blog_post(publish_date, &[INTRO_PARAGRAPH])
    }

    fn blog_post(publish_date: NaiveDate, paragraphs: &[&str]) -> Self {
        let slug = "my-first-blog-post".to_string();
        Self {
            name: "My First Blog Post".to_string(),
            slug: slug.clone(),
            content: BlogPostContent {
                component: BLOG_POST.to_string(),
                title: "Welcome to My Blog".to_string(),
                slug,
                excerpt: "This is my first blog post created via the Storyblok Management API."
                    .to_string(),
                content: RichText::doc(paragraphs),
                author: "John Doe".to_string(),
                publish_date: publish_date.format("%Y-%m-%d").to_string(),
                featured_image: None,
            },
        }
    }

    pub fn with_featured_image(mut self, filename: Option<String>) -> Self {
        self.content.featured_image = filename;
        self
    }
}

/// Request envelope for `POST /spaces/{id}/stories`.
#[derive(Debug, Clone, Serialize)]
pub struct NewStoryEnvelope<'a> {
    pub story: &'a StoryDraft,
    /// `1` publishes immediately, `0` saves a draft
    pub publish: u8,
}
