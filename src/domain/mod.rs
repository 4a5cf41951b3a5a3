//! Domain layer: content model, extraction and API payload types
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod content;
pub mod dotenv;
pub mod error;
pub mod extractor;
pub mod hint;
pub mod outline;
pub mod region;
pub mod schema;
pub mod story;

pub use content::{Block, ContentNode, Fields, Primitive};
pub use dotenv::DotenvFile;
pub use error::DomainError;
pub use extractor::{extract_components, ComponentExtractor, ComponentNameSet, DEFAULT_MAX_DEPTH};
pub use hint::{registration_snippet, renderer_name};
pub use outline::component_outline;
pub use region::{url_origin, Region};
pub use schema::{ComponentSchema, FieldSchema, FieldType, BLOG_POST};
pub use story::{validate_slug, Story, StoryDraft, StoryVersion};
