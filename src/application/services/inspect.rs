//! Story inspection service
//!
//! Fetches a story from the delivery API and lists the components it uses.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::api::{parse_body, send_checked};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::story::StoryEnvelope;
use crate::domain::{validate_slug, ComponentExtractor, ComponentNameSet, Story, StoryVersion};
use crate::infrastructure::traits::{ApiRequest, HttpTransport};

const FETCH_STORY: &str = "fetch story";

/// Result of inspecting one story.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub story: Story,
    /// Component tags in first-discovery order
    pub components: ComponentNameSet,
    /// Discovered tags absent from the registered list
    pub missing: Vec<String>,
}

/// Service for story inspection.
pub struct StoryInspector {
    settings: Arc<Settings>,
    http: Arc<dyn HttpTransport>,
}

impl StoryInspector {
    pub fn new(settings: Arc<Settings>, http: Arc<dyn HttpTransport>) -> Self {
        Self { settings, http }
    }

    /// GET `{delivery}/stories/{slug}?version=..&token=..`.
    #[instrument(level = "debug", skip(self))]
    pub fn fetch_story(&self, slug: &str, version: StoryVersion) -> ApplicationResult<Story> {
        let slug = validate_slug(slug)?;
        let token = self.settings.require_delivery_token()?;
        let url = format!("{}/stories/{}", self.settings.delivery_base()?, slug);

        let request = ApiRequest::get(url)
            .query("version", version.as_str())
            .query("token", token);
        let response = send_checked(self.http.as_ref(), FETCH_STORY, &request)?;
        let envelope: StoryEnvelope = parse_body(FETCH_STORY, &response)?;

        debug!(name = %envelope.story.name, "story fetched");
        Ok(envelope.story)
    }

    /// Fetch the story and collect its component tags.
    pub fn inspect(
        &self,
        slug: &str,
        version: StoryVersion,
        max_depth: usize,
        registered: &[String],
    ) -> ApplicationResult<Inspection> {
        let story = self.fetch_story(slug, version)?;
        let tree = story.content_tree();
        let components = ComponentExtractor::with_max_depth(max_depth)
            .extract(tree.as_ref(), ComponentNameSet::new());
        let missing = if registered.is_empty() {
            Vec::new()
        } else {
            components
                .missing_from(registered)
                .map(str::to_string)
                .collect()
        };

        info!(
            slug,
            found = components.len(),
            missing = missing.len(),
            "story inspected"
        );
        Ok(Inspection {
            story,
            components,
            missing,
        })
    }
}
