//! Story creation through the management API

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::services::api::{parse_body, send_checked};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::story::{NewStoryEnvelope, StoryEnvelope};
use crate::domain::{Story, StoryDraft};
use crate::infrastructure::traits::{ApiRequest, HttpTransport, RequestBody};

const CREATE_STORY: &str = "create story";

pub struct StoryService {
    settings: Arc<Settings>,
    http: Arc<dyn HttpTransport>,
}

impl StoryService {
    pub fn new(settings: Arc<Settings>, http: Arc<dyn HttpTransport>) -> Self {
        Self { settings, http }
    }

    /// POST `{management}/spaces/{id}/stories` with `{story, publish}`.
    #[instrument(level = "debug", skip_all, fields(slug = %draft.slug, publish = publish))]
    pub fn create(&self, draft: &StoryDraft, publish: bool) -> ApplicationResult<Story> {
        let token = self.settings.require_management_token()?;
        let url = format!(
            "{}/spaces/{}/stories",
            self.settings.management_base()?,
            self.settings.space_id
        );
        let envelope = NewStoryEnvelope {
            story: draft,
            publish: u8::from(publish),
        };
        let body =
            serde_json::to_value(&envelope).map_err(|e| ApplicationError::OperationFailed {
                context: "encode story".to_string(),
                source: Box::new(e),
            })?;

        let request = ApiRequest::post(url, RequestBody::Json(body)).bearer(token);
        let response = send_checked(self.http.as_ref(), CREATE_STORY, &request)?;
        let created: StoryEnvelope = parse_body(CREATE_STORY, &response)?;

        info!(id = ?created.story.id, "story created");
        Ok(created.story)
    }
}
