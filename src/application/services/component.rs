//! Content type creation through the management API

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};

use crate::application::services::api::{parse_body, send_checked};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::schema::ComponentEnvelope;
use crate::domain::ComponentSchema;
use crate::infrastructure::traits::{ApiRequest, HttpTransport, RequestBody};

const CREATE_COMPONENT: &str = "create component";

/// Component as echoed back by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedComponent {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Deserialize)]
struct CreatedComponentEnvelope {
    component: CreatedComponent,
}

pub struct ComponentService {
    settings: Arc<Settings>,
    http: Arc<dyn HttpTransport>,
}

impl ComponentService {
    pub fn new(settings: Arc<Settings>, http: Arc<dyn HttpTransport>) -> Self {
        Self { settings, http }
    }

    /// POST `{management}/spaces/{id}/components` with `{component: schema}`.
    #[instrument(level = "debug", skip_all, fields(name = %schema.name))]
    pub fn create(&self, schema: &ComponentSchema) -> ApplicationResult<CreatedComponent> {
        let token = self.settings.require_management_token()?;
        let url = format!(
            "{}/spaces/{}/components",
            self.settings.management_base()?,
            self.settings.space_id
        );
        let body = serde_json::to_value(ComponentEnvelope { component: schema }).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "encode component schema".to_string(),
                source: Box::new(e),
            }
        })?;

        let request = ApiRequest::post(url, RequestBody::Json(body)).bearer(token);
        let response = send_checked(self.http.as_ref(), CREATE_COMPONENT, &request)?;
        let created: CreatedComponentEnvelope = parse_body(CREATE_COMPONENT, &response)?;

        info!(id = ?created.component.id, "component created");
        Ok(created.component)
    }
}
