//! One-shot space setup: content type, optional image, sample story

use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::application::services::api::is_already_exists;
use crate::application::services::{
    AssetService, ComponentService, CreatedComponent, StoryService, UploadedAsset,
};
use crate::application::ApplicationResult;
use crate::domain::{ComponentSchema, Story, StoryDraft};

pub const SETUP_STEPS: usize = 3;

/// Progress notifications, emitted in order.
#[derive(Debug)]
pub enum SetupEvent<'a> {
    StepStarted { step: usize, label: &'static str },
    ComponentCreated(&'a CreatedComponent),
    ComponentExists { name: &'a str },
    ImageUploaded(&'a UploadedAsset),
    ImageSkipped,
    StoryCreated(&'a Story),
}

/// What setup produced. `component` is `None` when it already existed.
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub component: Option<CreatedComponent>,
    pub asset: Option<UploadedAsset>,
    pub story: Story,
}

pub struct SetupService<'a> {
    components: &'a ComponentService,
    assets: &'a AssetService,
    stories: &'a StoryService,
}

impl<'a> SetupService<'a> {
    pub fn new(
        components: &'a ComponentService,
        assets: &'a AssetService,
        stories: &'a StoryService,
    ) -> Self {
        Self {
            components,
            assets,
            stories,
        }
    }

    /// Run the three steps in order; the first failure stops the run.
    pub fn run(
        &self,
        image: Option<&Path>,
        publish_date: NaiveDate,
        mut on_event: impl FnMut(SetupEvent<'_>),
    ) -> ApplicationResult<SetupReport> {
        let schema = ComponentSchema::blog_post();

        on_event(SetupEvent::StepStarted {
            step: 1,
            label: "create component",
        });
        let component = match self.components.create(&schema) {
            Ok(created) => {
                on_event(SetupEvent::ComponentCreated(&created));
                Some(created)
            }
            Err(e) if is_already_exists(&e) => {
                warn!(name = %schema.name, "component exists, skipping creation");
                on_event(SetupEvent::ComponentExists { name: &schema.name });
                None
            }
            Err(e) => return Err(e),
        };

        on_event(SetupEvent::StepStarted {
            step: 2,
            label: "upload image",
        });
        let asset = match image {
            Some(path) => {
                let uploaded = self.assets.upload(path)?;
                on_event(SetupEvent::ImageUploaded(&uploaded));
                Some(uploaded)
            }
            None => {
                on_event(SetupEvent::ImageSkipped);
                None
            }
        };

        on_event(SetupEvent::StepStarted {
            step: 3,
            label: "create story",
        });
        let draft = StoryDraft::setup_blog_post(publish_date)
            .with_featured_image(asset.as_ref().map(|a| a.filename.clone()));
        let story = self.stories.create(&draft, false)?;
        on_event(SetupEvent::StoryCreated(&story));

        info!("setup complete");
        Ok(SetupReport {
            component,
            asset,
            story,
        })
    }
}
