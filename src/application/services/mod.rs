//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, HttpTransport)
//! but are themselves concrete structs, not traits.

mod api;
mod asset;
mod component;
mod inspect;
mod setup;
mod story;

pub use api::{api_error_message, is_already_exists};
pub use asset::{guess_content_type, AssetService, UploadedAsset};
pub use component::{ComponentService, CreatedComponent};
pub use inspect::{Inspection, StoryInspector};
pub use setup::{SetupEvent, SetupReport, SetupService, SETUP_STEPS};
pub use story::StoryService;
