//! Command dispatch and terminal rendering

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{Inspection, SetupEvent, SETUP_STEPS};
use crate::application::ApplicationError;
use crate::cli::args::{
    AssetCommands, Cli, Commands, ComponentCommands, ConfigCommands, StoryCommands,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{
    expand_path, global_config_path, project_config_path, project_dotenv_path, Settings,
};
use crate::domain::{
    component_outline, registration_snippet, ComponentSchema, Story, StoryDraft, StoryVersion,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::RealFileSystem;
use crate::infrastructure::InfraError;

/// Resolve the project directory, load settings and run the subcommand.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    if let Commands::Completion { shell } = command {
        print_completions(*shell);
        return Ok(());
    }

    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let settings = Settings::load(&RealFileSystem, Some(&project_dir))?;
    debug!(region = %settings.region, space_id = %settings.space_id, "settings loaded");

    let container = ServiceContainer::new(settings);
    run_command(command, &container, &project_dir)
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn resolve_project_dir(arg: Option<&str>) -> CliResult<PathBuf> {
    match arg {
        Some(raw) => Ok(expand_path(raw)),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("determine current directory", e))),
    }
}

/// Dispatch one subcommand against a wired container.
pub fn run_command(
    command: &Commands,
    container: &ServiceContainer,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        Commands::Components {
            slug,
            version,
            tree,
            registered,
            no_content,
            max_depth,
        } => cmd_components(
            container,
            ComponentsArgs {
                slug: slug.as_deref(),
                version: *version,
                tree: *tree,
                registered,
                show_content: !no_content,
                max_depth: *max_depth,
            },
        ),
        Commands::Component { command } => match command {
            ComponentCommands::Create => cmd_component_create(container),
        },
        Commands::Story { command } => match command {
            StoryCommands::Create { image, publish } => {
                cmd_story_create(container, image.clone(), *publish)
            }
        },
        Commands::Asset { command } => match command {
            AssetCommands::Upload { path } => cmd_asset_upload(container, path),
        },
        Commands::Setup { image } => cmd_setup(container, image.as_deref().map(expand_path)),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(container),
            ConfigCommands::Init { global } => cmd_config_init(container, project_dir, *global),
            ConfigCommands::Path => cmd_config_path(container, project_dir),
        },
        Commands::Completion { shell } => {
            print_completions(*shell);
            Ok(())
        }
    }
}

// ============================================================
// Components
// ============================================================

struct ComponentsArgs<'a> {
    slug: Option<&'a str>,
    version: StoryVersion,
    tree: bool,
    registered: &'a [String],
    show_content: bool,
    max_depth: Option<usize>,
}

#[instrument(level = "debug", skip_all, fields(slug = ?args.slug))]
fn cmd_components(container: &ServiceContainer, args: ComponentsArgs<'_>) -> CliResult<()> {
    let settings = &container.settings;
    let slug = args.slug.unwrap_or(&settings.default_slug);
    let max_depth = args.max_depth.unwrap_or(settings.max_depth);

    let Inspection {
        story,
        components,
        missing,
    } = container
        .inspector
        .inspect(slug, args.version, max_depth, args.registered)?;

    output::header(&format!("Story: {}", story.name));
    output::action("Slug", &story.slug);
    output::action("Full slug", &story.full_slug);
    output::info("");

    if components.is_empty() {
        output::warning("no components found in story content");
    } else {
        output::header(&format!("Components ({})", components.len()));
        for name in components.iter() {
            output::detail(&name);
        }
        output::info("");
        output::info("Register renderers for these components:");
        output::info(&registration_snippet(&components));
    }

    if !args.registered.is_empty() {
        output::info("");
        if missing.is_empty() {
            output::success("all discovered components are registered");
        } else {
            output::header("Not registered");
            for name in &missing {
                output::failure(name);
            }
        }
    }

    if args.tree {
        if let Some(node) = story.content_tree() {
            output::info("");
            output::header("Outline");
            output::info(&component_outline(&node, max_depth));
        }
    }

    if args.show_content {
        output::info("");
        output::header("Content");
        let pretty =
            serde_json::to_string_pretty(&story.content).unwrap_or_else(|_| story.content.to_string());
        output::info(&pretty);
    }
    Ok(())
}

// ============================================================
// Management API
// ============================================================

fn cmd_component_create(container: &ServiceContainer) -> CliResult<()> {
    let schema = ComponentSchema::blog_post();
    let created = container.components.create(&schema)?;

    output::success(&format!("component '{}' created", created.name));
    if let Some(id) = created.id {
        output::action("ID", &id);
    }
    output::info("");
    output::info("Next steps:");
    output::detail(&"blokctl asset upload <image>");
    output::detail(&"blokctl story create --image <filename>");
    Ok(())
}

fn cmd_story_create(
    container: &ServiceContainer,
    image: Option<String>,
    publish: bool,
) -> CliResult<()> {
    let draft =
        StoryDraft::sample_blog_post(Utc::now().date_naive()).with_featured_image(image);
    let story = container.stories.create(&draft, publish)?;

    output::success(&format!("story '{}' created", story.name));
    print_story(container, &story);
    Ok(())
}

fn print_story(container: &ServiceContainer, story: &Story) {
    output::action("Slug", &story.slug);
    if let Some(id) = story.id {
        output::action("ID", &id);
    }
    if let Some(uuid) = &story.uuid {
        output::action("UUID", uuid);
    }
    if let Some(id) = story.id {
        output::action("Edit", &container.settings.editor_url(id));
    }
}

fn cmd_asset_upload(container: &ServiceContainer, path: &Path) -> CliResult<()> {
    let asset = container.assets.upload(path)?;

    output::success("asset uploaded");
    output::action("Filename", &asset.filename);
    if let Some(id) = asset.id {
        output::action("ID", &id);
    }
    if let Some(url) = &asset.pretty_url {
        output::action("URL", url);
    }
    output::info("");
    output::info("Use it in a story:");
    output::detail(&format!("featured_image: \"{}\"", asset.filename));
    Ok(())
}

fn cmd_setup(container: &ServiceContainer, image: Option<PathBuf>) -> CliResult<()> {
    let date = Utc::now().date_naive();
    let report = container
        .setup()
        .run(image.as_deref(), date, |event| match event {
            SetupEvent::StepStarted { step, label } => output::step(step, SETUP_STEPS, &label),
            SetupEvent::ComponentCreated(created) => {
                output::success(&format!("component '{}' created", created.name))
            }
            SetupEvent::ComponentExists { name } => {
                output::warning(&format!("component '{name}' already exists, skipping creation"))
            }
            SetupEvent::ImageUploaded(asset) => {
                output::success(&format!("image uploaded: {}", asset.filename))
            }
            SetupEvent::ImageSkipped => {
                output::detail(&"no image given, skipping upload");
                output::detail(&"tip: blokctl setup <image>");
            }
            SetupEvent::StoryCreated(story) => {
                output::success(&format!("story '{}' created", story.name))
            }
        })?;

    output::info("");
    output::header("Setup complete");
    print_story(container, &report.story);
    Ok(())
}

// ============================================================
// Config
// ============================================================

fn cmd_config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

fn cmd_config_init(container: &ServiceContainer, project_dir: &Path, global: bool) -> CliResult<()> {
    let path = if global {
        global_config_path().ok_or_else(|| {
            CliError::from(ApplicationError::Config {
                message: "cannot determine global config directory".to_string(),
            })
        })?
    } else {
        project_config_path(project_dir)
    };

    if container.fs.exists(&path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        container
            .fs
            .create_dir_all(parent)
            .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
    }
    container
        .fs
        .write(&path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;

    output::action("Created", &path.display());
    Ok(())
}

fn cmd_config_path(container: &ServiceContainer, project_dir: &Path) -> CliResult<()> {
    let marker = |path: &Path| {
        if container.fs.exists(path) {
            "(exists)"
        } else {
            "(not found)"
        }
    };

    match global_config_path() {
        Some(path) => output::action("Global", &format!("{} {}", path.display(), marker(&path))),
        None => output::action("Global", &"(unavailable)"),
    }
    let project = project_config_path(project_dir);
    output::action("Project", &format!("{} {}", project.display(), marker(&project)));
    let dotenv = project_dotenv_path(project_dir);
    output::action("Dotenv", &format!("{} {}", dotenv.display(), marker(&dotenv)));
    Ok(())
}
