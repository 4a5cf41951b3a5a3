//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;

use crate::domain::StoryVersion;

/// Storyblok helper: inspect story components, create content types, stories and assets
#[derive(Parser, Debug)]
#[command(name = "blokctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding .blokctl.toml and .env (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<String>,

    /// Print shell completions to stdout
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the components a story uses
    Components {
        /// Story slug (default: settings.default_slug)
        slug: Option<String>,

        /// Story version to fetch (draft or published)
        #[arg(long, default_value = "draft")]
        version: StoryVersion,

        /// Print the nested component outline
        #[arg(long)]
        tree: bool,

        /// Already registered renderers, comma separated
        #[arg(long, value_delimiter = ',')]
        registered: Vec<String>,

        /// Do not print the story content JSON
        #[arg(long)]
        no_content: bool,

        /// Nesting depth at which discovery stops
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Manage content types
    Component {
        #[command(subcommand)]
        command: ComponentCommands,
    },

    /// Manage stories
    Story {
        #[command(subcommand)]
        command: StoryCommands,
    },

    /// Manage assets
    Asset {
        #[command(subcommand)]
        command: AssetCommands,
    },

    /// Create the blog_post type, upload an image and create a sample story
    Setup {
        /// Image to upload and use as featured image
        #[arg(value_hint = ValueHint::FilePath)]
        image: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ComponentCommands {
    /// Create the blog_post content type
    Create,
}

#[derive(Subcommand, Debug)]
pub enum StoryCommands {
    /// Create the sample blog post
    Create {
        /// Asset filename for featured_image
        #[arg(long)]
        image: Option<String>,

        /// Publish immediately instead of saving a draft
        #[arg(long)]
        publish: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssetCommands {
    /// Upload an image
    Upload {
        /// Image file
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config (tokens redacted)
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
