//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/blokctl/blokctl.toml`
//! 3. Project config: `<project_dir>/.blokctl.toml`
//! 4. Project dotenv: `<project_dir>/.env` (`STORYBLOK_*` keys)
//! 5. Environment variables: `STORYBLOK_*` prefix

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{url_origin, DotenvFile, Region, DEFAULT_MAX_DEPTH};
use crate::infrastructure::traits::FileSystem;

/// Space the bundled scripts were written against.
pub const DEFAULT_SPACE_ID: &str = "289379687375858";
pub const DEFAULT_SLUG: &str = "mysore/mysore-history";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_PREFIX: &str = "STORYBLOK";
pub const MANAGEMENT_TOKEN_VAR: &str = "STORYBLOK_MANAGEMENT_API_TOKEN";
pub const DELIVERY_TOKEN_VAR: &str = "STORYBLOK_DELIVERY_API_TOKEN";

const REDACTED: &str = "<redacted>";

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RawSettings {
    pub space_id: Option<String>,
    pub region: Option<Region>,
    pub api_base_url: Option<String>,
    pub management_token: Option<String>,
    pub delivery_token: Option<String>,
    pub default_slug: Option<String>,
    pub max_depth: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Unified configuration for blokctl.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Numeric space id used in management API paths
    pub space_id: String,
    pub region: Region,
    /// Overrides the region endpoints; only the origin is used
    pub api_base_url: Option<String>,
    pub management_token: Option<String>,
    pub delivery_token: Option<String>,
    /// Story inspected when `components` is run without a slug
    pub default_slug: String,
    pub max_depth: usize,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            space_id: DEFAULT_SPACE_ID.to_string(),
            region: Region::default(),
            api_base_url: None,
            management_token: None,
            delivery_token: None,
            default_slug: DEFAULT_SLUG.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Get the XDG config directory for blokctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "blokctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("blokctl.toml"))
}

/// Get the path to the project config file.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".blokctl.toml")
}

/// Get the path to the project dotenv file.
pub fn project_dotenv_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".env")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path argument.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(raw),
    }
}

/// Empty values and `your_...` template values count as unset.
pub fn is_placeholder_token(token: &str) -> bool {
    let token = token.trim();
    token.is_empty() || token.contains("your_")
}

/// Where settings are read from. `Settings::load` fills this from the real environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub global_path: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
    /// Process environment snapshot
    pub env: config::Map<String, String>,
}

impl ConfigSources {
    pub fn from_process(project_dir: Option<&Path>) -> Self {
        Self {
            global_path: global_config_path(),
            project_dir: project_dir.map(Path::to_path_buf),
            env: prefixed_env(std::env::vars_os()),
        }
    }
}

/// `STORYBLOK_*` entries of an environment snapshot. Non-UTF-8 entries are skipped.
fn prefixed_env(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> config::Map<String, String> {
    vars.into_iter()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect()
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<RawSettings> {
    let content = fs
        .read_to_string(path)
        .map_err(|e| ApplicationError::Config {
            message: format!("read {}: {}", path.display(), e),
        })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings for `project_dir` from the real config files and environment.
    pub fn load(fs: &dyn FileSystem, project_dir: Option<&Path>) -> ApplicationResult<Self> {
        Self::load_from(fs, &ConfigSources::from_process(project_dir))
    }

    /// Load settings with layered precedence.
    ///
    /// File layers only override the keys they set. Dotenv entries and
    /// process env vars are combined (process env wins) and applied last.
    pub fn load_from(fs: &dyn FileSystem, sources: &ConfigSources) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = &sources.global_path {
            if fs.is_file(global_path) {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(fs, global_path)?);
            }
        }

        let mut env = config::Map::new();
        if let Some(project_dir) = &sources.project_dir {
            let local_path = project_config_path(project_dir);
            if fs.is_file(&local_path) {
                debug!(path = %local_path.display(), "loading project config");
                current = current.merge_with(&load_raw_settings(fs, &local_path)?);
            }

            let dotenv_path = project_dotenv_path(project_dir);
            if fs.is_file(&dotenv_path) {
                debug!(path = %dotenv_path.display(), "loading dotenv");
                let content = fs
                    .read_to_string(&dotenv_path)
                    .map_err(|e| ApplicationError::Config {
                        message: format!("read {}: {}", dotenv_path.display(), e),
                    })?;
                let dotenv = DotenvFile::parse(&content);
                env.extend(
                    dotenv
                        .variables
                        .into_iter()
                        .filter(|(k, _)| k.starts_with(ENV_PREFIX)),
                );
            }
        }
        env.extend(sources.env.iter().map(|(k, v)| (k.clone(), v.clone())));

        current.apply_env_overrides(env)
    }

    /// Overlay wins if Some, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            space_id: overlay
                .space_id
                .clone()
                .unwrap_or_else(|| self.space_id.clone()),
            region: overlay.region.unwrap_or(self.region),
            api_base_url: overlay
                .api_base_url
                .clone()
                .or_else(|| self.api_base_url.clone()),
            management_token: overlay
                .management_token
                .clone()
                .or_else(|| self.management_token.clone()),
            delivery_token: overlay
                .delivery_token
                .clone()
                .or_else(|| self.delivery_token.clone()),
            default_slug: overlay
                .default_slug
                .clone()
                .unwrap_or_else(|| self.default_slug.clone()),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
        }
    }

    /// Apply STORYBLOK_* variables as explicit overrides. Blank values count as unset.
    fn apply_env_overrides(self, env: config::Map<String, String>) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).source(Some(env)))
            .build()
            .map_err(config_err)?;
        let get = |key: &str| {
            config
                .get_string(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
        };

        let region = get("region").map(|val| val.parse::<Region>()).transpose()?;
        let overlay = RawSettings {
            space_id: get("space_id"),
            region,
            api_base_url: get("api_base_url"),
            management_token: get("management_api_token"),
            delivery_token: get("delivery_api_token"),
            ..RawSettings::default()
        };

        Ok(self.merge_with(&overlay))
    }

    /// Content delivery base URL (`.../v2/cdn`).
    pub fn delivery_base(&self) -> ApplicationResult<String> {
        match &self.api_base_url {
            Some(url) if !url.trim().is_empty() => Ok(format!("{}/v2/cdn", url_origin(url)?)),
            _ => Ok(self.region.delivery_base()),
        }
    }

    /// Management API base URL (`.../v1`).
    pub fn management_base(&self) -> ApplicationResult<String> {
        match &self.api_base_url {
            Some(url) if !url.trim().is_empty() => Ok(format!("{}/v1", url_origin(url)?)),
            _ => Ok(self.region.management_base()),
        }
    }

    pub fn require_management_token(&self) -> ApplicationResult<&str> {
        usable_token(self.management_token.as_deref()).ok_or(ApplicationError::MissingToken {
            variable: MANAGEMENT_TOKEN_VAR,
            hint: "get it from Storyblok: Settings > Access Tokens > Management API",
        })
    }

    pub fn require_delivery_token(&self) -> ApplicationResult<&str> {
        usable_token(self.delivery_token.as_deref()).ok_or(ApplicationError::MissingToken {
            variable: DELIVERY_TOKEN_VAR,
            hint: "get it from Storyblok: Settings > Access Tokens (preview or public token)",
        })
    }

    /// Web editor link for a story.
    pub fn editor_url(&self, story_id: u64) -> String {
        format!(
            "https://app.storyblok.com/#/spaces/{}/stories/{}",
            self.space_id, story_id
        )
    }

    /// Copy with tokens replaced, for display.
    pub fn redacted(&self) -> Self {
        let redact = |t: &Option<String>| t.as_ref().map(|_| REDACTED.to_string());
        Self {
            management_token: redact(&self.management_token),
            delivery_token: redact(&self.delivery_token),
            ..self.clone()
        }
    }

    /// Show the effective configuration as TOML, tokens redacted.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(&self.redacted()).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# blokctl configuration
#
# Locations (by precedence, lowest to highest):
#   Global:  ~/.config/blokctl/blokctl.toml
#   Project: <project_dir>/.blokctl.toml
#   Dotenv:  <project_dir>/.env (STORYBLOK_* keys)
#   Env:     STORYBLOK_* environment variables
#
# Tokens are better kept in .env or the environment:
#   {MANAGEMENT_TOKEN_VAR}=...
#   {DELIVERY_TOKEN_VAR}=...

# Numeric space id
# space_id = "{DEFAULT_SPACE_ID}"

# Data-center region: eu, us, ap or ca
# region = "eu"

# Custom API origin, overrides the region (STORYBLOK_API_BASE_URL)
# api_base_url = "https://api.storyblok.com"

# Story inspected by `blokctl components` without a slug
# default_slug = "{DEFAULT_SLUG}"

# Nesting depth at which component discovery stops
# max_depth = {DEFAULT_MAX_DEPTH}

# HTTP timeout in seconds
# timeout_secs = {DEFAULT_TIMEOUT_SECS}
"#
        )
    }
}

fn usable_token(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !is_placeholder_token(t)).map(str::trim)
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_no_overlay_when_merging_then_keeps_defaults() {
        let settings = Settings::default().merge_with(&RawSettings::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_set_keys_change() {
        let overlay = RawSettings {
            region: Some(Region::Us),
            max_depth: Some(8),
            ..RawSettings::default()
        };

        let settings = Settings::default().merge_with(&overlay);

        assert_eq!(settings.region, Region::Us);
        assert_eq!(settings.max_depth, 8);
        assert_eq!(settings.space_id, DEFAULT_SPACE_ID);
    }

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("your_management_token_here", true)]
    #[case("abc123", false)]
    fn test_placeholder_token(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_placeholder_token(token), expected);
    }

    #[test]
    fn given_base_url_override_when_resolving_then_uses_origin() {
        let settings = Settings {
            api_base_url: Some("http://localhost:9000/some/path".into()),
            ..Settings::default()
        };

        assert_eq!(settings.delivery_base().unwrap(), "http://localhost:9000/v2/cdn");
        assert_eq!(settings.management_base().unwrap(), "http://localhost:9000/v1");
    }

    #[test]
    fn given_tokens_when_rendering_toml_then_redacted() {
        let settings = Settings {
            management_token: Some("secret-m".into()),
            delivery_token: Some("secret-d".into()),
            ..Settings::default()
        };

        let toml = settings.to_toml().unwrap();

        assert!(!toml.contains("secret-m"));
        assert!(!toml.contains("secret-d"));
        assert!(toml.contains(REDACTED));
    }

    #[test]
    fn given_process_env_snapshot_when_filtering_then_keeps_prefixed_keys() {
        let env = prefixed_env([
            (OsString::from("STORYBLOK_REGION"), OsString::from("us")),
            (OsString::from("HOME"), OsString::from("/home/me")),
        ]);

        assert_eq!(env.len(), 1);
        assert_eq!(env.get("STORYBLOK_REGION").map(String::as_str), Some("us"));
    }

    #[cfg(unix)]
    #[test]
    fn given_non_utf8_env_entry_when_filtering_then_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let env = prefixed_env([
            (
                OsString::from("STORYBLOK_SPACE_ID"),
                OsString::from_vec(vec![0x66, 0xff, 0x6f]),
            ),
            (OsString::from_vec(vec![0xff, 0xfe]), OsString::from("x")),
            (OsString::from("STORYBLOK_REGION"), OsString::from("ap")),
        ]);

        assert_eq!(env.len(), 1);
        assert!(env.contains_key("STORYBLOK_REGION"));
    }

    #[test]
    fn given_tilde_when_expand_path_then_expands_to_home() {
        let home = std::env::var("HOME").expect("HOME should be set");
        let expanded = expand_path("~/site");
        assert!(expanded.to_string_lossy().starts_with(&home));
    }
}
