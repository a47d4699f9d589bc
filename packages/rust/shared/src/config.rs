//! Application configuration for fairsync.
//!
//! Project config lives at `./fairsync.toml` next to the site sources.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FairSyncError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "fairsync.toml";

// ---------------------------------------------------------------------------
// Config structs (matching fairsync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Input and output files.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Media inventory settings.
    #[serde(default)]
    pub media: MediaConfig,

    /// Fragment rendering settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Container anchor markers in the target document.
    #[serde(default)]
    pub anchor: AnchorConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Records CSV.
    #[serde(default = "default_records")]
    pub records: PathBuf,

    /// HTML document whose listing section is regenerated.
    #[serde(default = "default_document")]
    pub document: PathBuf,

    /// JSON image inventory consumed by the front-end carousel.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            records: default_records(),
            document: default_document(),
            manifest: default_manifest(),
        }
    }
}

fn default_records() -> PathBuf {
    PathBuf::from("fairs.csv")
}
fn default_document() -> PathBuf {
    PathBuf::from("fairs.html")
}
fn default_manifest() -> PathBuf {
    PathBuf::from("data/fair-images.json")
}

/// How located asset files are ordered within a record's carousel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetOrder {
    /// Lexicographic by file name.
    #[default]
    Name,
    /// Whatever order the directory listing yields.
    Filesystem,
}

/// `[media]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Directory holding one sub-folder per record identifier.
    #[serde(default = "default_media_root")]
    pub root: PathBuf,

    /// URL prefix used in image `src` attributes and manifest entries.
    #[serde(default = "default_media_url")]
    pub url: String,

    /// Accepted file extensions, without the dot. Matched case-insensitively.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Carousel ordering strategy.
    #[serde(default)]
    pub order: AssetOrder,

    /// Include dot-files such as `.DS_Store.png`.
    #[serde(default)]
    pub include_hidden: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            url: default_media_url(),
            extensions: default_extensions(),
            order: AssetOrder::default(),
            include_hidden: false,
        }
    }
}

fn default_media_root() -> PathBuf {
    PathBuf::from("images/fairs")
}
fn default_media_url() -> String {
    "images/fairs".into()
}
fn default_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Descriptions at least this many characters long become two paragraphs.
    #[serde(default = "default_split_threshold")]
    pub split_threshold: usize,

    /// HTML-escape record fields instead of inserting them verbatim.
    #[serde(default)]
    pub escape_fields: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            split_threshold: default_split_threshold(),
            escape_fields: false,
        }
    }
}

fn default_split_threshold() -> usize {
    200
}

/// `[anchor]` section.
///
/// The replaceable span runs from `open` through the first `close` that is
/// followed (whitespace aside) by every entry of `trailing` in sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorConfig {
    #[serde(default = "default_anchor_open")]
    pub open: String,

    #[serde(default = "default_anchor_close")]
    pub close: String,

    #[serde(default = "default_anchor_trailing")]
    pub trailing: Vec<String>,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            open: default_anchor_open(),
            close: default_anchor_close(),
            trailing: default_anchor_trailing(),
        }
    }
}

fn default_anchor_open() -> String {
    r#"<div class="fairs-grid">"#.into()
}
fn default_anchor_close() -> String {
    "</div>".into()
}
fn default_anchor_trailing() -> Vec<String> {
    vec!["</div>".into(), "</section>".into()]
}

impl AppConfig {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.media.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(FairSyncError::validation(
                "media.extensions must name at least one extension",
            ));
        }
        if self.render.split_threshold == 0 {
            return Err(FairSyncError::validation(
                "render.split_threshold must be positive",
            ));
        }
        if self.anchor.open.is_empty() || self.anchor.close.is_empty() {
            return Err(FairSyncError::validation(
                "anchor.open and anchor.close must not be empty",
            ));
        }
        let trailing = &self.anchor.trailing;
        if trailing.is_empty() || trailing.iter().any(|t| t.trim().is_empty()) {
            return Err(FairSyncError::validation(
                "anchor.trailing must list at least one non-blank marker",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `fairsync.toml` from `dir`. Returns defaults if the file does not exist.
pub fn load_config(dir: &Path) -> Result<AppConfig> {
    let path = dir.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content =
        std::fs::read_to_string(path).map_err(|e| FairSyncError::io("read", path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        FairSyncError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Write a default `fairsync.toml` into `dir`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(FairSyncError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| FairSyncError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FairSyncError::io("write", &path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
