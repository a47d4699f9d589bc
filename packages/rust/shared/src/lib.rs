//! Shared types, error model, and configuration for fairsync.
//!
//! This crate is the foundation depended on by all other fairsync crates.
//! It provides:
//! - [`FairSyncError`] — the unified error type
//! - Domain types ([`Record`], [`AssetSet`])
//! - Configuration ([`AppConfig`], [`AnchorConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AnchorConfig, AppConfig, AssetOrder, CONFIG_FILE_NAME, MediaConfig, PathsConfig,
    RenderConfig, init_config, load_config, load_config_from,
};
pub use error::{FairSyncError, Result};
pub use types::{AssetSet, Record};
