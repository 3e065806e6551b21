//! Rigger Core - Core types shared by the rigger workspace
//!
//! This crate provides the foundational types used throughout rigger:
//! - `ChartMetadata`: What a chart reference resolved to, including its content fingerprint
//! - `Release`: The in-memory deployment plan (assets + lifecycle steps)
//! - `State`: The persisted workspace record used to detect upstream changes
//! - `ConfigGroup`: Configuration option definitions fed to the value builder
//! - `WorkspaceLayout`: The fixed paths of a rigger workspace

pub mod chart;
pub mod config;
pub mod digest;
pub mod error;
pub mod layout;
pub mod release;
pub mod state;

pub use chart::{ChartFile, ChartMetadata};
pub use config::{ConfigGroup, ConfigItem};
pub use digest::{digest_dir, hash_bytes};
pub use error::{CoreError, Result};
pub use layout::WorkspaceLayout;
pub use release::{
    Asset, HelmAsset, KustomizeStep, MessageStep, Release, ReleaseMetadata, Spec, Step,
};
pub use state::{State, StateFile};
