//! # Configuration Module
//!
//! This module provides the configuration structure shared by the CLI and the
//! library, including environment loading and validation.

pub mod config;

pub use config::RecolorConfig;
