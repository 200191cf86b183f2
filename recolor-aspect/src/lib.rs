// SPDX-License-Identifier: MIT
//! # recolor-aspect: Output Aspect Ratios for Generative Image Edits
//!
//! Generative image editors only render a handful of output shapes. This crate
//! snaps arbitrary source dimensions to the closest one so the edit request can
//! ask for an output that matches the uploaded photo.
//!
//! ## Key Components
//!
//! - [`presets`]: the supported [`AspectRatio`](presets::AspectRatio) set and the
//!   nearest-ratio classifier
//!
//! ## Classification Rules
//!
//! - The source ratio is `width / height`
//! - Candidates are compared in a fixed order: 1:1, 3:4, 4:3, 9:16, 16:9
//! - The smallest absolute difference wins; ties go to the earlier candidate
//! - Degenerate input (zero width or height) snaps to 1:1
//!
//! The ratio is advisory metadata only. Nothing here crops or resizes pixels.
//!
//! ## Usage Example
//!
//! ```rust
//! use recolor_aspect::presets::{classify, AspectRatio, Size};
//!
//! assert_eq!(classify(Size { w: 1920, h: 1080 }), AspectRatio::Wide);
//! assert_eq!(classify(Size { w: 768, h: 1024 }).as_str(), "3:4");
//! ```

pub mod presets;

pub use presets::{classify, AspectRatio, Size};
