// SPDX-License-Identifier: MIT
//! # Supported Aspect Ratios and Nearest-Ratio Classification
//!
//! The editing provider accepts five output shapes. Uploaded photos come in any
//! size, so each upload is mapped to the reference ratio closest to its own.
//!
//! ## Reference Table
//!
//! | Ratio | Variant | Reference value |
//! |-------|---------|-----------------|
//! | 1:1 | `Square` | 1.0 |
//! | 3:4 | `Portrait` | 0.75 |
//! | 4:3 | `Landscape` | 1.333 |
//! | 9:16 | `Tall` | 0.5625 |
//! | 16:9 | `Wide` | 1.778 |
//!
//! The table order is significant: it is the tie-break order.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

/// Output aspect ratios accepted by the editing provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AspectRatio {
    /// Square output, the fallback for degenerate input
    #[default]
    #[value(name = "1:1")]
    Square,
    /// Portrait 3:4
    #[value(name = "3:4")]
    Portrait,
    /// Landscape 4:3
    #[value(name = "4:3")]
    Landscape,
    /// Tall 9:16 (phone portrait)
    #[value(name = "9:16")]
    Tall,
    /// Wide 16:9
    #[value(name = "16:9")]
    Wide,
}

impl AspectRatio {
    /// Every supported ratio, in tie-break order.
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Tall,
        AspectRatio::Wide,
    ];

    /// Wire representation sent to the provider (`"16:9"` etc.).
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Tall => "9:16",
            AspectRatio::Wide => "16:9",
        }
    }

    /// Reference width/height value used for nearest-ratio matching.
    pub fn reference(self) -> f64 {
        match self {
            AspectRatio::Square => 1.0,
            AspectRatio::Portrait => 0.75,
            AspectRatio::Landscape => 1.333,
            AspectRatio::Tall => 0.5625,
            AspectRatio::Wide => 1.778,
        }
    }

    /// Parse the `"W:H"` wire form. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == trimmed)
            .ok_or_else(|| {
                anyhow!(
                    "Unsupported aspect ratio: {}. Use one of 1:1, 3:4, 4:3, 9:16, 16:9",
                    value
                )
            })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Snap pixel dimensions to the closest supported aspect ratio.
///
/// Candidates are scanned in [`AspectRatio::ALL`] order and only a strictly
/// smaller difference replaces the current best, so earlier entries win ties.
///
/// # Performance
/// O(1): five subtractions on a single f64 ratio
pub fn classify(size: Size) -> AspectRatio {
    if size.w == 0 || size.h == 0 {
        return AspectRatio::Square;
    }

    let ratio = size.w as f64 / size.h as f64;
    let mut closest = AspectRatio::Square;
    let mut min_diff = f64::MAX;

    for candidate in AspectRatio::ALL {
        let diff = (ratio - candidate.reference()).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = candidate;
        }
    }
    closest
}
