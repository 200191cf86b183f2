//! Built-in color swatches.

/// A predefined named color with a display swatch and provider-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub hex: &'static str,
    pub prompt_text: &'static str,
}

/// Catalog shown as the swatch grid, in display order.
pub const COLOR_PRESETS: [ColorPreset; 8] = [
    ColorPreset {
        name: "Classic Red",
        hex: "#DC2626",
        prompt_text: "vibrant classic red",
    },
    ColorPreset {
        name: "Navy Blue",
        hex: "#1E3A8A",
        prompt_text: "deep navy blue",
    },
    ColorPreset {
        name: "Emerald Green",
        hex: "#059669",
        prompt_text: "rich emerald green",
    },
    ColorPreset {
        name: "Pastel Pink",
        hex: "#FBCFE8",
        prompt_text: "soft pastel pink",
    },
    ColorPreset {
        name: "Gold",
        hex: "#F59E0B",
        prompt_text: "metallic gold",
    },
    ColorPreset {
        name: "Silver",
        hex: "#9CA3AF",
        prompt_text: "metallic silver",
    },
    ColorPreset {
        name: "Black",
        hex: "#000000",
        prompt_text: "matte black",
    },
    ColorPreset {
        name: "White",
        hex: "#FFFFFF",
        prompt_text: "pure white",
    },
];

/// Find a preset by name, ignoring case, spaces, dashes and underscores.
///
/// `"navy-blue"`, `"NavyBlue"` and `"navy blue"` all resolve to "Navy Blue".
pub fn find_preset(name: &str) -> Option<&'static ColorPreset> {
    let wanted = normalize(name);
    COLOR_PRESETS
        .iter()
        .find(|preset| normalize(preset.name) == wanted)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
