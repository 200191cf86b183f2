//! Color selection state machine.

use tracing::debug;

use super::{ColorPreset, HexColor};

/// Swatch shown before the user has picked anything (indigo).
pub const DEFAULT_DISPLAY_HEX: &str = "#6366F1";

/// The authoritative input, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColorSelection {
    #[default]
    None,
    Preset(&'static ColorPreset),
    /// Raw free text, sent verbatim
    CustomText(String),
    Picker(HexColor),
}

/// Which modality produced the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Preset,
    CustomText,
    Picker,
}

/// Current selection plus the swatch color shown next to it.
///
/// `display_hex` is the only value kept across modality switches: free text
/// that is not a hex code leaves the last valid swatch in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSelectionState {
    selection: ColorSelection,
    display_hex: HexColor,
}

impl Default for ColorSelectionState {
    fn default() -> Self {
        Self {
            selection: ColorSelection::None,
            display_hex: default_display_hex(),
        }
    }
}

fn default_display_hex() -> HexColor {
    HexColor::parse(DEFAULT_DISPLAY_HEX).unwrap_or_else(|| HexColor(DEFAULT_DISPLAY_HEX.into()))
}

impl ColorSelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a preset authoritative. Clears any free text.
    pub fn select_preset(&mut self, preset: &'static ColorPreset) {
        if let Some(hex) = HexColor::parse(preset.hex) {
            self.display_hex = hex.normalized();
        }
        self.selection = ColorSelection::Preset(preset);
        debug!(preset = preset.name, "color preset selected");
    }

    /// Make free text authoritative. Clears the preset.
    ///
    /// The swatch follows only when the text is a strict `#RRGGBB` code.
    pub fn type_custom(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        if let Some(hex) = HexColor::parse(&raw) {
            self.display_hex = hex.normalized();
        }
        self.selection = ColorSelection::CustomText(raw);
    }

    /// Make a color-wheel pick authoritative. The free-text field mirrors it.
    ///
    /// The prompt carries the value as picked; only the swatch is uppercased.
    pub fn pick_color(&mut self, hex: HexColor) {
        self.display_hex = hex.normalized();
        self.selection = ColorSelection::Picker(hex);
    }

    /// Drop the active target but keep the swatch.
    pub fn clear_target(&mut self) {
        self.selection = ColorSelection::None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn selection(&self) -> &ColorSelection {
        &self.selection
    }

    pub fn mode(&self) -> Option<SelectionMode> {
        match self.selection {
            ColorSelection::None => None,
            ColorSelection::Preset(_) => Some(SelectionMode::Preset),
            ColorSelection::CustomText(_) => Some(SelectionMode::CustomText),
            ColorSelection::Picker(_) => Some(SelectionMode::Picker),
        }
    }

    /// Description sent to the provider.
    pub fn prompt_text(&self) -> &str {
        match &self.selection {
            ColorSelection::None => "",
            ColorSelection::Preset(preset) => preset.prompt_text,
            ColorSelection::CustomText(text) => text,
            ColorSelection::Picker(hex) => hex.as_str(),
        }
    }

    pub fn display_hex(&self) -> &HexColor {
        &self.display_hex
    }

    /// Contents of the free-text field.
    pub fn custom_text(&self) -> &str {
        match &self.selection {
            ColorSelection::CustomText(text) => text,
            ColorSelection::Picker(hex) => hex.as_str(),
            ColorSelection::None | ColorSelection::Preset(_) => "",
        }
    }

    pub fn selected_preset(&self) -> Option<&'static ColorPreset> {
        match self.selection {
            ColorSelection::Preset(preset) => Some(preset),
            _ => None,
        }
    }

    /// Submission needs a non-empty prompt.
    pub fn can_submit(&self) -> bool {
        !self.prompt_text().is_empty()
    }
}
