// src/core/color.rs

use crate::models::{ColorSettings, GeneralSettings};
use colored::{ColoredString, Colorize};

/// Palette slot used to format a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Needs attention.
    Warning,
    /// Neutral information.
    Info,
    /// Emphasized text.
    Highlight,
    /// De-emphasized text.
    Secondary,
    /// Decorative accents.
    Accent,
}

impl ColorKind {
    /// Every slot, in palette order.
    pub const ALL: [ColorKind; 7] = [
        ColorKind::Success,
        ColorKind::Error,
        ColorKind::Warning,
        ColorKind::Info,
        ColorKind::Highlight,
        ColorKind::Secondary,
        ColorKind::Accent,
    ];

    /// Config field name of the slot.
    pub fn name(self) -> &'static str {
        match self {
            ColorKind::Success => "success",
            ColorKind::Error => "error",
            ColorKind::Warning => "warning",
            ColorKind::Info => "info",
            ColorKind::Highlight => "highlight",
            ColorKind::Secondary => "secondary",
            ColorKind::Accent => "accent",
        }
    }

    /// The palette entry for this kind.
    pub fn color_in(self, colors: &ColorSettings) -> &str {
        match self {
            ColorKind::Success => &colors.success,
            ColorKind::Error => &colors.error,
            ColorKind::Warning => &colors.warning,
            ColorKind::Info => &colors.info,
            ColorKind::Highlight => &colors.highlight,
            ColorKind::Secondary => &colors.secondary,
            ColorKind::Accent => &colors.accent,
        }
    }
}

/// Parses a palette slot name. Unknown names fall back to [`ColorKind::Info`].
pub fn parse_color_kind(name: &str) -> ColorKind {
    match name.trim().to_lowercase().as_str() {
        "success" => ColorKind::Success,
        "error" => ColorKind::Error,
        "warning" => ColorKind::Warning,
        "highlight" => ColorKind::Highlight,
        "secondary" => ColorKind::Secondary,
        "accent" => ColorKind::Accent,
        _ => ColorKind::Info,
    }
}

/// Wraps `text` in a `<color=...>` tag, unless custom colors are disabled.
pub fn format_message(
    text: &str,
    kind: ColorKind,
    colors: &ColorSettings,
    general: &GeneralSettings,
) -> String {
    if !general.enable_custom_colors {
        return text.to_string();
    }
    wrap(text, kind.color_in(colors))
}

/// Formats and concatenates several segments, each with its own palette slot.
pub fn format_segments(
    segments: &[(&str, ColorKind)],
    colors: &ColorSettings,
    general: &GeneralSettings,
) -> String {
    segments
        .iter()
        .map(|(text, kind)| format_message(text, *kind, colors, general))
        .collect()
}

/// Wraps `text` in an explicit color tag, bypassing the palette.
pub fn wrap(text: &str, color: &str) -> String {
    format!("<color={}>{}</color>", color, text)
}

/// Parses `#rrggbb` (or `rrggbb`) into its components.
pub fn parse_hex(value: &str) -> Option<(u8, u8, u8)> {
    let digits = value.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Terminal rendering of `text` in `color`; plain when the value is not a hex color.
pub fn preview(text: &str, color: &str) -> ColoredString {
    match parse_hex(color) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_kind() {
        assert_eq!(parse_color_kind("SUCCESS"), ColorKind::Success);
        assert_eq!(parse_color_kind(" accent "), ColorKind::Accent);
        assert_eq!(parse_color_kind("purple"), ColorKind::Info);
        for kind in ColorKind::ALL {
            assert_eq!(parse_color_kind(kind.name()), kind);
        }
    }

    #[test]
    fn test_format_message_uses_palette() {
        let colors = ColorSettings::default();
        let general = GeneralSettings::default();
        assert_eq!(
            format_message("Done", ColorKind::Success, &colors, &general),
            "<color=#00ff00>Done</color>"
        );
        assert_eq!(
            format_message("Hmm", ColorKind::Accent, &colors, &general),
            "<color=#ff8800>Hmm</color>"
        );
    }

    #[test]
    fn test_format_message_disabled() {
        let general = GeneralSettings {
            enable_custom_colors: false,
            ..Default::default()
        };
        assert_eq!(
            format_message("plain", ColorKind::Error, &ColorSettings::default(), &general),
            "plain"
        );
    }

    #[test]
    fn test_format_segments() {
        let formatted = format_segments(
            &[("a", ColorKind::Error), ("b", ColorKind::Info)],
            &ColorSettings::default(),
            &GeneralSettings::default(),
        );
        assert_eq!(formatted, "<color=#ff0000>a</color><color=#0000ff>b</color>");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff8800"), Some((255, 136, 0)));
        assert_eq!(parse_hex("00FF00"), Some((0, 255, 0)));
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }
}
