//! Shared utility functions for output formatting

use chrono::{DateTime, Local, Utc};
use termcolor::Color;

pub const BRANCH: &str = "├── ";
pub const LAST_BRANCH: &str = "└── ";

/// Connector drawn in front of an entry.
pub fn connector(is_last: bool) -> &'static str {
    if is_last { LAST_BRANCH } else { BRANCH }
}

/// Prefix for the children of an entry drawn with `prefix`.
pub fn continuation_prefix(prefix: &str, is_last: bool) -> String {
    if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    }
}

/// Deterministic color for a file extension.
///
/// The extension is hashed to a hue; saturation and value are fixed so that
/// every extension stays readable on dark terminals. Files without an
/// extension are white.
pub fn extension_color(extension: Option<&str>) -> Color {
    let Some(ext) = extension.filter(|e| !e.is_empty()) else {
        return Color::White;
    };
    let hue = (fnv1a(ext.as_bytes()) % 360) as f64 / 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.7, 0.95);
    Color::Rgb(r, g, b)
}

/// Hex form of [`extension_color`], for HTML output.
pub fn extension_hex(extension: Option<&str>) -> String {
    match extension_color(extension) {
        Color::Rgb(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        _ => "#ffffff".to_string(),
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

/// HSV in `[0, 1]` to 8-bit RGB.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to_u8 = |x: f64| (x * 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

/// Escape text for inclusion in HTML element content or attributes.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Local-time rendering of a modification timestamp.
pub fn format_modified(modified: &DateTime<Utc>) -> String {
    modified
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Pad `text` with spaces to `width` characters.
pub fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}
