//! Component tag colors.
//!
//! A label always maps to the same color so people learn to recognise
//! "their" components at a glance across reloads. The hash is Java's
//! `String#hashCode` over UTF-16 code units; do not change it, existing
//! boards would all shift color.

use serde::Serialize;

/// Background/foreground pair for a colored tag, both `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagColor {
    pub background: String,
    pub foreground: String,
}

const DARK_TEXT: &str = "#000000";
const LIGHT_TEXT: &str = "#ffffff";
const DARK_LUMINANCE_MAX: f64 = 110.0;

/// `s[0]*31^(n-1) + ... + s[n-1]`, wrapping in a signed 32-bit accumulator.
#[must_use]
pub fn hash_code(label: &str) -> i32 {
    label
        .encode_utf16()
        .fold(0i32, |hash, unit| i32::from(unit).wrapping_add(hash.wrapping_mul(31)))
}

/// Deterministic tag color for a label.
///
/// The low 24 bits of the hash become the background. Channels for the
/// luminance check are read low byte first, which is what every board
/// rendered so far has used.
#[must_use]
pub fn color_for(label: &str) -> TagColor {
    let rgb = hash_code(label) & 0x00FF_FFFF;
    let background = format!("#{rgb:06X}");

    let r = f64::from(rgb & 0xFF);
    let g = f64::from((rgb >> 8) & 0xFF);
    let b = f64::from((rgb >> 16) & 0xFF);
    let is_dark = 0.2125 * r + 0.7154 * g + 0.0721 * b <= DARK_LUMINANCE_MAX;

    TagColor { background, foreground: if is_dark { LIGHT_TEXT } else { DARK_TEXT }.to_string() }
}

#[cfg(test)]
#[path = "color_test.rs"]
mod tests;
