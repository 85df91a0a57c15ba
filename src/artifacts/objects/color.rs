//! Branch provenance color
//!
//! Every branch carries an RGB color and stamps it onto the commits it
//! creates; the lane pass of the layout engine uses color equality to decide
//! where one visual run of commits ends and the next begins. Dimming and
//! other color arithmetic for rendering are the renderer's business, not
//! modeled here.

use anyhow::Context;
use std::str::FromStr;

/// An RGB color in `#rrggbb` notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| anyhow::anyhow!("Bad color string: {}", s))?;
        // Length is in bytes, so the slices below are only safe for ASCII.
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(anyhow::anyhow!("Bad color string: {}", s));
        }

        let r = u8::from_str_radix(&hex[0..2], 16).context("Invalid red component")?;
        let g = u8::from_str_radix(&hex[2..4], 16).context("Invalid green component")?;
        let b = u8::from_str_radix(&hex[4..6], 16).context("Invalid blue component")?;

        Ok(Self { r, g, b })
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
