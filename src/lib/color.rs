//! RGBA payload of constant color descriptors.

use serde::{Deserialize, Serialize};

/// Four-component color as handed to the renderer.
///
/// Components are filled positionally from host literals, so `new(a, b, c, d)` always stores
/// the literal's first component in `r` whatever the host's own layout is.
#[derive(Clone, Copy, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Build a color from its components in storage order.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}
