//! 3D vector definition

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

#[derive(PartialEq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
/// 3D vector of f32 values, serialized as a plain `[x, y, z]` array.
pub struct Vector {
    /// Coordinate vector.
    pub inner: [f32; 3],
}

impl Index<usize> for Vector {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.inner[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.inner[index]
    }
}

impl From<[f32; 3]> for Vector {
    fn from(value: [f32; 3]) -> Self {
        Self { inner: value }
    }
}

impl From<Vector> for [f32; 3] {
    fn from(value: Vector) -> Self {
        value.inner
    }
}

impl Vector {
    /// Create a new 3D vector from values.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { inner: [x, y, z] }
    }
}
