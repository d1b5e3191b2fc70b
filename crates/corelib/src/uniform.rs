//! Plain-old-data matrix blocks for the renderer (16-byte aligned, column-major).

use bytemuck::{Pod, Zeroable};

use crate::transform::Transform;
use crate::{Mat4, Vec3};

/// Camera UBO: view, projection and eye position (w = 1).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub fn new(view: Mat4, proj: Mat4, eye: Vec3) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Per-object model matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn from_transform(transform: &mut Transform) -> Self {
        Self {
            model: transform.matrix().to_cols_array_2d(),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
