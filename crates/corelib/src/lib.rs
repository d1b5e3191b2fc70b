//! Core types: math re-exports, Transform, Camera, motion curves, particles.

pub use glam::{Mat3, Mat4, Quat, Vec3, Vec4, vec3};

pub mod axis;
pub mod camera;
pub mod error;
mod lazy;
pub mod motion;
pub mod particles;
pub mod transform;
pub mod uniform;

pub use axis::Axis;
pub use camera::{Camera, Projection, Ray};
pub use error::{CoreError, CoreResult};
pub use motion::{Ease, FlowType, Motion};
pub use particles::{Particles, ParticlesConfig};
pub use transform::Transform;
pub use uniform::{CameraUniform, ModelUniform};
