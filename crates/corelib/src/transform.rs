use crate::axis::Axis;
use crate::lazy::Cached;
use crate::{Mat3, Mat4, Quat, Vec3, Vec4};

#[derive(Clone, Copy, Debug)]
struct Matrices {
    /// T * R * S
    model: Mat4,
    rotation: Mat4,
}

impl Matrices {
    const IDENTITY: Self = Self {
        model: Mat4::IDENTITY,
        rotation: Mat4::IDENTITY,
    };
}

/// Position, rotation and non-uniform scale with a lazily rebuilt matrix.
///
/// Every mutator only marks the cached matrices stale; the product
/// `translation * rotation * scale` is rebuilt on the next read.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    eye: Vec3,
    rotation: Quat,
    scale: Vec3,
    matrices: Cached<Matrices>,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            eye: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrices: Cached::clean(Matrices::IDENTITY),
        }
    }

    #[inline]
    pub fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut t = Self::identity();
        t.eye = translation;
        t.rotation = rotation;
        t.scale = scale;
        t.matrices.invalidate();
        t
    }

    /// Model matrix (column-major, glam convention).
    #[inline]
    pub fn matrix(&mut self) -> Mat4 {
        self.update().model
    }

    /// Rotation part of the model matrix, without scale or translation.
    #[inline]
    pub fn rotation_matrix(&mut self) -> Mat4 {
        self.update().rotation
    }

    fn update(&mut self) -> Matrices {
        let (eye, rotation, scale) = (self.eye, self.rotation, self.scale);
        self.matrices.get_or_update(|| {
            log::trace!("rebuilding transform matrix");
            let rotation = Mat4::from_quat(rotation);
            Matrices {
                model: Mat4::from_translation(eye) * rotation * Mat4::from_scale(scale),
                rotation,
            }
        })
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.matrices.is_dirty()
    }

    /// Rotates about an axis of the object's own frame (right-multiplied).
    ///
    /// Pass an [`Axis`] or any vector; vectors are normalized.
    pub fn rotate_local(&mut self, angle: f32, axis: impl Into<Vec3>) {
        let q = Quat::from_axis_angle(axis.into().normalize(), angle);
        self.rotation = self.rotation * q;
        self.matrices.invalidate();
    }

    /// Rotates about a fixed world axis (left-multiplied).
    pub fn rotate_global(&mut self, angle: f32, axis: impl Into<Vec3>) {
        let q = Quat::from_axis_angle(axis.into().normalize(), angle);
        self.rotation = q * self.rotation;
        self.matrices.invalidate();
    }

    /// Moves along the current local `axis`.
    pub fn translate_local(&mut self, distance: f32, axis: Axis) {
        let step = self.axis_local(axis) * distance;
        self.eye += step;
        self.matrices.invalidate();
    }

    /// Moves by `offset` expressed in the local frame, one axis at a time (X, Y, Z).
    pub fn translate_local_by(&mut self, offset: Vec3) {
        self.translate_local(offset.x, Axis::X);
        self.translate_local(offset.y, Axis::Y);
        self.translate_local(offset.z, Axis::Z);
    }

    pub fn translate_global(&mut self, distance: f32, axis: Axis) {
        self.eye += axis.unit() * distance;
        self.matrices.invalidate();
    }

    pub fn translate_global_by(&mut self, offset: Vec3) {
        self.eye += offset;
        self.matrices.invalidate();
    }

    pub fn set_scale_local(&mut self, scale: Vec3) {
        self.scale = scale;
        self.matrices.invalidate();
    }

    pub fn set_scale_local_uniform(&mut self, scale: f32) {
        self.set_scale_local(Vec3::splat(scale));
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.matrices.invalidate();
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.eye = translation;
        self.matrices.invalidate();
    }

    pub fn reset_scale(&mut self) {
        self.set_scale_local(Vec3::ONE);
    }

    pub fn reset_rotation(&mut self) {
        self.set_rotation(Quat::IDENTITY);
    }

    pub fn reset_translation(&mut self) {
        self.set_translation(Vec3::ZERO);
    }

    pub fn set_identity(&mut self) {
        self.eye = Vec3::ZERO;
        self.rotation = Quat::IDENTITY;
        self.scale = Vec3::ONE;
        self.matrices.invalidate();
    }

    /// Places the object at `eye` with its local +Z aimed at `center`.
    pub fn point_to(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        let dir = (center - eye).normalize();
        self.rotation = quat_look_lh(dir, up);
        self.eye = eye;
        self.matrices.invalidate();
    }

    /// Places the object at `eye` with its local -Z aimed at `center` (camera convention).
    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        let dir = (center - eye).normalize();
        self.rotation = quat_look_rh(dir, up);
        self.eye = eye;
        self.matrices.invalidate();
    }

    /// Blends `self` towards `target` into `dst`; `t` is clamped to `[0, 1]`.
    ///
    /// The rotation is a component-wise blend, not a slerp: the result is
    /// generally not unit length.
    pub fn lerp(&self, t: f32, target: &Transform, dst: &mut Transform) {
        let t = t.clamp(0.0, 1.0);
        dst.eye = mix3(self.eye, target.eye, t);
        dst.rotation = Quat::from_vec4(mix4(
            Vec4::from(self.rotation),
            Vec4::from(target.rotation),
            t,
        ));
        dst.scale = mix3(self.scale, target.scale, t);
        dst.matrices.invalidate();
    }

    /// Current local axis in world space (rotation only, unit length for unit rotations).
    pub fn axis_local(&mut self, axis: Axis) -> Vec3 {
        self.rotation_matrix().col(axis.column()).truncate()
    }

    #[inline]
    pub const fn axis_global(axis: Axis) -> Vec3 {
        axis.unit()
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

fn mix3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

fn mix4(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a * (1.0 - t) + b * t
}

// Basis with +Z along `dir`.
fn quat_look_lh(dir: Vec3, up: Vec3) -> Quat {
    let z = dir;
    let x = up.cross(z).normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

// Basis with -Z along `dir`.
fn quat_look_rh(dir: Vec3, up: Vec3) -> Quat {
    let z = -dir;
    let x = up.cross(z).normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}
