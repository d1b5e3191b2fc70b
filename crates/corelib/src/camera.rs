use crate::axis::Axis;
use crate::lazy::Cached;
use crate::transform::Transform;
use crate::uniform::CameraUniform;
use crate::{Mat4, Quat, Vec3, Vec4};

/// Projection kind of a [`Camera`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// World-space picking ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Camera built on a [`Transform`] eye (right-handed, looks down local -Z).
///
/// View and projection matrices are cached separately: moving the eye never
/// rebuilds the projection and changing frustum parameters never rebuilds the view.
///
///*  NOTE: projections are OpenGL-style (clip z in [-1,1]).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    transform: Transform,
    frustum: Frustum,
    view: Cached<Mat4>,
    proj: Cached<Mat4>,
}

/// Projection parameters. Aspect and depth range are shared by both kinds.
#[derive(Clone, Copy, Debug)]
struct Frustum {
    projection: Projection,
    fov_y_deg: f32,
    height: f32,
    aspect: f32,
    z_near: f32,
    z_far: f32,
}

impl Frustum {
    fn matrix(&self, z_near: f32, z_far: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), self.aspect, z_near, z_far)
            }
            Projection::Orthographic => {
                let half_h = self.height * 0.5;
                let half_w = half_h * self.aspect;
                Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, z_near, z_far)
            }
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        let mut proj = Cached::clean(Mat4::IDENTITY);
        proj.invalidate();
        Self {
            transform: Transform::identity(),
            frustum: Frustum {
                projection: Projection::Perspective,
                fov_y_deg: 90.0,
                height: 1.0,
                aspect: 1.0,
                z_near: 0.1,
                z_far: 10.0,
            },
            view: Cached::clean(Mat4::IDENTITY),
            proj,
        }
    }

    pub fn new_perspective(fov_y_deg: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        let mut cam = Self::new();
        cam.set_perspective(fov_y_deg, aspect, z_near, z_far);
        cam
    }

    pub fn new_orthographic(height: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        let mut cam = Self::new();
        cam.set_orthographic(height, aspect, z_near, z_far);
        cam
    }

    /// Read-only eye transform; does not touch the view cache.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable eye transform. The view is assumed changed.
    #[inline]
    pub fn transform_mut(&mut self) -> &mut Transform {
        self.view.invalidate();
        &mut self.transform
    }

    /// Eye model matrix. Refreshes the transform cache only; the view stays valid.
    pub fn eye_matrix(&mut self) -> Mat4 {
        self.transform.matrix()
    }

    /// Local axis of the eye in world space, without invalidating the view.
    pub fn axis_local(&mut self, axis: Axis) -> Vec3 {
        self.transform.axis_local(axis)
    }

    pub fn rotate_local(&mut self, angle: f32, axis: impl Into<Vec3>) {
        self.transform_mut().rotate_local(angle, axis);
    }

    pub fn rotate_global(&mut self, angle: f32, axis: impl Into<Vec3>) {
        self.transform_mut().rotate_global(angle, axis);
    }

    pub fn translate_local(&mut self, distance: f32, axis: Axis) {
        self.transform_mut().translate_local(distance, axis);
    }

    pub fn translate_global(&mut self, distance: f32, axis: Axis) {
        self.transform_mut().translate_global(distance, axis);
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.transform_mut().set_translation(translation);
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform_mut().set_rotation(rotation);
    }

    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        self.transform_mut().look_at(eye, center, up);
    }

    pub fn point_to(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        self.transform_mut().point_to(eye, center, up);
    }

    /// World-to-camera matrix, the inverse of the eye transform.
    pub fn view(&mut self) -> Mat4 {
        let transform = &mut self.transform;
        self.view.get_or_update(|| transform.matrix().inverse())
    }

    /// Cached projection for the stored near/far planes.
    pub fn proj(&mut self) -> Mat4 {
        let frustum = &self.frustum;
        self.proj.get_or_update(|| frustum.matrix(frustum.z_near, frustum.z_far))
    }

    /// Projection for custom near/far planes. Leaves the cached one alone.
    pub fn proj_with(&self, z_near: f32, z_far: f32) -> Mat4 {
        self.frustum.matrix(z_near, z_far)
    }

    #[inline]
    pub fn proj_view(&mut self) -> Mat4 {
        self.proj() * self.view()
    }

    pub fn set_projection(&mut self, projection: Projection) {
        if projection != self.frustum.projection {
            log::debug!("camera projection {:?} -> {:?}", self.frustum.projection, projection);
            self.frustum.projection = projection;
            self.proj.invalidate();
        }
    }

    pub fn set_perspective(&mut self, fov_y_deg: f32, aspect: f32, z_near: f32, z_far: f32) {
        self.frustum.fov_y_deg = fov_y_deg;
        self.frustum.aspect = aspect;
        self.frustum.z_near = z_near;
        self.frustum.z_far = z_far;
        self.frustum.projection = Projection::Perspective;
        self.proj.invalidate();
    }

    pub fn set_orthographic(&mut self, height: f32, aspect: f32, z_near: f32, z_far: f32) {
        self.frustum.height = height;
        self.frustum.aspect = aspect;
        self.frustum.z_near = z_near;
        self.frustum.z_far = z_far;
        self.frustum.projection = Projection::Orthographic;
        self.proj.invalidate();
    }

    /// Vertical field of view in degrees. Only dirties a perspective projection.
    pub fn set_fov_y(&mut self, fov_y_deg: f32) {
        self.frustum.fov_y_deg = fov_y_deg;
        if self.frustum.projection == Projection::Perspective {
            self.proj.invalidate();
        }
    }

    /// Orthographic box height. Only dirties an orthographic projection.
    pub fn set_height(&mut self, height: f32) {
        self.frustum.height = height;
        if self.frustum.projection == Projection::Orthographic {
            self.proj.invalidate();
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.frustum.aspect = aspect;
        self.proj.invalidate();
    }

    pub fn set_z_near(&mut self, z_near: f32) {
        self.frustum.z_near = z_near;
        self.proj.invalidate();
    }

    pub fn set_z_far(&mut self, z_far: f32) {
        self.frustum.z_far = z_far;
        self.proj.invalidate();
    }

    #[inline]
    pub fn projection(&self) -> Projection {
        self.frustum.projection
    }

    #[inline]
    pub fn fov_y(&self) -> f32 {
        self.frustum.fov_y_deg
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.frustum.height
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.frustum.aspect
    }

    #[inline]
    pub fn z_near(&self) -> f32 {
        self.frustum.z_near
    }

    #[inline]
    pub fn z_far(&self) -> f32 {
        self.frustum.z_far
    }

    #[inline]
    pub fn is_view_dirty(&self) -> bool {
        self.view.is_dirty()
    }

    #[inline]
    pub fn is_projection_dirty(&self) -> bool {
        self.proj.is_dirty()
    }

    /// Ray through a viewport position; `viewport_x`/`viewport_y` in `[0, 1]`, origin top-left.
    pub fn cast_ray(&mut self, viewport_x: f32, viewport_y: f32) -> Ray {
        let view_x = viewport_x * 2.0 - 1.0;
        let view_y = 1.0 - viewport_y * 2.0;
        let model = self.transform.matrix();
        let Frustum {
            projection,
            fov_y_deg,
            height,
            aspect,
            ..
        } = self.frustum;

        match projection {
            Projection::Perspective => {
                let tan_half = (fov_y_deg.to_radians() * 0.5).tan();
                let local = Vec4::new(view_x * aspect * tan_half, view_y * tan_half, -1.0, 0.0);
                Ray {
                    origin: self.transform.eye(),
                    direction: (model * local).truncate().normalize(),
                }
            }
            Projection::Orthographic => {
                // Offset on the near face is a point: transformed with w = 1, not normalized.
                let half_h = height * 0.5;
                let local = Vec4::new(view_x * half_h * aspect, view_y * half_h, 0.0, 1.0);
                Ray {
                    origin: (model * local).truncate(),
                    direction: -self.transform.axis_local(Axis::Z),
                }
            }
        }
    }

    /// Matrices packed for upload.
    pub fn uniform(&mut self) -> CameraUniform {
        CameraUniform::new(self.view(), self.proj(), self.transform.eye())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn defaults() {
        let mut cam = Camera::default();
        assert_eq!(cam.projection(), Projection::Perspective);
        assert_eq!(cam.fov_y(), 90.0);
        assert_eq!(cam.aspect(), 1.0);
        assert_eq!(cam.z_near(), 0.1);
        assert_eq!(cam.z_far(), 10.0);
        assert_eq!(cam.view(), Mat4::IDENTITY);
        assert!(cam.is_projection_dirty());
        let expected = Mat4::perspective_rh_gl(90f32.to_radians(), 1.0, 0.1, 10.0);
        assert_eq!(cam.proj(), expected);
        assert!(!cam.is_projection_dirty());
    }

    #[test]
    fn view_is_inverse_of_eye() {
        let mut cam = Camera::new();
        cam.look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
        let v = cam.view();
        let m = cam.transform_mut().matrix();
        assert!((v * m).abs_diff_eq(Mat4::IDENTITY, EPS));
        // eye maps to the camera-space origin
        let eye = v.transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!(eye.abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn mutable_handle_dirties_view() {
        let mut cam = Camera::new();
        let _ = cam.view();
        assert!(!cam.is_view_dirty());
        let _ = cam.transform();
        assert!(!cam.is_view_dirty());
        let _ = cam.transform_mut();
        assert!(cam.is_view_dirty());

        let _ = cam.view();
        cam.translate_global(2.0, Axis::Z);
        assert!(cam.is_view_dirty());
        let v = cam.view();
        assert!(v.transform_point3(Vec3::new(0.0, 0.0, 2.0)).abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn aspect_changes_projection_only() {
        let mut cam = Camera::new();
        cam.look_at(Vec3::new(0.0, 1.0, 4.0), Vec3::ZERO, Vec3::Y);
        let v0 = cam.view();
        let p0 = cam.proj();

        cam.set_aspect(16.0 / 9.0);
        assert!(!cam.is_view_dirty());
        assert!(cam.is_projection_dirty());
        assert_eq!(cam.view().to_cols_array(), v0.to_cols_array());
        assert_ne!(cam.proj(), p0);
    }

    #[test]
    fn repeated_reads_are_bit_identical() {
        let mut cam = Camera::new_perspective(60.0, 1.5, 0.5, 50.0);
        cam.rotate_local(0.4, Axis::X);
        let (v0, p0) = (cam.view(), cam.proj());
        let (v1, p1) = (cam.view(), cam.proj());
        assert_eq!(v0.to_cols_array(), v1.to_cols_array());
        assert_eq!(p0.to_cols_array(), p1.to_cols_array());
    }

    #[test]
    fn fov_and_height_only_dirty_matching_kind() {
        let mut cam = Camera::new();
        let _ = cam.proj();
        cam.set_height(5.0);
        assert!(!cam.is_projection_dirty());
        cam.set_fov_y(45.0);
        assert!(cam.is_projection_dirty());

        cam.set_projection(Projection::Orthographic);
        let _ = cam.proj();
        cam.set_fov_y(30.0);
        assert!(!cam.is_projection_dirty());
        cam.set_height(2.0);
        assert!(cam.is_projection_dirty());

        let _ = cam.proj();
        cam.set_z_near(0.2);
        assert!(cam.is_projection_dirty());
        let _ = cam.proj();
        cam.set_z_far(20.0);
        assert!(cam.is_projection_dirty());
    }

    #[test]
    fn translate_local_moves_along_eye_axes() {
        let mut cam = Camera::new();
        cam.rotate_global(std::f32::consts::FRAC_PI_2, Axis::Y);
        let _ = cam.view();
        cam.translate_local(3.0, Axis::Z);
        assert!(cam.is_view_dirty());
        // local +Z points along world +X after the turn
        assert!(cam.transform().eye().abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), EPS));
        let v = cam.view();
        assert!(v.transform_point3(Vec3::new(3.0, 0.0, 0.0)).abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn eye_reads_keep_view_clean() {
        let mut cam = Camera::new();
        cam.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::new(5.0, 0.0, 5.0), Vec3::Y);
        let v = cam.view();
        assert!(!cam.is_view_dirty());

        assert!((-cam.axis_local(Axis::Z)).abs_diff_eq(Vec3::X, EPS));
        let m = cam.eye_matrix();
        assert!(!cam.is_view_dirty());
        assert!((v * m).abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    fn full_setters_always_dirty_projection() {
        let mut cam = Camera::new_perspective(60.0, 1.5, 0.5, 50.0);
        let _ = cam.proj();
        cam.set_perspective(60.0, 1.5, 0.5, 50.0);
        assert!(cam.is_projection_dirty());

        cam.set_orthographic(3.0, 1.5, 0.5, 50.0);
        let _ = cam.proj();
        cam.set_orthographic(3.0, 1.5, 0.5, 50.0);
        assert!(cam.is_projection_dirty());
        assert_eq!(cam.proj(), Mat4::orthographic_rh_gl(-2.25, 2.25, -1.5, 1.5, 0.5, 50.0));
    }

    #[test]
    fn proj_with_orthographic_box() {
        let mut cam = Camera::new_orthographic(4.0, 2.0, 0.1, 10.0);
        let cached = cam.proj();
        let custom = cam.proj_with(1.0, 20.0);
        assert_eq!(custom, Mat4::orthographic_rh_gl(-4.0, 4.0, -2.0, 2.0, 1.0, 20.0));
        assert!(!cam.is_projection_dirty());
        assert_eq!(cam.proj(), cached);
    }

    #[test]
    fn set_projection_same_kind_is_noop() {
        let mut cam = Camera::new();
        let _ = cam.proj();
        cam.set_projection(Projection::Perspective);
        assert!(!cam.is_projection_dirty());
    }

    #[test]
    fn orthographic_box() {
        let mut cam = Camera::new_orthographic(4.0, 2.0, 0.1, 10.0);
        assert_eq!(cam.projection(), Projection::Orthographic);
        let p = cam.proj();
        // corner of the box maps to the NDC corner
        let c = p.project_point3(Vec3::new(4.0, 2.0, -0.1));
        assert!(c.abs_diff_eq(Vec3::new(1.0, 1.0, -1.0), EPS));
        assert_eq!(p, Mat4::orthographic_rh_gl(-4.0, 4.0, -2.0, 2.0, 0.1, 10.0));
    }

    #[test]
    fn proj_with_leaves_cache_untouched() {
        let mut cam = Camera::new();
        let cached = cam.proj();
        cam.set_aspect(2.0);
        let custom = cam.proj_with(1.0, 100.0);
        assert!(cam.is_projection_dirty());
        assert_eq!(custom, Mat4::perspective_rh_gl(90f32.to_radians(), 2.0, 1.0, 100.0));
        assert_ne!(cam.proj(), cached);

        let before = cam.proj();
        let _ = cam.proj_with(0.01, 1.0);
        assert!(!cam.is_projection_dirty());
        assert_eq!(cam.proj(), before);
    }

    #[test]
    fn perspective_ray_through_center_goes_forward() {
        let mut cam = Camera::new();
        let ray = cam.cast_ray(0.5, 0.5);
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!(ray.direction.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPS));
        assert!(!cam.is_view_dirty());
    }

    #[test]
    fn perspective_ray_edges_follow_fov() {
        let mut cam = Camera::new();
        // top-left corner at 90 degrees, aspect 1: 45 degrees off both axes
        let ray = cam.cast_ray(0.0, 0.0);
        let expected = Vec3::new(-1.0, 1.0, -1.0).normalize();
        assert!(ray.direction.abs_diff_eq(expected, EPS));

        cam.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::new(5.0, 0.0, 5.0), Vec3::Y);
        let ray = cam.cast_ray(0.5, 0.5);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 5.0));
        assert!(ray.direction.abs_diff_eq(Vec3::X, EPS));
        assert!(ray.point_at(2.0).abs_diff_eq(Vec3::new(2.0, 0.0, 5.0), EPS));
    }

    #[test]
    fn orthographic_rays_are_parallel() {
        let mut cam = Camera::new_orthographic(2.0, 2.0, 0.1, 10.0);
        cam.set_translation(Vec3::new(0.0, 0.0, 3.0));

        let center = cam.cast_ray(0.5, 0.5);
        assert!(center.origin.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPS));
        assert!(center.direction.abs_diff_eq(-Vec3::Z, EPS));

        let corner = cam.cast_ray(1.0, 0.0);
        assert!(corner.origin.abs_diff_eq(Vec3::new(2.0, 1.0, 3.0), EPS));
        assert_eq!(corner.direction, center.direction);
    }

    #[test]
    fn uniform_carries_matrices() {
        let mut cam = Camera::new();
        cam.set_translation(Vec3::new(1.0, 0.0, 0.0));
        let u = cam.uniform();
        assert_eq!(u.view, cam.view().to_cols_array_2d());
        assert_eq!(u.proj, cam.proj().to_cols_array_2d());
        assert_eq!(u.eye, [1.0, 0.0, 0.0, 1.0]);
    }
}
