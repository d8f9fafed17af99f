use glam::{Mat4, Vec3};

/// Fixed perspective camera looking at the origin from down the +Z axis.
///
/// Matches the demo's framing: the cube sits at (0, 0, 0), so the camera is
/// pulled back along Z far enough to see it. Only the aspect ratio changes at
/// runtime, tracking the window size.
pub struct SceneCamera {
    pub position: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl SceneCamera {
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_sees_the_origin() {
        let cam = SceneCamera::default();
        assert!(cam.position.z > 0.0);
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        // Origin projects inside the frustum: |xy| <= w, 0 <= z <= w.
        assert!(clip.w > 0.0);
        assert!(clip.x.abs() <= clip.w && clip.y.abs() <= clip.w);
        assert!(clip.z >= 0.0 && clip.z <= clip.w);
    }

    #[test]
    fn view_projection_is_finite() {
        let mut cam = SceneCamera::default();
        cam.set_aspect(1280, 720);
        let vp = cam.view_projection();
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn aspect_guards_against_zero_height() {
        let mut cam = SceneCamera::default();
        cam.set_aspect(800, 0);
        assert!(cam.aspect.is_finite());
    }
}
