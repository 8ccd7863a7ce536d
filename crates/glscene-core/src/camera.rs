use glam::{Mat3, Mat4, Vec3};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;

pub const PITCH_LIMIT: f32 = 89.0;
pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 45.0;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Abstract movement directions, decoupled from any windowing library's key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Euler-angle fly camera (yaw/pitch in degrees).
///
/// `front`, `right` and `up` are derived from the angles and kept normalized; mutate the
/// angles through the `process_*` methods so the basis stays in sync.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,

    pub yaw: f32,
    pub pitch: f32,

    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view, degrees.
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self::with_angles(position, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }

    pub fn with_angles(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut cam = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        cam.update_vectors();
        cam
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// View matrix with the translation stripped (skybox rendering).
    pub fn skybox_view(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()))
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    /// Copy of this camera looking the opposite way (rear-view mirror).
    pub fn mirrored(&self) -> Self {
        let mut cam = *self;
        cam.front = -self.front;
        cam.right = cam.front.cross(cam.world_up).normalize();
        cam.up = cam.right.cross(cam.front).normalize();
        cam
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, xoffset: f32, yoffset: f32, constrain_pitch: bool) {
        self.yaw += xoffset * self.mouse_sensitivity;
        self.pitch += yoffset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, yoffset: f32) {
        self.zoom = (self.zoom - yoffset).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::default();
        assert!(approx(cam.front, Vec3::NEG_Z));
        assert!(approx(cam.right, Vec3::X));
        assert!(approx(cam.up, Vec3::Y));
        assert_eq!(cam.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn keyboard_moves_by_speed_times_dt() {
        let mut cam = Camera::default();
        cam.process_keyboard(CameraMovement::Forward, 0.5);
        assert!(approx(cam.position, Vec3::new(0.0, 0.0, 3.0 - 1.25)));

        cam.process_keyboard(CameraMovement::Right, 1.0);
        assert!(approx(cam.position, Vec3::new(2.5, 0.0, 1.75)));
    }

    #[test]
    fn pitch_is_clamped_when_constrained() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        assert!((cam.front.length() - 1.0).abs() < 1e-5);

        cam.process_mouse_movement(0.0, -100_000.0, true);
        assert_eq!(cam.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn pitch_is_free_when_unconstrained() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(0.0, 1000.0, false);
        assert!(cam.pitch > PITCH_LIMIT);
    }

    #[test]
    fn scroll_zoom_stays_in_range() {
        let mut cam = Camera::default();
        cam.process_mouse_scroll(10.0);
        assert_eq!(cam.zoom, 35.0);
        cam.process_mouse_scroll(100.0);
        assert_eq!(cam.zoom, ZOOM_MIN);
        cam.process_mouse_scroll(-100.0);
        assert_eq!(cam.zoom, ZOOM_MAX);
    }

    #[test]
    fn mirrored_camera_faces_backwards() {
        let mut cam = Camera::default();
        cam.process_mouse_movement(120.0, 35.0, true);
        let rear = cam.mirrored();
        assert!(approx(rear.front, -cam.front));
        assert_eq!(rear.position, cam.position);
        assert!((rear.right.length() - 1.0).abs() < 1e-5);
        assert!(rear.right.dot(rear.front).abs() < 1e-5);
    }

    #[test]
    fn skybox_view_has_no_translation() {
        let mut cam = Camera::new(Vec3::new(4.0, -2.0, 9.0));
        cam.process_mouse_movement(33.0, 12.0, true);
        let v = cam.skybox_view();
        assert_eq!(v.w_axis, glam::Vec4::W);
        let p = v.transform_point3(Vec3::ZERO);
        assert!(approx(p, Vec3::ZERO));
    }

    #[test]
    fn projection_tolerates_degenerate_aspect() {
        let cam = Camera::default();
        let p = cam.projection(0.0);
        assert!(!p.x_axis.x.is_nan());
        assert_eq!(p, cam.projection(1.0));
    }
}
