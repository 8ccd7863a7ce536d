use std::collections::HashSet;

use glscene_core::{Camera, CameraMovement};
use winit::event::VirtualKeyCode;

/// WASD and the arrow keys.
pub fn movement_for_key(key: VirtualKeyCode) -> Option<CameraMovement> {
    match key {
        VirtualKeyCode::W | VirtualKeyCode::Up => Some(CameraMovement::Forward),
        VirtualKeyCode::S | VirtualKeyCode::Down => Some(CameraMovement::Backward),
        VirtualKeyCode::A | VirtualKeyCode::Left => Some(CameraMovement::Left),
        VirtualKeyCode::D | VirtualKeyCode::Right => Some(CameraMovement::Right),
        _ => None,
    }
}

/// Held movement keys, tracked per physical key so W and Up can be held and released
/// independently. Opposite directions may be held together and cancel out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    held: HashSet<VirtualKeyCode>,
}

impl InputState {
    /// Returns `true` when `key` is a movement key.
    pub fn handle_key(&mut self, key: VirtualKeyCode, pressed: bool) -> bool {
        if movement_for_key(key).is_none() {
            return false;
        }
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
        true
    }

    /// Whether any key bound to `dir` is down.
    pub fn is_held(&self, dir: CameraMovement) -> bool {
        self.held
            .iter()
            .any(|key| movement_for_key(*key) == Some(dir))
    }

    /// Release everything (focus lost).
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Move `camera` once per held direction.
    pub fn apply(&self, camera: &mut Camera, dt: f32) {
        for dir in [
            CameraMovement::Forward,
            CameraMovement::Backward,
            CameraMovement::Left,
            CameraMovement::Right,
        ] {
            if self.is_held(dir) {
                camera.process_keyboard(dir, dt);
            }
        }
    }
}

/// Edge detector for one-shot keys. winit repeats `Pressed` while a key is held; only the
/// first press of each hold counts.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyLatch {
    down: HashSet<VirtualKeyCode>,
}

impl KeyLatch {
    /// Returns `true` only for the press that starts a hold.
    pub fn press(&mut self, key: VirtualKeyCode, pressed: bool) -> bool {
        if pressed {
            self.down.insert(key)
        } else {
            self.down.remove(&key);
            false
        }
    }

    pub fn clear(&mut self) {
        self.down.clear();
    }
}

/// Raw mouse delta to camera offsets. Screen y grows downward, pitch grows upward.
pub fn look_offsets(dx: f64, dy: f64) -> (f32, f32) {
    (dx as f32, -dy as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn arrows_alias_wasd() {
        assert_eq!(movement_for_key(VirtualKeyCode::Up), movement_for_key(VirtualKeyCode::W));
        assert_eq!(movement_for_key(VirtualKeyCode::Left), Some(CameraMovement::Left));
        assert_eq!(movement_for_key(VirtualKeyCode::Space), None);
    }

    #[test]
    fn diagonal_movement_applies_both_directions() {
        let mut input = InputState::default();
        assert!(input.handle_key(VirtualKeyCode::W, true));
        assert!(input.handle_key(VirtualKeyCode::D, true));
        assert!(!input.handle_key(VirtualKeyCode::Escape, true));

        let mut cam = Camera::new(Vec3::ZERO);
        input.apply(&mut cam, 1.0);
        let speed = cam.movement_speed;
        assert!((cam.position - Vec3::new(speed, 0.0, -speed)).length() < 1e-4);
    }

    #[test]
    fn release_and_clear() {
        let mut input = InputState::default();
        input.handle_key(VirtualKeyCode::S, true);
        input.handle_key(VirtualKeyCode::A, true);
        input.handle_key(VirtualKeyCode::S, false);
        assert!(!input.is_held(CameraMovement::Backward));
        assert!(input.is_held(CameraMovement::Left));
        input.clear();
        assert_eq!(input, InputState::default());
    }

    #[test]
    fn aliased_keys_are_tracked_separately() {
        let mut input = InputState::default();
        input.handle_key(VirtualKeyCode::W, true);
        input.handle_key(VirtualKeyCode::Up, true);
        input.handle_key(VirtualKeyCode::Up, false);
        assert!(input.is_held(CameraMovement::Forward), "W is still down");
        input.handle_key(VirtualKeyCode::W, false);
        assert!(!input.is_held(CameraMovement::Forward));
    }

    #[test]
    fn latch_ignores_key_repeat() {
        let mut latch = KeyLatch::default();
        assert!(latch.press(VirtualKeyCode::F, true));
        assert!(!latch.press(VirtualKeyCode::F, true));
        assert!(!latch.press(VirtualKeyCode::F, true));
        assert!(!latch.press(VirtualKeyCode::F, false));
        assert!(latch.press(VirtualKeyCode::F, true));

        latch.clear();
        assert!(latch.press(VirtualKeyCode::F, true));
    }

    #[test]
    fn look_offsets_invert_y() {
        assert_eq!(look_offsets(3.0, 4.0), (3.0, -4.0));
    }
}
