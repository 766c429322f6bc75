use bevy::prelude::*;

/// Largest value either joystick axis reports
pub const JOYSTICK_LIMIT: f32 = 20.0;
/// Finger travel (logical pixels) per joystick unit
pub const PIXELS_PER_UNIT: f32 = 2.5;
/// Share of the window height, measured from the bottom, where joysticks live
pub const JOYSTICK_ZONE_HEIGHT: f32 = 0.45;

/// One virtual thumbstick bound to a single touch id.
///
/// Vectors are `(right, up)`, clamped to `[-JOYSTICK_LIMIT, JOYSTICK_LIMIT]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Joystick {
    touch_id: Option<u64>,
    origin: Vec2,
    vector: Vec2,
}

impl Joystick {
    pub fn vector(&self) -> Vec2 {
        self.vector
    }

    pub fn touch_id(&self) -> Option<u64> {
        self.touch_id
    }

    pub fn is_tracking(&self, id: u64) -> bool {
        self.touch_id == Some(id)
    }

    /// Claim a touch. Fails if this stick already follows another finger.
    pub fn press(&mut self, id: u64, position: Vec2) -> bool {
        if self.touch_id.is_some() {
            return false;
        }
        self.touch_id = Some(id);
        self.origin = position;
        self.vector = Vec2::ZERO;
        true
    }

    /// Update from a moved touch; other ids are ignored
    pub fn drag(&mut self, id: u64, position: Vec2) -> bool {
        if !self.is_tracking(id) {
            return false;
        }
        // Window y grows downward; joystick up is positive
        let delta = position - self.origin;
        self.vector = (Vec2::new(delta.x, -delta.y) / PIXELS_PER_UNIT)
            .clamp(Vec2::splat(-JOYSTICK_LIMIT), Vec2::splat(JOYSTICK_LIMIT));
        true
    }

    /// Release the tracked touch; the stick snaps back to neutral
    pub fn release(&mut self, id: u64) -> bool {
        if !self.is_tracking(id) {
            return false;
        }
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        *self = Joystick::default();
    }
}

/// Which stick a touch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickSide {
    /// Movement
    Left,
    /// Rotation
    Right,
}

/// The two on-screen sticks: left moves, right rotates
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct VirtualJoysticks {
    pub left: Joystick,
    pub right: Joystick,
}

impl VirtualJoysticks {
    /// Stick zone under a window position, if any
    pub fn zone_for(position: Vec2, window_size: Vec2) -> Option<JoystickSide> {
        if position.y < window_size.y * (1.0 - JOYSTICK_ZONE_HEIGHT) {
            return None;
        }
        if position.x < window_size.x * 0.5 {
            Some(JoystickSide::Left)
        } else {
            Some(JoystickSide::Right)
        }
    }

    fn stick_mut(&mut self, side: JoystickSide) -> &mut Joystick {
        match side {
            JoystickSide::Left => &mut self.left,
            JoystickSide::Right => &mut self.right,
        }
    }

    /// Route a new touch. Returns true if a stick claimed it.
    pub fn touch_started(&mut self, id: u64, position: Vec2, window_size: Vec2) -> bool {
        match Self::zone_for(position, window_size) {
            Some(side) => self.stick_mut(side).press(id, position),
            None => false,
        }
    }

    /// Returns true if the touch belongs to a stick
    pub fn touch_moved(&mut self, id: u64, position: Vec2) -> bool {
        self.left.drag(id, position) || self.right.drag(id, position)
    }

    /// Returns true if the touch belonged to a stick
    pub fn touch_ended(&mut self, id: u64) -> bool {
        self.left.release(id) || self.right.release(id)
    }

    #[cfg(test)]
    pub fn owns(&self, id: u64) -> bool {
        self.left.is_tracking(id) || self.right.is_tracking(id)
    }

    /// Neutralise any stick whose touch is no longer on the surface
    pub fn drop_lost_touches(&mut self, is_active: impl Fn(u64) -> bool) {
        for stick in [&mut self.left, &mut self.right] {
            if let Some(id) = stick.touch_id() {
                if !is_active(id) {
                    stick.reset();
                }
            }
        }
    }

    pub fn move_vector(&self) -> Vec2 {
        self.left.vector()
    }

    pub fn rotate_vector(&self) -> Vec2 {
        self.right.vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Vec2 = Vec2::new(400.0, 800.0);
    const LEFT_ZONE: Vec2 = Vec2::new(100.0, 700.0);
    const RIGHT_ZONE: Vec2 = Vec2::new(300.0, 700.0);

    #[test]
    fn test_zones() {
        assert_eq!(VirtualJoysticks::zone_for(LEFT_ZONE, WINDOW), Some(JoystickSide::Left));
        assert_eq!(VirtualJoysticks::zone_for(RIGHT_ZONE, WINDOW), Some(JoystickSide::Right));
        assert_eq!(VirtualJoysticks::zone_for(Vec2::new(100.0, 100.0), WINDOW), None);
    }

    #[test]
    fn test_drag_is_clamped_and_up_positive() {
        let mut sticks = VirtualJoysticks::default();
        assert!(sticks.touch_started(1, LEFT_ZONE, WINDOW));

        sticks.touch_moved(1, LEFT_ZONE + Vec2::new(10.0, -5.0));
        assert_eq!(sticks.move_vector(), Vec2::new(4.0, 2.0));

        sticks.touch_moved(1, LEFT_ZONE + Vec2::new(500.0, 500.0));
        assert_eq!(sticks.move_vector(), Vec2::new(JOYSTICK_LIMIT, -JOYSTICK_LIMIT));
    }

    #[test]
    fn test_release_resets_to_exact_zero() {
        let mut sticks = VirtualJoysticks::default();
        sticks.touch_started(7, RIGHT_ZONE, WINDOW);
        sticks.touch_moved(7, RIGHT_ZONE + Vec2::new(33.0, 12.0));
        assert_ne!(sticks.rotate_vector(), Vec2::ZERO);

        assert!(sticks.touch_ended(7));

        assert_eq!(sticks.rotate_vector(), Vec2::ZERO);
        assert!(!sticks.owns(7));
    }

    #[test]
    fn test_multi_touch_only_matching_id_updates() {
        let mut sticks = VirtualJoysticks::default();
        sticks.touch_started(1, LEFT_ZONE, WINDOW);
        sticks.touch_started(2, RIGHT_ZONE, WINDOW);

        sticks.touch_moved(2, RIGHT_ZONE + Vec2::new(25.0, 0.0));
        assert_eq!(sticks.move_vector(), Vec2::ZERO);
        assert_eq!(sticks.rotate_vector(), Vec2::new(10.0, 0.0));

        // A second finger on an occupied stick is not claimed
        assert!(!sticks.touch_started(3, LEFT_ZONE + Vec2::X, WINDOW));
        assert!(!sticks.touch_moved(3, LEFT_ZONE + Vec2::new(50.0, 0.0)));
        assert_eq!(sticks.move_vector(), Vec2::ZERO);
    }

    #[test]
    fn test_untracked_end_is_ignored() {
        let mut sticks = VirtualJoysticks::default();
        sticks.touch_started(1, LEFT_ZONE, WINDOW);
        sticks.touch_moved(1, LEFT_ZONE + Vec2::new(10.0, 0.0));

        assert!(!sticks.touch_ended(99));
        assert_eq!(sticks.move_vector(), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_lost_touch_resets_stick() {
        let mut sticks = VirtualJoysticks::default();
        sticks.touch_started(1, LEFT_ZONE, WINDOW);
        sticks.touch_moved(1, LEFT_ZONE + Vec2::new(-20.0, -20.0));

        sticks.drop_lost_touches(|_| false);

        assert_eq!(sticks.move_vector(), Vec2::ZERO);
        assert_eq!(sticks.left.touch_id(), None);
    }
}
