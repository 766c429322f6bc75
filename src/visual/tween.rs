//! Interruptible timed interpolation.
//!
//! Every animated value (node position, node scale, companion position) owns
//! one [`TweenSlot`]. Starting a tween on a slot replaces whatever was running
//! there, so a value never has two competing writers.

use bevy::math::Vec3;

use super::utils::{ease_out_cubic, ease_out_quad};
#[cfg(test)]
use super::utils::linear;

/// Values that can be interpolated by a tween
pub trait Tweenable: Copy {
    fn interpolate(self, to: Self, t: f32) -> Self;
}

impl Tweenable for f32 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Tweenable for Vec3 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

/// Easing curve applied to normalized tween time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    #[cfg(test)]
    Linear,
    /// Gentle deceleration (hover feedback)
    OutQuad,
    /// Strong deceleration (position moves)
    OutCubic,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            #[cfg(test)]
            Easing::Linear => linear(t),
            Easing::OutQuad => ease_out_quad(t),
            Easing::OutCubic => ease_out_cubic(t),
        }
    }
}

/// A single interpolation from `from` to `to` over `duration` seconds
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Tweenable> {
    pub from: T,
    pub to: T,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl<T: Tweenable> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Tween {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Normalized progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= f32::EPSILON {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to;
        }
        self.from.interpolate(self.to, self.easing.apply(self.progress()))
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Outcome of advancing a slot by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenStep<T> {
    /// Nothing is animating
    Idle,
    /// Still running; the value for this frame
    Running(T),
    /// Reached its end this frame; the final value. The slot is now idle.
    Finished(T),
}

impl<T> TweenStep<T> {
    pub fn value(self) -> Option<T> {
        match self {
            TweenStep::Idle => None,
            TweenStep::Running(v) | TweenStep::Finished(v) => Some(v),
        }
    }
}

/// Holds at most one active tween for one animated value
#[derive(Debug, Clone, Copy)]
pub struct TweenSlot<T: Tweenable> {
    active: Option<Tween<T>>,
}

impl<T: Tweenable> Default for TweenSlot<T> {
    fn default() -> Self {
        TweenSlot { active: None }
    }
}

impl<T: Tweenable> TweenSlot<T> {
    /// Start a tween, cancelling any tween already running in this slot.
    ///
    /// Callers pass the value currently displayed as `from` so an interrupted
    /// animation continues from where it visibly is.
    pub fn start(&mut self, from: T, to: T, duration: f32, easing: Easing) {
        self.active = Some(Tween::new(from, to, duration, easing));
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Where the running tween is heading
    #[cfg(test)]
    pub fn target(&self) -> Option<T> {
        self.active.map(|tween| tween.to)
    }

    pub fn advance(&mut self, dt: f32) -> TweenStep<T> {
        let Some(tween) = self.active.as_mut() else {
            return TweenStep::Idle;
        };

        tween.elapsed += dt.max(0.0);
        let value = tween.value();

        if tween.is_finished() {
            self.active = None;
            TweenStep::Finished(value)
        } else {
            TweenStep::Running(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_reaches_target() {
        let mut slot = TweenSlot::default();
        slot.start(0.0_f32, 10.0, 1.0, Easing::Linear);

        assert_eq!(slot.advance(0.5), TweenStep::Running(5.0));
        assert_eq!(slot.advance(0.6), TweenStep::Finished(10.0));
        assert!(!slot.is_active());
        assert_eq!(slot.advance(0.1), TweenStep::Idle);
    }

    #[test]
    fn test_restart_cancels_previous() {
        let mut slot = TweenSlot::default();
        slot.start(Vec3::ZERO, Vec3::X * 10.0, 1.0, Easing::Linear);
        let midway = slot.advance(0.5).value().unwrap();

        // Restart from the displayed value toward a new target
        slot.start(midway, Vec3::ZERO, 1.0, Easing::Linear);

        assert_eq!(slot.target(), Some(Vec3::ZERO));
        let first = slot.advance(0.0).value().unwrap();
        assert!((first - midway).length() < 1e-6, "No snap on restart");
        assert_eq!(slot.advance(1.0), TweenStep::Finished(Vec3::ZERO));
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut slot = TweenSlot::default();
        slot.start(1.0_f32, 2.0, 0.0, Easing::OutCubic);

        assert_eq!(slot.advance(0.0), TweenStep::Finished(2.0));
    }

    #[test]
    fn test_easing_changes_midpoint() {
        let linear = Tween::new(0.0_f32, 1.0, 1.0, Easing::Linear);
        let mut eased = Tween::new(0.0_f32, 1.0, 1.0, Easing::OutCubic);
        eased.elapsed = 0.5;
        let mut plain = linear;
        plain.elapsed = 0.5;

        assert!(eased.value() > plain.value());
    }
}
