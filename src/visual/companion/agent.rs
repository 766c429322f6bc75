use bevy::math::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::visual::{
    tween::{Easing, TweenSlot, TweenStep},
    utils::exp_approach,
};

// === Wandering ===
/// Home position of the companion
pub const COMPANION_ANCHOR: Vec3 = Vec3::new(3.0, 2.0, -3.0);
/// How far the companion may drift from its anchor before being pulled back
pub const WANDER_RADIUS: f32 = 5.0;
/// Seconds between wander direction changes
pub const WANDER_INTERVAL: f32 = 3.0;
/// Wander speed scale (units per second)
pub const WANDER_SPEED: f32 = 1.2;

// === Chat choreography ===
/// Distance in front of the camera where the companion waits during chat
pub const CHAT_DISTANCE: f32 = 2.0;
pub const TO_CHAT_DURATION: f32 = 1.5;
pub const RETURN_DURATION: f32 = 1.5;
/// Time for the idle bobbing to reach full amplitude
pub const BOB_FADE_IN: f32 = 0.5;
const BOB_AMPLITUDE: Vec3 = Vec3::new(0.04, 0.07, 0.0);
/// Angular speeds of the two bobbing sinusoids (rad/s)
const BOB_SPEED_X: f32 = 1.7;
const BOB_SPEED_Y: f32 = 2.3;
/// Period of the pulse while a response is streaming (seconds)
pub const PULSE_PERIOD: f32 = 0.6;
const PULSE_AMPLITUDE: f32 = 0.15;
/// Exponential relax rate of the scale back to 1 after streaming
const SCALE_RELAX_RATE: f32 = 6.0;

/// Behaviour mode of the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionMode {
    Wandering,
    TransitioningToChat,
    ChatIdle,
    Returning,
}

/// The wandering chat companion.
///
/// Cycles `Wandering → TransitioningToChat → ChatIdle → Returning → Wandering`.
/// Open/close signals come from the scene controller; the remaining
/// transitions happen when the single position tween completes.
#[derive(Debug, Clone)]
pub struct CompanionAgent {
    mode: CompanionMode,
    anchor: Vec3,
    position: Vec3,
    wander_velocity: Vec3,
    /// Seconds since the wander direction last changed
    wander_clock: f32,
    position_tween: TweenSlot<Vec3>,
    /// Where the companion settled in front of the camera
    chat_position: Vec3,
    /// Seconds spent in ChatIdle (drives bobbing and pulsing)
    idle_time: f32,
    scale: f32,
}

impl Default for CompanionAgent {
    fn default() -> Self {
        Self::new(COMPANION_ANCHOR)
    }
}

impl CompanionAgent {
    pub fn new(anchor: Vec3) -> Self {
        CompanionAgent {
            mode: CompanionMode::Wandering,
            anchor,
            position: anchor,
            wander_velocity: Vec3::ZERO,
            wander_clock: 0.0,
            position_tween: TweenSlot::default(),
            chat_position: anchor,
            idle_time: 0.0,
            scale: 1.0,
        }
    }

    // === Queries ===

    pub fn mode(&self) -> CompanionMode {
        self.mode
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[cfg(test)]
    pub fn wander_velocity(&self) -> Vec3 {
        self.wander_velocity
    }

    #[cfg(test)]
    pub fn is_tweening(&self) -> bool {
        self.position_tween.is_active()
    }

    /// Where the running position tween ends, if any
    #[cfg(test)]
    pub fn tween_target(&self) -> Option<Vec3> {
        self.position_tween.target()
    }

    // === Triggers ===

    /// Fly to a spot in front of the camera.
    ///
    /// The target is computed once, here; later camera moves are not
    /// tracked. No-op (returns false) when already heading to or waiting in
    /// the chat position.
    pub fn open_chat(&mut self, camera_position: Vec3, camera_forward: Vec3) -> bool {
        match self.mode {
            CompanionMode::Wandering | CompanionMode::Returning => {
                let target = camera_position + camera_forward.normalize_or_zero() * CHAT_DISTANCE;
                self.position_tween
                    .start(self.position, target, TO_CHAT_DURATION, Easing::OutCubic);
                self.mode = CompanionMode::TransitioningToChat;
                true
            }
            CompanionMode::TransitioningToChat | CompanionMode::ChatIdle => false,
        }
    }

    /// Head back to the anchor. No-op (returns false) unless chatting.
    pub fn close_chat(&mut self) -> bool {
        match self.mode {
            CompanionMode::TransitioningToChat | CompanionMode::ChatIdle => {
                self.position_tween
                    .start(self.position, self.anchor, RETURN_DURATION, Easing::OutCubic);
                self.scale = 1.0;
                self.mode = CompanionMode::Returning;
                true
            }
            CompanionMode::Wandering | CompanionMode::Returning => false,
        }
    }

    // === Per-frame update ===

    pub fn update<R: Rng>(&mut self, dt: f32, streaming: bool, rng: &mut R) {
        match self.mode {
            CompanionMode::Wandering => self.wander(dt, rng),
            CompanionMode::TransitioningToChat => {
                if let TweenStep::Running(p) | TweenStep::Finished(p) = self.step_tween(dt) {
                    self.position = p;
                }
                if !self.position_tween.is_active() {
                    self.chat_position = self.position;
                    self.idle_time = 0.0;
                    self.mode = CompanionMode::ChatIdle;
                }
            }
            CompanionMode::ChatIdle => self.idle(dt, streaming),
            CompanionMode::Returning => {
                if let TweenStep::Running(p) | TweenStep::Finished(p) = self.step_tween(dt) {
                    self.position = p;
                }
                if !self.position_tween.is_active() {
                    self.mode = CompanionMode::Wandering;
                    self.wander_velocity = Vec3::ZERO;
                    // Pick a fresh direction on the next frame
                    self.wander_clock = WANDER_INTERVAL;
                }
            }
        }
    }

    fn step_tween(&mut self, dt: f32) -> TweenStep<Vec3> {
        self.position_tween.advance(dt)
    }

    fn wander<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        self.wander_clock += dt;
        if self.wander_clock >= WANDER_INTERVAL {
            self.wander_clock = 0.0;
            self.wander_velocity = random_wander_velocity(rng);
        }

        // A drift correction owns the position until it lands
        if let Some(p) = self.step_tween(dt).value() {
            self.position = p;
            return;
        }

        self.position += self.wander_velocity * dt;

        if self.position.distance(self.anchor) > WANDER_RADIUS {
            self.position_tween
                .start(self.position, self.anchor, RETURN_DURATION, Easing::OutCubic);
        }
    }

    fn idle(&mut self, dt: f32, streaming: bool) {
        self.idle_time += dt;

        let fade = (self.idle_time / BOB_FADE_IN).min(1.0);
        let bob = Vec3::new(
            (self.idle_time * BOB_SPEED_X).sin(),
            (self.idle_time * BOB_SPEED_Y).sin(),
            0.0,
        ) * BOB_AMPLITUDE
            * fade;
        self.position = self.chat_position + bob;

        if streaming {
            self.scale = 1.0 + PULSE_AMPLITUDE * (self.idle_time * TAU / PULSE_PERIOD).sin();
        } else {
            self.scale += (1.0 - self.scale) * exp_approach(SCALE_RELAX_RATE, dt);
        }
    }
}

/// Small random drift with a slight upward bias
fn random_wander_velocity<R: Rng>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.2,
        rng.random::<f32>() - 0.5,
    ) * WANDER_SPEED
}
