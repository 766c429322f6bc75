use bevy::prelude::*;

/// Pointer travel (per axis, logical pixels) that turns a press into a drag
pub const DRAG_THRESHOLD: f32 = 10.0;

/// Distinguishes clicks from drags for one pointer
#[derive(Debug, Clone, Copy, Default)]
pub struct DragDetector {
    origin: Option<Vec2>,
    last: Vec2,
    dragging: bool,
}

impl DragDetector {
    pub fn press(&mut self, position: Vec2) {
        self.origin = Some(position);
        self.last = position;
        self.dragging = false;
    }

    /// Track a move; returns the delta since the previous position while
    /// pressed (zero otherwise)
    pub fn move_to(&mut self, position: Vec2) -> Vec2 {
        let Some(origin) = self.origin else {
            return Vec2::ZERO;
        };

        let travel = (position - origin).abs();
        if travel.x > DRAG_THRESHOLD || travel.y > DRAG_THRESHOLD {
            self.dragging = true;
        }

        let delta = position - self.last;
        self.last = position;
        delta
    }

    /// End the press; returns true if it was a drag
    pub fn release(&mut self) -> bool {
        let was_drag = self.dragging;
        self.origin = None;
        self.dragging = false;
        was_drag
    }

    #[cfg(test)]
    pub fn is_pressed(&self) -> bool {
        self.origin.is_some()
    }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

/// Visibility of the "how to move" hint and its re-open button.
///
/// The hint disappears after the first drag and never comes back on its
/// own; only the button (or `H`) re-opens it.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsHint {
    visible: bool,
}

impl Default for ControlsHint {
    fn default() -> Self {
        ControlsHint { visible: true }
    }
}

impl ControlsHint {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The small re-open button shows whenever the hint is hidden
    pub fn toggle_button_visible(&self) -> bool {
        !self.visible
    }

    pub fn on_drag_finished(&mut self) {
        self.visible = false;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn reopen(&mut self) {
        self.visible = true;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

/// How the surface is being driven
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputSurface {
    #[default]
    Desktop,
    /// The surface has reported touch input: joysticks replace fly controls
    Touch,
}

impl InputSurface {
    pub fn is_touch(&self) -> bool {
        matches!(self, InputSurface::Touch)
    }
}

/// User-agent heuristic for phones and tablets.
///
/// Runtime detection uses [`InputSurface`]; this mirrors the user-agent
/// matching of the web build for parity checks.
#[allow(dead_code)]
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    const MOBILE_MARKERS: &[&str] = &[
        "android",
        "webos",
        "iphone",
        "ipad",
        "ipod",
        "blackberry",
        "iemobile",
        "opera mini",
    ];
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_MARKERS.iter().any(|marker| ua.contains(marker))
}

/// W/A/S/D keys currently held (drives the HUD key highlight only)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub w: bool,
    pub a: bool,
    pub s: bool,
    pub d: bool,
}
