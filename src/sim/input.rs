//! Input schemes that turn device samples into platform deltas
//!
//! Each scheme yields a per-frame horizontal delta that is already
//! sensitivity-scaled; the platform's movement policy does the rest.

use glam::Vec2;

use crate::settings::{InputKind, PlatformTuning};

/// One sample of a pointer (touch or mouse) gesture, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32 },
    Move { x: f32 },
    Up,
    Cancel,
}

/// Touch/mouse drag: delta is the pointer travel since the previous sample
#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    sensitivity: f32,
    last_x: Option<f32>,
}

impl DragGesture {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            last_x: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.last_x.is_some()
    }

    /// Feed one sample; returns the scaled delta it produced
    pub fn handle(&mut self, event: PointerEvent) -> f32 {
        match event {
            PointerEvent::Down { x } => {
                self.last_x = Some(x);
                0.0
            }
            PointerEvent::Move { x } => match self.last_x.replace(x) {
                Some(last) => (x - last) * self.sensitivity,
                None => {
                    // Move without a press: not dragging
                    self.last_x = None;
                    0.0
                }
            },
            PointerEvent::Up | PointerEvent::Cancel => {
                self.last_x = None;
                0.0
            }
        }
    }
}

/// Held direction (keyboard or stick) in `[-1, 1]`
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisInput {
    pub value: f32,
}

impl AxisInput {
    pub fn delta(&self) -> f32 {
        self.value.clamp(-1.0, 1.0)
    }
}

/// Input scheme picked when the game is assembled
#[derive(Debug, Clone)]
pub enum InputScheme {
    TouchDrag(DragGesture),
    Axis(AxisInput),
}

impl InputScheme {
    pub fn touch_drag(sensitivity: f32) -> Self {
        InputScheme::TouchDrag(DragGesture::new(sensitivity))
    }

    pub fn axis() -> Self {
        InputScheme::Axis(AxisInput::default())
    }

    /// Scheme configured for the platform
    pub fn from_tuning(tuning: &PlatformTuning) -> Self {
        match tuning.input {
            InputKind::TouchDrag => Self::touch_drag(tuning.sensitivity),
            InputKind::Axis => Self::axis(),
        }
    }

    /// Feed a pointer sample. Returns the drag delta (zero for axis input).
    pub fn pointer(&mut self, event: PointerEvent) -> f32 {
        match self {
            InputScheme::TouchDrag(drag) => drag.handle(event),
            InputScheme::Axis(_) => 0.0,
        }
    }

    /// Set the held direction. Ignored by drag input.
    pub fn set_axis(&mut self, value: f32) {
        if let InputScheme::Axis(axis) = self {
            axis.value = value;
        }
    }

    /// Continuous delta for this frame (drag deltas are event-driven)
    pub fn held_delta(&self) -> f32 {
        match self {
            InputScheme::TouchDrag(_) => 0.0,
            InputScheme::Axis(axis) => axis.delta(),
        }
    }
}

/// Direction used when the player taps to launch
pub const DEFAULT_LAUNCH_DIRECTION: Vec2 = Vec2::Y;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_reports_travel_since_last_sample() {
        let mut drag = DragGesture::new(0.02);
        assert_eq!(drag.handle(PointerEvent::Down { x: 100.0 }), 0.0);
        assert!((drag.handle(PointerEvent::Move { x: 150.0 }) - 1.0).abs() < 1e-6);
        assert!((drag.handle(PointerEvent::Move { x: 125.0 }) + 0.5).abs() < 1e-6);
        assert_eq!(drag.handle(PointerEvent::Up), 0.0);
        assert!(!drag.is_active());
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut drag = DragGesture::new(0.02);
        assert_eq!(drag.handle(PointerEvent::Move { x: 50.0 }), 0.0);
        assert_eq!(drag.handle(PointerEvent::Move { x: 90.0 }), 0.0);
        assert!(!drag.is_active());
    }

    #[test]
    fn test_cancel_ends_drag() {
        let mut drag = DragGesture::new(1.0);
        drag.handle(PointerEvent::Down { x: 0.0 });
        drag.handle(PointerEvent::Cancel);
        assert_eq!(drag.handle(PointerEvent::Move { x: 10.0 }), 0.0);
    }

    #[test]
    fn test_scheme_from_tuning() {
        let mut tuning = PlatformTuning::default();
        tuning.sensitivity = 0.1;
        let mut scheme = InputScheme::from_tuning(&tuning);
        scheme.pointer(PointerEvent::Down { x: 0.0 });
        assert!((scheme.pointer(PointerEvent::Move { x: 10.0 }) - 1.0).abs() < 1e-6);

        tuning.input = InputKind::Axis;
        assert!(matches!(InputScheme::from_tuning(&tuning), InputScheme::Axis(_)));
    }

    #[test]
    fn test_axis_scheme() {
        let mut scheme = InputScheme::axis();
        scheme.set_axis(3.0);
        assert_eq!(scheme.held_delta(), 1.0);
        assert_eq!(scheme.pointer(PointerEvent::Down { x: 1.0 }), 0.0);

        let mut touch = InputScheme::touch_drag(0.5);
        touch.set_axis(1.0);
        assert_eq!(touch.held_delta(), 0.0);
        touch.pointer(PointerEvent::Down { x: 0.0 });
        assert_eq!(touch.pointer(PointerEvent::Move { x: 4.0 }), 2.0);
    }
}
