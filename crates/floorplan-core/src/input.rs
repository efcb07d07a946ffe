//! Input state management for pointer and keyboard events.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Up {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        position: Point,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => position,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Character(String),
    Enter,
    Escape,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Tracks the primary button, modifiers and double clicks.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    /// Whether the left button is held.
    pressed: bool,
    /// Time and place of a press that may start a double click.
    last_press: Option<(Instant, Point)>,
    /// Whether the most recent press completed a double click.
    double_click_detected: bool,
    double_click_window: Duration,
    double_click_distance: f64,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), 5.0)
    }
}

impl InputState {
    /// Create an input state with the given double-click thresholds.
    pub fn new(double_click_window: Duration, double_click_distance: f64) -> Self {
        Self {
            modifiers: Modifiers::default(),
            pressed: false,
            last_press: None,
            double_click_detected: false,
            double_click_window,
            double_click_distance,
        }
    }

    /// Process a pointer event happening now.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        self.handle_pointer_event_at(event, Instant::now());
    }

    /// Process a pointer event that happened at `now`.
    pub fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down { position, button } => {
                self.double_click_detected = false;
                if button != MouseButton::Left {
                    return;
                }
                self.double_click_detected = self.last_press.is_some_and(|(at, pressed)| {
                    now.saturating_duration_since(at) < self.double_click_window
                        && position.distance(pressed) < self.double_click_distance
                });
                // A third press starts a new pair
                self.last_press = if self.double_click_detected {
                    None
                } else {
                    Some((now, position))
                };
                self.pressed = true;
            }
            PointerEvent::Up { button, .. } => {
                if button == MouseButton::Left {
                    self.pressed = false;
                }
            }
            PointerEvent::Move { .. } => {}
        }
    }

    /// Set the current modifier keys.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Whether the last press completed a double click.
    pub fn is_double_click(&self) -> bool {
        self.double_click_detected
    }

    /// Whether the left button is held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::default();
        let t0 = Instant::now();
        input.handle_pointer_event_at(down(10.0, 10.0), t0);
        assert!(!input.is_double_click());
        input.handle_pointer_event_at(down(11.0, 10.0), t0 + Duration::from_millis(200));
        assert!(input.is_double_click());
        // A third press does not chain into another double click
        input.handle_pointer_event_at(down(11.0, 10.0), t0 + Duration::from_millis(300));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_slow_or_distant_clicks_are_single() {
        let mut input = InputState::default();
        let t0 = Instant::now();
        input.handle_pointer_event_at(down(10.0, 10.0), t0);
        input.handle_pointer_event_at(down(10.0, 10.0), t0 + Duration::from_millis(800));
        assert!(!input.is_double_click());
        input.handle_pointer_event_at(down(40.0, 10.0), t0 + Duration::from_millis(900));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_pressed_tracks_left_button() {
        let mut input = InputState::default();
        input.handle_pointer_event(down(10.0, 10.0));
        input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(25.0, 5.0),
        });
        assert!(input.is_pressed());
        input.handle_pointer_event(PointerEvent::Up {
            position: Point::new(25.0, 5.0),
            button: MouseButton::Right,
        });
        assert!(input.is_pressed());
        input.handle_pointer_event(PointerEvent::Up {
            position: Point::new(25.0, 5.0),
            button: MouseButton::Left,
        });
        assert!(!input.is_pressed());
    }
}
