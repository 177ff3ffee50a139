use crate::foundation::{core::Point, ids::TouchSequence};

/// Raw input from the gesture recognizers of the preview surface.
///
/// One touch sequence spans finger-down to finger-up. Drag, magnify and rotate changes of the same
/// sequence may interleave arbitrarily; each is forwarded as soon as it arrives.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum GestureEvent {
    /// First contact at a frame-local point.
    Began { sequence: TouchSequence, at: Point },
    /// A recognizer reported a new value.
    Changed {
        sequence: TouchSequence,
        change: GestureChange,
    },
    /// All fingers lifted.
    Ended { sequence: TouchSequence },
    /// The platform aborted the interaction.
    Cancelled { sequence: TouchSequence },
}

impl GestureEvent {
    pub fn sequence(&self) -> TouchSequence {
        match *self {
            GestureEvent::Began { sequence, .. }
            | GestureEvent::Changed { sequence, .. }
            | GestureEvent::Ended { sequence }
            | GestureEvent::Cancelled { sequence } => sequence,
        }
    }
}

/// Latest value of one recognizer. All values are absolute, never deltas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GestureChange {
    /// Current frame-local location of the dragged overlay's center.
    Drag(Point),
    /// Magnification relative to gesture start.
    Magnify(f64),
    /// Rotation in radians relative to gesture start.
    Rotate(f64),
}
