/// Discrete interaction events from the host input layer.
/// All coordinates and deltas are in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A system was dragged and released; `dx`/`dy` is the total pointer delta.
    /// Carries the system id, not a chart key: the snapshot may be reloaded
    /// between the gesture and the frame that applies it.
    DragEnd { system: String, dx: f64, dy: f64 },
    /// The background was dragged by (dx, dy).
    Pan { dx: f64, dy: f64 },
    /// Scale multiplied by `factor`, anchored at screen point (x, y).
    Zoom { factor: f64, x: f64, y: f64 },
    /// The drawing surface changed size.
    Resize { width: f64, height: f64 },
    /// Host-defined event; the engine ignores it.
    Custom { kind: u32, a: f64, b: f64, c: f64 },
}

/// Gestures collected between two animation frames.
///
/// Pointer-move bursts arrive far faster than frames, so back-to-back pans
/// fold into one delta and back-to-back resizes keep only the final size.
/// Anything else is kept in arrival order.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        match (self.events.last_mut(), &event) {
            (Some(InputEvent::Pan { dx, dy }), InputEvent::Pan { dx: ndx, dy: ndy }) => {
                *dx += *ndx;
                *dy += *ndy;
                return;
            }
            (Some(last @ InputEvent::Resize { .. }), InputEvent::Resize { width, height }) => {
                *last = InputEvent::Resize {
                    width: *width,
                    height: *height,
                };
                return;
            }
            _ => {}
        }
        self.events.push(event);
    }

    /// Take every pending gesture for this frame.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
