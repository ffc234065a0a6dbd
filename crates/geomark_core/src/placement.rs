//! Authoring form geometry: where it opens and how it follows a drag.
//!
//! Pure screen-space math, extracted for testability. Both operations keep
//! the whole form inside the viewport.

use crate::geo::ScreenPoint;

/// Gap between the click point and the form, in pixels.
pub const CLICK_OFFSET: f32 = 10.0;

/// Visible area of the page, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Rendered size of the authoring form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormSize {
    pub width: f32,
    pub height: f32,
}

impl FormSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for FormSize {
    /// Used before the form has been laid out once.
    fn default() -> Self {
        Self::new(280.0, 260.0)
    }
}

/// Clamp a form origin to `[0, vw - fw] x [0, vh - fh]`.
///
/// When the form is larger than the viewport the origin sticks to 0 so the
/// header stays reachable.
pub fn clamp_form_origin(origin: ScreenPoint, form: FormSize, viewport: Viewport) -> ScreenPoint {
    ScreenPoint {
        x: origin.x.min(viewport.width - form.width).max(0.0),
        y: origin.y.min(viewport.height - form.height).max(0.0),
    }
}

/// Compute the top-left corner of the authoring form for a click.
///
/// Prefers just right of and above the click. Flips to the left of the click
/// when the right edge would overflow, and above it when the bottom would.
pub fn place_form(click: ScreenPoint, form: FormSize, viewport: Viewport) -> ScreenPoint {
    let mut x = click.x + CLICK_OFFSET;
    let mut y = click.y - CLICK_OFFSET;

    if x + form.width > viewport.width {
        x = click.x - CLICK_OFFSET - form.width;
    }
    if y + form.height > viewport.height {
        y = click.y + CLICK_OFFSET - form.height;
    }

    clamp_form_origin(ScreenPoint { x, y }, form, viewport)
}

/// Drag interaction state for the form header.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FormDrag {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging, with the pointer's offset from the form origin at grab time
    Dragging { grab_offset: (f32, f32) },
}

impl FormDrag {
    /// Check if currently dragging
    pub fn is_dragging(&self) -> bool {
        matches!(self, FormDrag::Dragging { .. })
    }

    /// Start dragging: remember where inside the form the pointer grabbed it.
    pub fn begin(&mut self, pointer: ScreenPoint, form_origin: ScreenPoint) {
        *self = FormDrag::Dragging {
            grab_offset: (pointer.x - form_origin.x, pointer.y - form_origin.y),
        };
    }

    /// New form origin for a pointer move, or None when not dragging.
    pub fn update(
        &self,
        pointer: ScreenPoint,
        form: FormSize,
        viewport: Viewport,
    ) -> Option<ScreenPoint> {
        match self {
            FormDrag::Idle => None,
            FormDrag::Dragging { grab_offset } => Some(clamp_form_origin(
                ScreenPoint::new(pointer.x - grab_offset.0, pointer.y - grab_offset.1),
                form,
                viewport,
            )),
        }
    }

    /// Stop dragging
    pub fn end(&mut self) {
        *self = FormDrag::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: ScreenPoint, b: ScreenPoint) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    fn viewport() -> Viewport {
        Viewport::new(1024.0, 768.0)
    }

    fn fits(origin: ScreenPoint, form: FormSize, viewport: Viewport) -> bool {
        origin.x >= 0.0
            && origin.y >= 0.0
            && origin.x + form.width <= viewport.width
            && origin.y + form.height <= viewport.height
    }

    #[test]
    fn test_prefers_right_and_above() {
        let pos = place_form(ScreenPoint::new(100.0, 100.0), FormSize::default(), viewport());
        assert!(approx_eq(pos, ScreenPoint::new(110.0, 90.0)));
    }

    #[test]
    fn test_flips_left_near_right_edge() {
        let pos = place_form(ScreenPoint::new(900.0, 100.0), FormSize::default(), viewport());
        assert!(approx_eq(pos, ScreenPoint::new(610.0, 90.0)));
    }

    #[test]
    fn test_flips_up_near_bottom_edge() {
        let pos = place_form(ScreenPoint::new(100.0, 700.0), FormSize::default(), viewport());
        assert!(approx_eq(pos, ScreenPoint::new(110.0, 450.0)));
    }

    #[test]
    fn test_clamps_at_top_edge() {
        let pos = place_form(ScreenPoint::new(100.0, 5.0), FormSize::default(), viewport());
        assert!(approx_eq(pos, ScreenPoint::new(110.0, 0.0)));
    }

    #[test]
    fn test_bottom_right_corner() {
        let pos = place_form(ScreenPoint::new(1020.0, 760.0), FormSize::default(), viewport());
        assert!(approx_eq(pos, ScreenPoint::new(730.0, 510.0)));
    }

    #[test]
    fn test_form_larger_than_viewport_sticks_to_origin() {
        let small = Viewport::new(200.0, 200.0);
        let pos = place_form(ScreenPoint::new(150.0, 150.0), FormSize::default(), small);
        assert!(approx_eq(pos, ScreenPoint::new(0.0, 0.0)));
    }

    #[test]
    fn test_always_inside_viewport() {
        let form = FormSize::default();
        let vp = viewport();
        for xi in 0..=16 {
            for yi in 0..=12 {
                let click = ScreenPoint::new(xi as f32 * 64.0, yi as f32 * 64.0);
                let pos = place_form(click, form, vp);
                assert!(fits(pos, form, vp), "click {:?} placed at {:?}", click, pos);
            }
        }
    }

    #[test]
    fn test_drag_tracks_pointer_minus_grab_offset() {
        let mut drag = FormDrag::default();
        assert!(!drag.is_dragging());
        assert!(drag
            .update(ScreenPoint::new(50.0, 50.0), FormSize::default(), viewport())
            .is_none());

        drag.begin(ScreenPoint::new(130.0, 100.0), ScreenPoint::new(110.0, 90.0));
        assert!(drag.is_dragging());

        let pos = drag
            .update(ScreenPoint::new(330.0, 210.0), FormSize::default(), viewport())
            .unwrap();
        assert!(approx_eq(pos, ScreenPoint::new(310.0, 200.0)));
    }

    #[test]
    fn test_drag_clamped_to_viewport() {
        let mut drag = FormDrag::default();
        drag.begin(ScreenPoint::new(20.0, 10.0), ScreenPoint::new(0.0, 0.0));

        let past_corner = drag
            .update(ScreenPoint::new(2000.0, 2000.0), FormSize::default(), viewport())
            .unwrap();
        assert!(approx_eq(past_corner, ScreenPoint::new(744.0, 508.0)));

        let negative = drag
            .update(ScreenPoint::new(-50.0, -50.0), FormSize::default(), viewport())
            .unwrap();
        assert!(approx_eq(negative, ScreenPoint::new(0.0, 0.0)));

        drag.end();
        assert!(!drag.is_dragging());
    }
}
