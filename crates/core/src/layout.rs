//! Derived layout parameters for each view state.
//!
//! Layout is a pure function of the view state. The narrow-viewport override is a separate
//! function that renderers compose with [`layout_for`] at render time; the state machine itself
//! never looks at viewport width.

use crate::constants::{
    COMPACT_HEADER_HEIGHT, DEFAULT_HEADER_HEIGHT, FULL_VIEW_HEADER_HEIGHT,
    NARROW_VIEWPORT_BREAKPOINT,
};
use crate::state::ViewState;
use serde::Serialize;
use std::time::Duration;

/// Easing intent of a header transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Smooth entrance used when the overview appears.
    SmoothEntrance,
    Smooth,
    /// Pronounced ease-out with a slight overshoot.
    EaseOutOvershoot,
}

impl Easing {
    /// Stable name, identical to the serialised form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Easing::SmoothEntrance => "smoothEntrance",
            Easing::Smooth => "smooth",
            Easing::EaseOutOvershoot => "easeOutOvershoot",
        }
    }

    /// Cubic-bezier control points `(x1, y1, x2, y2)` for renderers that need them.
    pub const fn cubic_bezier(self) -> [f32; 4] {
        match self {
            Easing::SmoothEntrance => [0.4, 0.0, 0.2, 1.0],
            Easing::Smooth => [0.25, 0.1, 0.25, 1.0],
            Easing::EaseOutOvershoot => [0.34, 1.56, 0.64, 1.0],
        }
    }
}

/// Header height and transition timing associated with a view state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Header height in logical pixels.
    pub header_height: u32,
    /// Transition duration in milliseconds.
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Layout {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration_ms))
    }
}

/// Returns the fixed layout for `state`.
pub const fn layout_for(state: ViewState) -> Layout {
    match state {
        ViewState::Default => Layout {
            header_height: DEFAULT_HEADER_HEIGHT,
            duration_ms: 400,
            easing: Easing::SmoothEntrance,
        },
        ViewState::Summary | ViewState::Note => Layout {
            header_height: COMPACT_HEADER_HEIGHT,
            duration_ms: 300,
            easing: Easing::Smooth,
        },
        ViewState::FullView => Layout {
            header_height: FULL_VIEW_HEADER_HEIGHT,
            duration_ms: 500,
            easing: Easing::EaseOutOvershoot,
        },
    }
}

/// Returns true if `width` is below the standard 768px breakpoint.
pub fn is_narrow_viewport(width: u32) -> bool {
    is_narrow_viewport_at(width, NARROW_VIEWPORT_BREAKPOINT)
}

/// Returns true if `width` is below `breakpoint`.
pub fn is_narrow_viewport_at(width: u32, breakpoint: u32) -> bool {
    width < breakpoint
}

/// Layout actually rendered for `state`.
///
/// `narrow` is the result of [`is_narrow_viewport`] or [`is_narrow_viewport_at`] for the current
/// viewport width. On narrow viewports the default view uses the compact header height, keeping its own timing.
/// Every other state renders its table layout unchanged.
pub fn effective_layout(state: ViewState, narrow: bool) -> Layout {
    let layout = layout_for(state);
    match state {
        ViewState::Default if narrow => Layout {
            header_height: COMPACT_HEADER_HEIGHT,
            ..layout
        },
        _ => layout,
    }
}
