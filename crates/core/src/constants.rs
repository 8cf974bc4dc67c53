//! Constants used throughout the PView core crate.
//!
//! Layout values live here so the renderer, the REST host and the CLI all read the same numbers.

/// Viewports narrower than this many logical pixels use the compact default header.
pub const NARROW_VIEWPORT_BREAKPOINT: u32 = 768;

/// Default upper bound on the number of remembered navigation entries.
pub const DEFAULT_MAX_HISTORY: usize = 32;

/// Header height of the default (patient overview) view, in pixels.
pub const DEFAULT_HEADER_HEIGHT: u32 = 120;

/// Header height shared by the summary and note views, in pixels.
pub const COMPACT_HEADER_HEIGHT: u32 = 90;

/// Header height of the full-view reader, in pixels.
pub const FULL_VIEW_HEADER_HEIGHT: u32 = 50;

/// Environment variable holding the history cap.
pub const MAX_HISTORY_ENV: &str = "PVIEW_MAX_HISTORY";

/// Environment variable holding the narrow viewport breakpoint.
pub const NARROW_BREAKPOINT_ENV: &str = "PVIEW_NARROW_BREAKPOINT";
