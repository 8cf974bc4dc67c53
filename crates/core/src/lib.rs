//! # PView Core
//!
//! View-state logic for the patient detail panel of the practice dashboard.
//!
//! This crate contains:
//! - the [`ViewState`] modes and their fixed ordering,
//! - the [`PatientViewSession`] state machine (transitions, single-step back, full-view toggle,
//!   reset),
//! - the derived [`Layout`] table and the narrow-viewport override,
//! - [`PatientPanel`], the consumer that owns one session per mounted detail view.
//!
//! **No transport concerns**: HTTP hosting lives in `api-rest`, command-line tooling in `cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod layout;
pub mod panel;
pub mod session;
pub mod state;

pub use config::{view_config_from_env_values, ViewConfig};
pub use constants::NARROW_VIEWPORT_BREAKPOINT;
pub use error::{ViewError, ViewResult};
pub use layout::{effective_layout, is_narrow_viewport, layout_for, Easing, Layout};
pub use panel::{ActivityRecord, ActivitySource, PanelEvent, PatientPanel, RenderModel};
pub use session::{NavigationEntry, PatientViewSession, SessionSnapshot};
pub use state::{Direction, ViewState};

pub use pview_types::{ActivityId, PatientId, TextError};
