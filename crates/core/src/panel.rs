//! Patient detail panel: the consumer that owns a view session.
//!
//! A `PatientPanel` is created for one mounted detail view. It is responsible for the conventions
//! the state machine deliberately leaves to its consumer:
//! - resetting the session when the surrounding page switches patient,
//! - resolving the selected activity against freshly loaded records, and resetting instead of
//!   rendering a panel whose activity has disappeared,
//! - combining the state layout with the viewport width at render time.

use crate::config::ViewConfig;
use crate::layout::{effective_layout, is_narrow_viewport_at, Layout};
use crate::session::{PatientViewSession, SessionSnapshot};
use crate::state::ViewState;
use crate::ViewResult;
use pview_types::{ActivityId, PatientId};
use serde::{Deserialize, Serialize};

/// Data-access collaborator answering whether an activity still exists for a patient.
pub trait ActivitySource {
    fn activity_exists(&self, patient: &PatientId, activity: &ActivityId) -> bool;
}

/// Plain activity record as returned by the data fetchers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub patient_id: PatientId,
    pub activity_id: ActivityId,
    #[serde(default)]
    pub title: String,
}

impl ActivitySource for [ActivityRecord] {
    fn activity_exists(&self, patient: &PatientId, activity: &ActivityId) -> bool {
        self.iter()
            .any(|r| &r.patient_id == patient && &r.activity_id == activity)
    }
}

impl ActivitySource for Vec<ActivityRecord> {
    fn activity_exists(&self, patient: &PatientId, activity: &ActivityId) -> bool {
        self.as_slice().activity_exists(patient, activity)
    }
}

/// UI events a renderer binds to its handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// The user picked a view: an activity row click, or a move back to the overview with no
    /// activity.
    Select {
        target: ViewState,
        activity: Option<ActivityId>,
    },
    Back,
    ToggleFullView,
    /// Escape key; leaves the full view.
    Escape,
    Reset,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub snapshot: SessionSnapshot,
    /// Layout after the narrow-viewport override.
    pub effective_layout: Layout,
    pub narrow: bool,
}

#[derive(Clone, Debug)]
pub struct PatientPanel {
    patient: PatientId,
    session: PatientViewSession,
    config: ViewConfig,
}

impl PatientPanel {
    pub fn new(patient: PatientId, config: ViewConfig) -> Self {
        Self {
            patient,
            session: PatientViewSession::with_config(&config),
            config,
        }
    }

    pub fn patient(&self) -> &PatientId {
        &self.patient
    }

    pub fn session(&self) -> &PatientViewSession {
        &self.session
    }

    /// Switches the panel to `patient`, resetting the session if the patient changed.
    ///
    /// Returns true if a reset happened.
    pub fn set_patient(&mut self, patient: PatientId) -> bool {
        if patient == self.patient {
            return false;
        }
        tracing::debug!(from = %self.patient, to = %patient, "patient changed; resetting view");
        self.patient = patient;
        self.session.reset();
        true
    }

    /// Forwards to [`PatientViewSession::transition_to`].
    pub fn transition_to(
        &mut self,
        target: ViewState,
        activity: Option<ActivityId>,
    ) -> ViewResult<bool> {
        self.session.transition_to(target, activity)
    }

    /// Click handler for an activity row.
    pub fn select_activity(
        &mut self,
        target: ViewState,
        activity: ActivityId,
    ) -> ViewResult<bool> {
        self.transition_to(target, Some(activity))
    }

    /// Applies a UI event to the session.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the visible position or the history changed.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the session; the session is unchanged in that case.
    pub fn dispatch(&mut self, event: PanelEvent) -> ViewResult<bool> {
        match event {
            PanelEvent::Select { target, activity } => self.transition_to(target, activity),
            PanelEvent::ToggleFullView => self.session.toggle_full_view(),
            PanelEvent::Escape => self.session.exit_full_view(),
            PanelEvent::Back => {
                let before = self.session.snapshot();
                self.session.go_back();
                Ok(before != self.session.snapshot())
            }
            PanelEvent::Reset => {
                let changed = self.session != PatientViewSession::with_config(&self.config);
                self.session.reset();
                Ok(changed)
            }
        }
    }

    /// Resets the view if its selected activity no longer resolves against `source`.
    ///
    /// Returns true if a reset happened.
    pub fn reconcile<S>(&mut self, source: &S) -> bool
    where
        S: ActivitySource + ?Sized,
    {
        let Some(activity) = self.session.selected_id() else {
            return false;
        };
        if source.activity_exists(&self.patient, activity) {
            return false;
        }

        tracing::warn!(
            patient = %self.patient,
            activity = %activity,
            state = %self.session.current_state(),
            "selected activity no longer present; resetting view"
        );
        self.session.reset();
        true
    }

    pub fn render_model(&self, viewport_width: u32) -> RenderModel {
        let narrow = is_narrow_viewport_at(viewport_width, self.config.narrow_breakpoint());
        let snapshot = self.session.snapshot();
        RenderModel {
            effective_layout: effective_layout(snapshot.state, narrow),
            snapshot,
            narrow,
        }
    }
}
