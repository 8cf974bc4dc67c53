//! Patient view session: the state machine behind the patient detail panel.
//!
//! A session tracks:
//! - the active [`ViewState`],
//! - the activity the non-default states display,
//! - a short history of previous `(state, selection)` pairs for single-step back navigation.
//!
//! Invariants upheld by every operation:
//! - the selection is `None` if and only if the state is [`ViewState::Default`],
//! - no history entry pairs `default` with a selection,
//! - history length never exceeds the configured cap (the oldest entry is dropped).
//!
//! A session belongs to exactly one mounted detail view. It is created empty when a patient is
//! selected and thrown away when the patient changes or the view unmounts.

use crate::config::ViewConfig;
use crate::layout::{layout_for, Layout};
use crate::state::{Direction, ViewState};
use crate::{ViewError, ViewResult};
use pview_types::ActivityId;
use serde::Serialize;
use std::collections::VecDeque;

/// One previously visited position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    pub state: ViewState,
    pub selected_id: Option<ActivityId>,
}

impl NavigationEntry {
    /// The entry every session starts from.
    pub const fn root() -> Self {
        Self {
            state: ViewState::Default,
            selected_id: None,
        }
    }
}

/// Read model of a session, captured in one call so a render cycle never mixes two points in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: ViewState,
    pub selected_id: Option<ActivityId>,
    pub history: Vec<NavigationEntry>,
    pub history_depth: usize,
    pub can_go_back: bool,
    pub layout: Layout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientViewSession {
    current_state: ViewState,
    selected_id: Option<ActivityId>,
    history: VecDeque<NavigationEntry>,
    max_history: usize,
}

impl Default for PatientViewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientViewSession {
    /// Creates an empty session (`default`, no selection, no history) with the default history cap.
    pub fn new() -> Self {
        Self::with_config(&ViewConfig::default())
    }

    pub fn with_config(config: &ViewConfig) -> Self {
        Self {
            current_state: ViewState::Default,
            selected_id: None,
            history: VecDeque::new(),
            max_history: config.max_history(),
        }
    }

    pub fn current_state(&self) -> ViewState {
        self.current_state
    }

    pub fn selected_id(&self) -> Option<&ActivityId> {
        self.selected_id.as_ref()
    }

    /// Previous positions, oldest first.
    pub fn history(&self) -> &VecDeque<NavigationEntry> {
        &self.history
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Layout derived from the current state.
    pub fn layout(&self) -> Layout {
        layout_for(self.current_state)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.current_state,
            selected_id: self.selected_id.clone(),
            history: self.history.iter().cloned().collect(),
            history_depth: self.history.len(),
            can_go_back: self.can_go_back(),
            layout: self.layout(),
        }
    }

    /// Moves the panel to `target`, remembering the current position.
    ///
    /// Any selection passed with `ViewState::Default` is discarded. Repeating a transition to the
    /// current position is a no-op and does not grow the history.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the session moved, `Ok(false)` for a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::MissingSelection` if `target` is not `default` and `selected` is `None`.
    /// The session is left unchanged.
    pub fn transition_to(
        &mut self,
        target: ViewState,
        selected: Option<ActivityId>,
    ) -> ViewResult<bool> {
        let selected = if target.requires_selection() {
            match selected {
                Some(id) => Some(id),
                None => {
                    tracing::warn!(%target, "rejected transition without a selected activity");
                    return Err(ViewError::MissingSelection { target });
                }
            }
        } else {
            None
        };

        if target == self.current_state && selected == self.selected_id {
            return Ok(false);
        }

        self.push_current();
        tracing::debug!(
            from = %self.current_state,
            to = %target,
            selected = selected.as_ref().map(ActivityId::as_str),
            "view transition"
        );
        self.current_state = target;
        self.selected_id = selected;
        Ok(true)
    }

    /// Returns to the most recent history entry.
    ///
    /// With an empty history this behaves exactly like [`PatientViewSession::reset`].
    pub fn go_back(&mut self) -> Direction {
        let from = self.current_state;
        match self.history.pop_back() {
            Some(entry) => {
                self.current_state = entry.state;
                self.selected_id = entry.selected_id;
            }
            None => self.reset(),
        }
        Direction::between(from, self.current_state)
    }

    /// Switches between the note and full views of the current selection.
    ///
    /// Leaving the full view for the note it was entered from pops that note off the history, so
    /// the round trip restores the session exactly as it was before entering the full view.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NoActiveSelection` when called from the default view.
    pub fn toggle_full_view(&mut self) -> ViewResult<bool> {
        let Some(id) = self.selected_id.clone() else {
            tracing::warn!("rejected full view toggle without a selected activity");
            return Err(ViewError::NoActiveSelection);
        };

        if self.current_state != ViewState::FullView {
            return self.transition_to(ViewState::FullView, Some(id));
        }

        let note_on_top = self
            .history
            .back()
            .is_some_and(|e| e.state == ViewState::Note && e.selected_id.as_ref() == Some(&id));
        if note_on_top {
            tracing::debug!(selected = id.as_str(), "leaving full view for the note below it");
            self.history.pop_back();
            self.current_state = ViewState::Note;
            return Ok(true);
        }

        self.transition_to(ViewState::Note, Some(id))
    }

    /// Escape-key affordance: leaves the full view, does nothing elsewhere.
    pub fn exit_full_view(&mut self) -> ViewResult<bool> {
        if self.current_state == ViewState::FullView {
            self.toggle_full_view()
        } else {
            Ok(false)
        }
    }

    /// Returns the session to `default` with no selection and no history.
    pub fn reset(&mut self) {
        self.current_state = ViewState::Default;
        self.selected_id = None;
        self.history.clear();
    }

    fn push_current(&mut self) {
        if self.history.len() >= self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(NavigationEntry {
            state: self.current_state,
            selected_id: self.selected_id.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ActivityId {
        ActivityId::new(s).unwrap()
    }

    fn entry(state: ViewState, selected: Option<&str>) -> NavigationEntry {
        NavigationEntry {
            state,
            selected_id: selected.map(id),
        }
    }

    fn assert_invariants(session: &PatientViewSession) {
        assert_eq!(
            session.selected_id().is_none(),
            session.current_state() == ViewState::Default,
            "selection must be empty exactly in the default view: {session:?}"
        );
        for e in session.history() {
            assert_eq!(e.selected_id.is_none(), e.state == ViewState::Default);
        }
        if let Some(top) = session.history().back() {
            let repeats_current = top.state == session.current_state()
                && top.selected_id.as_ref() == session.selected_id();
            assert!(!repeats_current, "history top repeats the current position: {session:?}");
        }
    }

    /// Scenario 2: `{note, visit-42, [{default}, {summary, visit-42}]}`.
    fn at_note() -> PatientViewSession {
        let mut session = PatientViewSession::new();
        session
            .transition_to(ViewState::Summary, Some(id("visit-42")))
            .unwrap();
        session
            .transition_to(ViewState::Note, Some(id("visit-42")))
            .unwrap();
        session
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = PatientViewSession::new();
        assert_eq!(session.current_state(), ViewState::Default);
        assert!(session.selected_id().is_none());
        assert!(session.history().is_empty());
        assert!(!session.can_go_back());
    }

    #[test]
    fn test_transition_to_summary_pushes_root() {
        let mut session = PatientViewSession::new();
        let moved = session
            .transition_to(ViewState::Summary, Some(id("visit-42")))
            .unwrap();

        assert!(moved);
        assert_eq!(session.current_state(), ViewState::Summary);
        assert_eq!(session.selected_id(), Some(&id("visit-42")));
        assert_eq!(session.history(), &[NavigationEntry::root()]);
    }

    #[test]
    fn test_transition_to_note_extends_history() {
        let session = at_note();
        assert_eq!(session.current_state(), ViewState::Note);
        assert_eq!(
            session.history(),
            &[
                NavigationEntry::root(),
                entry(ViewState::Summary, Some("visit-42"))
            ]
        );
    }

    #[test]
    fn test_go_back_restores_previous_entry() {
        let mut session = at_note();
        let direction = session.go_back();

        assert_eq!(direction, Direction::Backward);
        assert_eq!(session.current_state(), ViewState::Summary);
        assert_eq!(session.selected_id(), Some(&id("visit-42")));
        assert_eq!(session.history(), &[NavigationEntry::root()]);
    }

    #[test]
    fn test_transition_then_back_is_symmetric() {
        let mut session = PatientViewSession::new();
        session
            .transition_to(ViewState::Summary, Some(id("A")))
            .unwrap();
        session.go_back();
        assert_eq!(session, PatientViewSession::new());
    }

    #[test]
    fn test_go_back_with_empty_history_resets() {
        let mut session = PatientViewSession::new();
        assert_eq!(session.go_back(), Direction::Stay);
        assert_eq!(session, PatientViewSession::new());
    }

    #[test]
    fn test_repeated_transition_is_noop() {
        let mut session = PatientViewSession::new();
        session
            .transition_to(ViewState::Summary, Some(id("visit-1")))
            .unwrap();
        let depth = session.history_depth();

        let moved = session
            .transition_to(ViewState::Summary, Some(id("visit-1")))
            .unwrap();
        assert!(!moved);
        assert_eq!(session.history_depth(), depth);

        // Same state, different selection is a real move.
        assert!(session
            .transition_to(ViewState::Summary, Some(id("visit-2")))
            .unwrap());
        assert_eq!(session.history_depth(), depth + 1);
    }

    #[test]
    fn test_transition_without_selection_fails() {
        let mut session = PatientViewSession::new();
        let err = session.transition_to(ViewState::Summary, None).unwrap_err();

        assert_eq!(
            err,
            ViewError::MissingSelection {
                target: ViewState::Summary
            }
        );
        assert!(err.is_contract_violation());
        assert_eq!(session, PatientViewSession::new());
    }

    #[test]
    fn test_transition_to_default_drops_selection() {
        let mut session = at_note();
        session
            .transition_to(ViewState::Default, Some(id("ignored")))
            .unwrap();

        assert_eq!(session.current_state(), ViewState::Default);
        assert!(session.selected_id().is_none());
        assert_eq!(session.history_depth(), 3);
        assert_invariants(&session);
    }

    #[test]
    fn test_toggle_full_view_from_note_pushes_note() {
        let mut session = at_note();
        session.toggle_full_view().unwrap();

        assert_eq!(session.current_state(), ViewState::FullView);
        assert_eq!(session.selected_id(), Some(&id("visit-42")));
        assert_eq!(
            session.history().back(),
            Some(&entry(ViewState::Note, Some("visit-42")))
        );
        assert_eq!(session.history_depth(), 3);
    }

    #[test]
    fn test_toggle_full_view_round_trip_restores_session() {
        let before = at_note();
        let mut session = before.clone();
        session.toggle_full_view().unwrap();
        assert!(session.toggle_full_view().unwrap());

        assert_eq!(session, before);
        assert_ne!(
            session.history().back(),
            Some(&entry(ViewState::Note, Some("visit-42")))
        );
    }

    #[test]
    fn test_go_back_after_full_view_round_trip_leaves_note() {
        let mut session = at_note();
        session.toggle_full_view().unwrap();
        session.toggle_full_view().unwrap();

        assert_eq!(session.go_back(), Direction::Backward);
        assert_eq!(session.current_state(), ViewState::Summary);
        assert_eq!(session.selected_id(), Some(&id("visit-42")));
        assert_eq!(session.history(), &[NavigationEntry::root()]);
    }

    #[test]
    fn test_toggle_full_view_back_pushes_when_note_not_on_top() {
        let mut session = PatientViewSession::new();
        session
            .transition_to(ViewState::FullView, Some(id("visit-9")))
            .unwrap();
        session.toggle_full_view().unwrap();

        assert_eq!(session.current_state(), ViewState::Note);
        assert_eq!(
            session.history(),
            &[
                NavigationEntry::root(),
                entry(ViewState::FullView, Some("visit-9"))
            ]
        );
    }

    #[test]
    fn test_toggle_full_view_requires_selection() {
        let mut session = PatientViewSession::new();
        assert_eq!(
            session.toggle_full_view(),
            Err(ViewError::NoActiveSelection)
        );
    }

    #[test]
    fn test_exit_full_view_only_acts_in_full_view() {
        let mut session = at_note();
        assert!(!session.exit_full_view().unwrap());
        assert_eq!(session.current_state(), ViewState::Note);

        session.toggle_full_view().unwrap();
        assert!(session.exit_full_view().unwrap());
        assert_eq!(session.current_state(), ViewState::Note);

        let mut empty = PatientViewSession::new();
        assert!(!empty.exit_full_view().unwrap());
    }

    #[test]
    fn test_reset_dominates_every_state() {
        let mut session = at_note();
        session.toggle_full_view().unwrap();
        session.reset();
        assert_eq!(session, PatientViewSession::new());

        let mut session = at_note();
        session.reset();
        assert_eq!(session.snapshot(), PatientViewSession::new().snapshot());
    }

    #[test]
    fn test_history_cap_drops_oldest_entry() {
        let cfg = ViewConfig::new(2, 768).unwrap();
        let mut session = PatientViewSession::with_config(&cfg);
        for visit in ["a", "b", "c"] {
            session
                .transition_to(ViewState::Summary, Some(id(visit)))
                .unwrap();
        }

        assert_eq!(
            session.history(),
            &[
                entry(ViewState::Summary, Some("a")),
                entry(ViewState::Summary, Some("b"))
            ]
        );
    }

    #[test]
    fn test_snapshot_is_consistent() {
        let session = at_note();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.state, ViewState::Note);
        assert_eq!(snapshot.selected_id, Some(id("visit-42")));
        assert_eq!(snapshot.history_depth, 2);
        assert!(snapshot.can_go_back);
        assert_eq!(snapshot.layout, layout_for(ViewState::Note));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "note");
        assert_eq!(json["selectedId"], "visit-42");
        assert_eq!(json["history"][1]["state"], "summary");
        assert_eq!(json["layout"]["headerHeight"], 90);
    }

    #[derive(Clone, Copy, Debug)]
    enum Op {
        Summary(&'static str),
        Note(&'static str),
        FullView(&'static str),
        Default,
        Back,
        Toggle,
        Reset,
    }

    fn apply(session: &mut PatientViewSession, op: Op) {
        let _ = match op {
            Op::Summary(v) => session.transition_to(ViewState::Summary, Some(id(v))),
            Op::Note(v) => session.transition_to(ViewState::Note, Some(id(v))),
            Op::FullView(v) => session.transition_to(ViewState::FullView, Some(id(v))),
            Op::Default => session.transition_to(ViewState::Default, None),
            Op::Back => {
                session.go_back();
                Ok(true)
            }
            Op::Toggle => session.toggle_full_view(),
            Op::Reset => {
                session.reset();
                Ok(true)
            }
        };
    }

    #[test]
    fn test_invariants_hold_for_all_short_sequences() {
        const OPS: [Op; 8] = [
            Op::Summary("x"),
            Op::Note("x"),
            Op::Note("y"),
            Op::FullView("y"),
            Op::Default,
            Op::Back,
            Op::Toggle,
            Op::Reset,
        ];

        fn walk(session: &PatientViewSession, depth: usize) {
            assert_invariants(session);
            if depth == 0 {
                return;
            }
            for op in OPS {
                let mut next = session.clone();
                apply(&mut next, op);
                walk(&next, depth - 1);
            }
        }

        walk(&PatientViewSession::new(), 4);
    }
}
