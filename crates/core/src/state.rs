//! The four visual modes of the patient detail panel and their linear ordering.
//!
//! Renderers animate a header "forwards" when moving deeper into an activity and "backwards" when
//! returning towards the overview. Rather than comparing positions in ad-hoc string arrays, the
//! ordering is fixed here:
//!
//! | ordinal | state      |
//! |---------|------------|
//! | 0       | `default`  |
//! | 1       | `summary`  |
//! | 2       | `note`     |
//! | 3       | `fullView` |

use crate::ViewError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Visual mode of the patient detail panel. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewState {
    /// Patient overview; the only state with no selected activity.
    #[default]
    Default,
    /// Condensed summary of the selected activity.
    Summary,
    /// The selected clinical note.
    Note,
    /// The selected note expanded to fill the panel.
    FullView,
}

impl ViewState {
    /// All states in ordinal order.
    pub const ORDER: [ViewState; 4] = [
        ViewState::Default,
        ViewState::Summary,
        ViewState::Note,
        ViewState::FullView,
    ];

    /// Position of this state in [`ViewState::ORDER`].
    pub const fn ordinal(self) -> u8 {
        match self {
            ViewState::Default => 0,
            ViewState::Summary => 1,
            ViewState::Note => 2,
            ViewState::FullView => 3,
        }
    }

    /// Stable name, identical to the serialised form.
    pub const fn as_str(self) -> &'static str {
        match self {
            ViewState::Default => "default",
            ViewState::Summary => "summary",
            ViewState::Note => "note",
            ViewState::FullView => "fullView",
        }
    }

    /// Returns true for every state that displays a selected activity.
    pub const fn requires_selection(self) -> bool {
        !matches!(self, ViewState::Default)
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewState {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(ViewState::Default),
            "summary" => Ok(ViewState::Summary),
            "note" => Ok(ViewState::Note),
            "fullview" | "full-view" | "full_view" => Ok(ViewState::FullView),
            _ => Err(ViewError::InvalidState(s.to_string())),
        }
    }
}

/// Direction of travel between two view states, derived from their ordinals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    Stay,
}

impl Direction {
    pub fn between(from: ViewState, to: ViewState) -> Self {
        match to.ordinal().cmp(&from.ordinal()) {
            std::cmp::Ordering::Greater => Direction::Forward,
            std::cmp::Ordering::Less => Direction::Backward,
            std::cmp::Ordering::Equal => Direction::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_ordinals() {
        for (idx, state) in ViewState::ORDER.iter().enumerate() {
            assert_eq!(state.ordinal() as usize, idx);
        }
    }

    #[test]
    fn test_serialised_names() {
        let json = serde_json::to_string(&ViewState::ORDER).unwrap();
        assert_eq!(json, r#"["default","summary","note","fullView"]"#);

        let parsed: ViewState = serde_json::from_str("\"fullView\"").unwrap();
        assert_eq!(parsed, ViewState::FullView);
    }

    #[test]
    fn test_parse_accepts_aliases() {
        assert_eq!("full-view".parse::<ViewState>().unwrap(), ViewState::FullView);
        assert_eq!("full_view".parse::<ViewState>().unwrap(), ViewState::FullView);
        assert_eq!(" Summary ".parse::<ViewState>().unwrap(), ViewState::Summary);
    }

    #[test]
    fn test_parse_rejects_unknown_state() {
        let err = "timeline".parse::<ViewState>().unwrap_err();
        assert_eq!(err, ViewError::InvalidState("timeline".into()));
    }

    #[test]
    fn test_direction_between_states() {
        assert_eq!(
            Direction::between(ViewState::Default, ViewState::Note),
            Direction::Forward
        );
        assert_eq!(
            Direction::between(ViewState::FullView, ViewState::Summary),
            Direction::Backward
        );
        assert_eq!(
            Direction::between(ViewState::Note, ViewState::Note),
            Direction::Stay
        );
    }

    #[test]
    fn test_only_default_has_no_selection() {
        assert!(!ViewState::Default.requires_selection());
        assert!(ViewState::ORDER[1..].iter().all(|s| s.requires_selection()));
    }
}
