use crate::state::ViewState;
use pview_types::TextError;

/// Errors raised by the patient view state machine and its consumers.
///
/// `MissingSelection` and `NoActiveSelection` are contract violations by the calling UI code: they
/// are reported immediately and leave the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("cannot enter {target} view without a selected activity")]
    MissingSelection { target: ViewState },
    #[error("full view toggle requires an active selection")]
    NoActiveSelection,
    #[error("invalid view state: {0}")]
    InvalidState(String),
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] TextError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ViewError {
    /// Returns true for errors caused by calling an operation outside its contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            ViewError::MissingSelection { .. } | ViewError::NoActiveSelection
        )
    }
}

pub type ViewResult<T> = std::result::Result<T, ViewError>;
