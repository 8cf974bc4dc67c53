//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into panels. Request handling
//! never reads environment variables, so every panel mounted by a host sees the same values.

use crate::constants::{DEFAULT_MAX_HISTORY, NARROW_VIEWPORT_BREAKPOINT};
use crate::{ViewError, ViewResult};

/// View configuration resolved at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewConfig {
    max_history: usize,
    narrow_breakpoint: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            narrow_breakpoint: NARROW_VIEWPORT_BREAKPOINT,
        }
    }
}

impl ViewConfig {
    /// Create a new `ViewConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::InvalidConfig` if `max_history` or `narrow_breakpoint` is zero.
    pub fn new(max_history: usize, narrow_breakpoint: u32) -> ViewResult<Self> {
        if max_history == 0 {
            return Err(ViewError::InvalidConfig(
                "max_history must be at least 1".into(),
            ));
        }
        if narrow_breakpoint == 0 {
            return Err(ViewError::InvalidConfig(
                "narrow_breakpoint must be greater than 0".into(),
            ));
        }

        Ok(Self {
            max_history,
            narrow_breakpoint,
        })
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn narrow_breakpoint(&self) -> u32 {
        self.narrow_breakpoint
    }
}

/// Build a `ViewConfig` from optional raw environment values.
///
/// `None`, empty or whitespace-only values fall back to the defaults.
///
/// # Errors
///
/// Returns `ViewError::InvalidConfig` if a value is present but not a positive integer.
pub fn view_config_from_env_values(
    max_history: Option<String>,
    narrow_breakpoint: Option<String>,
) -> ViewResult<ViewConfig> {
    fn parse_value<T: std::str::FromStr>(
        name: &str,
        value: Option<String>,
    ) -> ViewResult<Option<T>> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|v| {
                v.parse::<T>().map_err(|_| {
                    ViewError::InvalidConfig(format!(
                        "{name} must be a positive integer, got '{v}'"
                    ))
                })
            })
            .transpose()
    }

    let defaults = ViewConfig::default();
    let max_history =
        parse_value::<usize>("max_history", max_history)?.unwrap_or(defaults.max_history);
    let narrow_breakpoint = parse_value::<u32>("narrow_breakpoint", narrow_breakpoint)?
        .unwrap_or(defaults.narrow_breakpoint);

    ViewConfig::new(max_history, narrow_breakpoint)
}
