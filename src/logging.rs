//! Injected logging capability.
//!
//! Components never install or reach for a process-wide logger on their own.
//! Each one carries a `Logger`: either a handle to a specific
//! `tracing::Dispatch` supplied by the host, or nothing, in which case events
//! go to whatever default dispatcher the host process installed.

use std::fmt;

use tracing::Dispatch;

/// Handle to the dispatcher a component should emit its events to.
#[derive(Clone, Default)]
pub struct Logger {
    dispatch: Option<Dispatch>,
}

impl Logger {
    /// Log through the host's default dispatcher.
    pub fn ambient() -> Self {
        Self { dispatch: None }
    }

    /// Log through an explicit dispatcher, regardless of the process default.
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    /// Run `f` with this logger's dispatcher active on the current thread.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("injected", &self.dispatch.is_some())
            .finish()
    }
}

/// Neutralize user-supplied text before it reaches a log line.
///
/// Carriage returns, line feeds and tabs become `_` so a crafted value cannot
/// forge additional log records.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\r' | '\n' | '\t' => '_',
            other => other,
        })
        .collect()
}
