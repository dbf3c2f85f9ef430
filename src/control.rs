//! The export trigger: one control, one writer.
//!
//! An export moves the control `Ready -> Fetching`, and the [`FetchGuard`]
//! returned by [`ExportControl::begin`] puts it back to `Ready` when dropped,
//! so every exit path (including `?` early returns) re-enables it. A fatal
//! error passes through `Failed` on the way.

use std::fmt;

pub const READY_LABEL: &str = "Export Shopping Lists";
pub const FETCHING_LABEL: &str = "Fetching...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Ready,
    Fetching,
    Failed,
}

impl ControlState {
    pub fn label(&self) -> &'static str {
        match self {
            ControlState::Ready | ControlState::Failed => READY_LABEL,
            ControlState::Fetching => FETCHING_LABEL,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, ControlState::Fetching)
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlState::Ready => write!(f, "ready"),
            ControlState::Fetching => write!(f, "fetching"),
            ControlState::Failed => write!(f, "failed"),
        }
    }
}

/// The export trigger's enabled/label state
#[derive(Debug)]
pub struct ExportControl {
    state: ControlState,
    history: Vec<ControlState>,
}

impl Default for ExportControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportControl {
    pub fn new() -> Self {
        Self {
            state: ControlState::Ready,
            history: vec![ControlState::Ready],
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn label(&self) -> &'static str {
        self.state.label()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Every state the control has been in, oldest first
    pub fn history(&self) -> &[ControlState] {
        &self.history
    }

    /// Disable the control for an export. The guard borrows the control
    /// mutably, so a second export cannot start until it is dropped.
    pub fn begin(&mut self) -> FetchGuard<'_> {
        self.transition(ControlState::Fetching);
        FetchGuard { control: self }
    }

    fn transition(&mut self, next: ControlState) {
        tracing::debug!("Export control: {} -> {} ({})", self.state, next, next.label());
        self.state = next;
        self.history.push(next);
    }
}

/// Held for the duration of one export
#[derive(Debug)]
pub struct FetchGuard<'a> {
    control: &'a mut ExportControl,
}

impl FetchGuard<'_> {
    /// Record a fatal failure; the control still returns to `Ready` on drop
    pub fn fail(&mut self) {
        if self.control.state == ControlState::Fetching {
            self.control.transition(ControlState::Failed);
        }
    }

    pub fn state(&self) -> ControlState {
        self.control.state
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.control.transition(ControlState::Ready);
    }
}
