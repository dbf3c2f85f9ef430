//! Show/hide state of the export control, driven by page navigation.
//!
//! Navigation reaches the controller as [`NavigationEvent`]s from two
//! sources: a [`NavigationHub`] for history navigation (push, replace, back)
//! and a [`PathPoller`] that catches path changes made any other way. Each
//! event schedules a recompute after a settle delay; one more recompute runs
//! after an initial delay when the controller starts.

mod controller;
mod navigation;

pub use controller::VisibilityController;
pub use navigation::{Location, NavigationEvent, NavigationHub, PathPoller};

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn for_path(path: &str, root: &str) -> Self {
        if is_control_visible(path, root) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Visible => write!(f, "visible"),
            Visibility::Hidden => write!(f, "hidden"),
        }
    }
}

/// The control shows on `root` itself and on any path below it.
/// The match is anchored at the start of the path.
pub fn is_control_visible(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
