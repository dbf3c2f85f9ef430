use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The current page path, shared between navigation sources and the controller
#[derive(Debug, Clone, Default)]
pub struct Location {
    path: Arc<RwLock<String>>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Arc::new(RwLock::new(path.into())),
        }
    }

    pub fn path(&self) -> String {
        match self.path.read() {
            Ok(path) => path.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Change the path without announcing it
    pub fn set(&self, path: impl Into<String>) {
        let path = path.into();
        match self.path.write() {
            Ok(mut current) => *current = path,
            Err(poisoned) => *poisoned.into_inner() = path,
        }
    }
}

/// A signal that the page path may have changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    InitialLoad,
    PushState(String),
    ReplaceState(String),
    PopState(String),
    /// Raised by the fallback poller
    DomMutation,
}

/// History navigation source: every navigation updates the location and
/// emits one event.
#[derive(Debug, Clone)]
pub struct NavigationHub {
    location: Location,
    events: mpsc::UnboundedSender<NavigationEvent>,
}

impl NavigationHub {
    pub fn new(
        initial_path: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<NavigationEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let hub = Self {
            location: Location::new(initial_path),
            events,
        };
        (hub, rx)
    }

    pub fn location(&self) -> Location {
        self.location.clone()
    }

    /// Sender for additional sources such as [`PathPoller`]
    pub fn sender(&self) -> mpsc::UnboundedSender<NavigationEvent> {
        self.events.clone()
    }

    pub fn push_state(&self, path: &str) {
        self.navigate(path, NavigationEvent::PushState(path.to_string()));
    }

    pub fn replace_state(&self, path: &str) {
        self.navigate(path, NavigationEvent::ReplaceState(path.to_string()));
    }

    pub fn pop_state(&self, path: &str) {
        self.navigate(path, NavigationEvent::PopState(path.to_string()));
    }

    fn navigate(&self, path: &str, event: NavigationEvent) {
        self.location.set(path);
        tracing::debug!("Navigation: {:?}", event);
        if self.events.send(event).is_err() {
            tracing::debug!("Navigation event dropped, controller stopped");
        }
    }
}

/// Fallback source: polls the location and reports changes the hub never saw.
///
/// The poller holds only a weak sender, so it never keeps the event channel
/// open on its own: once the hub and every other strong sender are gone it
/// stops, and the controller sees the end of its event stream.
pub struct PathPoller {
    location: Location,
    interval: Duration,
    events: mpsc::WeakUnboundedSender<NavigationEvent>,
}

impl PathPoller {
    pub fn new(
        location: Location,
        interval: Duration,
        events: &mpsc::UnboundedSender<NavigationEvent>,
    ) -> Self {
        Self {
            location,
            interval,
            events: events.downgrade(),
        }
    }

    /// Poll until every strong sender is dropped or the receiver hangs up
    pub fn spawn(self) -> JoinHandle<()> {
        let mut last = self.location.path();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(events) = self.events.upgrade() else {
                    tracing::debug!("Navigation sources closed, path poller stopping");
                    break;
                };
                if events.is_closed() {
                    break;
                }

                let current = self.location.path();
                if current != last {
                    tracing::debug!("Path changed outside history: {} -> {}", last, current);
                    last = current;
                    if events.send(NavigationEvent::DomMutation).is_err() {
                        break;
                    }
                }
            }
        })
    }
}
