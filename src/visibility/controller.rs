use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use super::navigation::{Location, NavigationEvent};
use super::Visibility;
use crate::config::VisibilityConfig;

struct Recompute {
    location: Location,
    root_path: String,
    state: watch::Sender<Visibility>,
}

impl Recompute {
    fn apply(&self) {
        let path = self.location.path();
        let next = Visibility::for_path(&path, &self.root_path);

        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if changed {
            tracing::info!("Export control {} on {}", next, path);
        }
    }
}

/// Keeps the export control's visibility in step with the page path
pub struct VisibilityController {
    recompute: Arc<Recompute>,
    initial_delay: Duration,
    settle_delay: Duration,
}

impl VisibilityController {
    /// The control starts hidden; the receiver sees every change
    pub fn new(
        location: Location,
        config: &VisibilityConfig,
    ) -> (Self, watch::Receiver<Visibility>) {
        let (state, rx) = watch::channel(Visibility::Hidden);
        let controller = Self {
            recompute: Arc::new(Recompute {
                location,
                root_path: config.root_path.clone(),
                state,
            }),
            initial_delay: config.initial_delay(),
            settle_delay: config.settle_delay(),
        };
        (controller, rx)
    }

    /// Process navigation events until every source has hung up, then wait
    /// for the recomputes still pending.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<NavigationEvent>) {
        let mut pending = JoinSet::new();
        self.schedule(&mut pending, self.initial_delay, NavigationEvent::InitialLoad);

        while let Some(event) = events.recv().await {
            self.schedule(&mut pending, self.settle_delay, event);

            // Reap finished recomputes so the set stays small on long sessions
            while pending.try_join_next().is_some() {}
        }

        while pending.join_next().await.is_some() {}
    }

    fn schedule(&self, pending: &mut JoinSet<()>, delay: Duration, event: NavigationEvent) {
        tracing::debug!("Recomputing visibility in {:?} after {:?}", delay, event);
        let recompute = Arc::clone(&self.recompute);
        pending.spawn(async move {
            tokio::time::sleep(delay).await;
            recompute.apply();
        });
    }
}
