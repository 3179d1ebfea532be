//! Request Dispatcher Task
//!
//! Background task that turns inbound request events into one orchestrator
//! task each and forwards their terminal events.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::ApiRequest;
use crate::orchestrator::{Orchestrator, RequestEvent};

/// Spawns the dispatcher loop.
///
/// Every request received on `requests` gets its own task; there is no
/// queueing or admission control. Each task sends its success or failure
/// event on `events`. The loop ends once `requests` is closed, leaving
/// already-spawned request tasks to finish on their own.
///
/// # Example
/// ```ignore
/// let (request_tx, request_rx) = mpsc::unbounded_channel();
/// let (event_tx, mut event_rx) = mpsc::unbounded_channel();
/// let handle = spawn_request_dispatcher(orchestrator, request_rx, event_tx);
/// request_tx.send(ApiRequest::new("getUsers", json!({"page": 1})))?;
/// let event = event_rx.recv().await;
/// ```
pub fn spawn_request_dispatcher(
    orchestrator: Arc<Orchestrator>,
    mut requests: mpsc::UnboundedReceiver<ApiRequest>,
    events: mpsc::UnboundedSender<RequestEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting request dispatcher");

        while let Some(request) = requests.recv().await {
            debug!("Dispatching request {}", request.name);
            let orchestrator = orchestrator.clone();
            let events = events.clone();

            tokio::spawn(async move {
                let event = orchestrator.handle(request).await;
                if events.send(event).is_err() {
                    warn!("Event receiver dropped, discarding request outcome");
                }
            });
        }

        info!("Request channel closed, dispatcher stopping");
    })
}

/// Spawns a consumer that logs every request outcome. Ends once all event
/// senders are dropped.
pub fn spawn_event_logger(mut events: mpsc::UnboundedReceiver<RequestEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                RequestEvent::Success {
                    name, from_cache, ..
                } => info!("Request {} succeeded (cached: {})", name, from_cache),
                RequestEvent::Failure { name, error } => warn!("Request {} failed: {}", name, error),
            }
        }
        debug!("Event channel closed, event logger stopping");
    })
}
