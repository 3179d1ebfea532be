//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the service.
//!
//! # Tasks
//! - Request dispatcher: spawns one orchestrator task per inbound request
//! - Event logger: logs the success or failure event of each request

mod dispatcher;

pub use dispatcher::{spawn_event_logger, spawn_request_dispatcher};
