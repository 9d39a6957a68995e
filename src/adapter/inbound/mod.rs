//! Inbound adapters (driving side).

pub mod event;

pub use event::{decode_event, event_job_id, parse_event};
