//! Cross-crate flows: client facade, local hub and event bus together.

pub mod client_flows;
pub mod event_service;
