//! Response shapes.

use crate::domain::HubMethod;
use hub_types::{HubError, HubResult, RawIdRegistryEvent, RawMessage, RawNameRegistryEvent};
use serde::{Deserialize, Serialize};

/// Any unary response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HubResponse {
    Message(RawMessage),
    Messages(Vec<RawMessage>),
    IdRegistryEvent(RawIdRegistryEvent),
    NameRegistryEvent(RawNameRegistryEvent),
}

impl HubResponse {
    /// Shape name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "Message",
            Self::Messages(_) => "Messages",
            Self::IdRegistryEvent(_) => "IdRegistryEvent",
            Self::NameRegistryEvent(_) => "NameRegistryEvent",
        }
    }

    fn unexpected(&self, method: HubMethod) -> HubError {
        HubError::transport(format!("{method}: unexpected {} response", self.kind()))
    }

    pub fn into_message(self, method: HubMethod) -> HubResult<RawMessage> {
        match self {
            Self::Message(message) => Ok(message),
            other => Err(other.unexpected(method)),
        }
    }

    pub fn into_messages(self, method: HubMethod) -> HubResult<Vec<RawMessage>> {
        match self {
            Self::Messages(messages) => Ok(messages),
            other => Err(other.unexpected(method)),
        }
    }

    pub fn into_id_registry_event(self, method: HubMethod) -> HubResult<RawIdRegistryEvent> {
        match self {
            Self::IdRegistryEvent(event) => Ok(event),
            other => Err(other.unexpected(method)),
        }
    }

    pub fn into_name_registry_event(self, method: HubMethod) -> HubResult<RawNameRegistryEvent> {
        match self {
            Self::NameRegistryEvent(event) => Ok(event),
            other => Err(other.unexpected(method)),
        }
    }
}
