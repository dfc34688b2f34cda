//! # Typed Client Facade
//!
//! One method per hub query. Every method:
//!
//! 1. validates and converts its arguments, returning `InvalidInput` without
//!    touching the transport if one is bad,
//! 2. issues a single call bounded by the configured timeout,
//! 3. decodes the result with the Envelope Codec.
//!
//! Collection results decode all-or-nothing: the first element that fails
//! to decode fails the whole call. By-fid queries return every message type
//! the hub stores for that family; callers branch on `message_type()`.

use crate::domain::{ClientConfig, ConfigError, HubMethod, RequestId};
use crate::ports::HubTransport;
use crate::rpc::{
    AmpRequest, HubRequest, HubResponse, NameRegistryEventRequest, ReactionRequest,
    ReactionsByCastRequest, ReactionsByFidRequest, SignerRequest, UserDataRequest,
    VerificationRequest,
};
use crate::stream::EventStream;
use hub_bus::EventFilters;
use hub_types::hex_codec::{
    serialize_cast_id, serialize_ed25519_public_key, serialize_eth_address, serialize_fname,
    serialize_ts_hash,
};
use hub_types::wire::RawCastId;
use hub_types::{
    decode_id_registry_event, decode_message, decode_name_registry_event, encode_message, CastId,
    Fid, HubError, HubResult, IdRegistryEvent, Message, NameRegistryEvent, RawMessage,
    ReactionType, UserDataType,
};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Typed client over a hub transport.
pub struct HubClient<T: HubTransport> {
    transport: Arc<T>,
    config: ClientConfig,
}

impl<T: HubTransport> Clone for HubClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: self.config.clone(),
        }
    }
}

fn require_fid(fid: Fid, field: &str) -> HubResult<Fid> {
    if fid == 0 {
        return Err(HubError::invalid_input(format!("{field}: must be positive")));
    }
    Ok(fid)
}

fn reaction_filter(reaction_type: Option<ReactionType>) -> i32 {
    reaction_type.map_or(0, ReactionType::as_i32)
}

impl<T: HubTransport> HubClient<T> {
    /// Create a client after validating `config`.
    pub fn new(transport: T, config: ClientConfig) -> Result<Self, ConfigError> {
        Self::from_shared(Arc::new(transport), config)
    }

    /// Create a client over a transport that is shared with other owners.
    pub fn from_shared(transport: Arc<T>, config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            rpc_address = %config.rpc_address,
            timeout_ms = config.request_timeout.as_millis() as u64,
            "Hub client created"
        );
        Ok(Self { transport, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // =========================================================================
    // CALL PLUMBING
    // =========================================================================

    async fn call(&self, method: HubMethod, request: HubRequest) -> HubResult<HubResponse> {
        let request_id = RequestId::new();
        debug!(%request_id, %method, request = request.kind(), "Hub call");

        match timeout(self.config.request_timeout, self.transport.call(method, request)).await {
            Ok(Ok(response)) => {
                debug!(%request_id, %method, response = response.kind(), "Hub call completed");
                Ok(response)
            }
            Ok(Err(e)) => {
                debug!(%request_id, %method, error = %e, "Hub call failed");
                Err(e)
            }
            Err(_) => {
                warn!(
                    %request_id,
                    %method,
                    timeout_ms = self.config.request_timeout.as_millis() as u64,
                    "Hub call timed out"
                );
                Err(HubError::transport(format!(
                    "{method}: timed out after {}ms",
                    self.config.request_timeout.as_millis()
                )))
            }
        }
    }

    async fn message_call(&self, method: HubMethod, request: HubRequest) -> HubResult<Message> {
        let raw = self.call(method, request).await?.into_message(method)?;
        decode_message(&raw).inspect_err(|e| {
            warn!(%method, error = %e, "Failed to decode hub message");
        })
    }

    async fn messages_call(
        &self,
        method: HubMethod,
        request: HubRequest,
    ) -> HubResult<Vec<Message>> {
        let raw = self.call(method, request).await?.into_messages(method)?;
        decode_all(method, &raw)
    }

    async fn fid_messages(&self, method: HubMethod, fid: Fid) -> HubResult<Vec<Message>> {
        let fid = require_fid(fid, "fid")?;
        self.messages_call(method, HubRequest::fid(fid)).await
    }

    // =========================================================================
    // SUBMIT
    // =========================================================================

    /// Submit a message. Returns the message as merged by the hub.
    pub async fn submit_message(&self, message: &Message) -> HubResult<Message> {
        let raw = encode_message(message)?;
        self.message_call(HubMethod::SubmitMessage, HubRequest::Message(raw))
            .await
    }

    // =========================================================================
    // CASTS
    // =========================================================================

    pub async fn get_cast(&self, fid: Fid, ts_hash: &str) -> HubResult<Message> {
        let request = RawCastId {
            fid: require_fid(fid, "fid")?,
            ts_hash: serialize_ts_hash(ts_hash)?,
        };
        self.message_call(HubMethod::GetCast, HubRequest::CastId(request))
            .await
    }

    pub async fn get_casts_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetCastsByFid, fid).await
    }

    /// Replies to `parent`.
    pub async fn get_casts_by_parent(&self, parent: &CastId) -> HubResult<Vec<Message>> {
        let request = serialize_cast_id(parent)?;
        self.messages_call(HubMethod::GetCastsByParent, HubRequest::CastId(request))
            .await
    }

    pub async fn get_casts_by_mention(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetCastsByMention, fid).await
    }

    // =========================================================================
    // AMPS
    // =========================================================================

    pub async fn get_amp(&self, fid: Fid, target_fid: Fid) -> HubResult<Message> {
        let request = AmpRequest {
            fid: require_fid(fid, "fid")?,
            target_fid: require_fid(target_fid, "targetFid")?,
        };
        self.message_call(HubMethod::GetAmp, HubRequest::Amp(request))
            .await
    }

    pub async fn get_amps_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetAmpsByFid, fid).await
    }

    /// Amps whose target is `fid`.
    pub async fn get_amps_by_user(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetAmpsByUser, fid).await
    }

    // =========================================================================
    // REACTIONS
    // =========================================================================

    pub async fn get_reaction(
        &self,
        fid: Fid,
        reaction_type: ReactionType,
        cast_id: &CastId,
    ) -> HubResult<Message> {
        let request = ReactionRequest {
            fid: require_fid(fid, "fid")?,
            reaction_type: reaction_type.as_i32(),
            cast_id: serialize_cast_id(cast_id)?,
        };
        self.message_call(HubMethod::GetReaction, HubRequest::Reaction(request))
            .await
    }

    /// Reactions by `fid`, of any kind when `reaction_type` is `None`.
    pub async fn get_reactions_by_fid(
        &self,
        fid: Fid,
        reaction_type: Option<ReactionType>,
    ) -> HubResult<Vec<Message>> {
        let request = ReactionsByFidRequest {
            fid: require_fid(fid, "fid")?,
            reaction_type: reaction_filter(reaction_type),
        };
        self.messages_call(
            HubMethod::GetReactionsByFid,
            HubRequest::ReactionsByFid(request),
        )
        .await
    }

    /// Reactions targeting `cast_id`, of any kind when `reaction_type` is `None`.
    pub async fn get_reactions_by_cast(
        &self,
        cast_id: &CastId,
        reaction_type: Option<ReactionType>,
    ) -> HubResult<Vec<Message>> {
        let request = ReactionsByCastRequest {
            cast_id: serialize_cast_id(cast_id)?,
            reaction_type: reaction_filter(reaction_type),
        };
        self.messages_call(
            HubMethod::GetReactionsByCast,
            HubRequest::ReactionsByCast(request),
        )
        .await
    }

    // =========================================================================
    // VERIFICATIONS
    // =========================================================================

    pub async fn get_verification(&self, fid: Fid, address: &str) -> HubResult<Message> {
        let request = VerificationRequest {
            fid: require_fid(fid, "fid")?,
            address: serialize_eth_address(address)?,
        };
        self.message_call(HubMethod::GetVerification, HubRequest::Verification(request))
            .await
    }

    pub async fn get_verifications_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetVerificationsByFid, fid)
            .await
    }

    // =========================================================================
    // SIGNERS
    // =========================================================================

    pub async fn get_signer(&self, fid: Fid, signer: &str) -> HubResult<Message> {
        let request = SignerRequest {
            fid: require_fid(fid, "fid")?,
            signer: serialize_ed25519_public_key(signer)?,
        };
        self.message_call(HubMethod::GetSigner, HubRequest::Signer(request))
            .await
    }

    pub async fn get_signers_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetSignersByFid, fid).await
    }

    // =========================================================================
    // USER DATA
    // =========================================================================

    pub async fn get_user_data(&self, fid: Fid, user_data_type: UserDataType) -> HubResult<Message> {
        let request = UserDataRequest {
            fid: require_fid(fid, "fid")?,
            user_data_type: user_data_type.as_i32(),
        };
        self.message_call(HubMethod::GetUserData, HubRequest::UserData(request))
            .await
    }

    pub async fn get_user_data_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetUserDataByFid, fid).await
    }

    // =========================================================================
    // REGISTRY EVENTS
    // =========================================================================

    pub async fn get_id_registry_event(&self, fid: Fid) -> HubResult<IdRegistryEvent> {
        let method = HubMethod::GetIdRegistryEvent;
        let fid = require_fid(fid, "fid")?;
        let raw = self
            .call(method, HubRequest::fid(fid))
            .await?
            .into_id_registry_event(method)?;
        decode_id_registry_event(&raw).inspect_err(|e| {
            warn!(%method, error = %e, "Failed to decode id registry event");
        })
    }

    pub async fn get_name_registry_event(&self, fname: &str) -> HubResult<NameRegistryEvent> {
        let method = HubMethod::GetNameRegistryEvent;
        let request = NameRegistryEventRequest {
            fname: serialize_fname(fname)?,
        };
        let raw = self
            .call(method, HubRequest::NameRegistryEvent(request))
            .await?
            .into_name_registry_event(method)?;
        decode_name_registry_event(&raw).inspect_err(|e| {
            warn!(%method, error = %e, "Failed to decode name registry event");
        })
    }

    // =========================================================================
    // BULK BY FID (adds and removes)
    // =========================================================================

    pub async fn get_all_cast_messages_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetAllCastMessagesByFid, fid)
            .await
    }

    pub async fn get_all_amp_messages_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetAllAmpMessagesByFid, fid)
            .await
    }

    pub async fn get_all_reaction_messages_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetAllReactionMessagesByFid, fid)
            .await
    }

    pub async fn get_all_verification_messages_by_fid(
        &self,
        fid: Fid,
    ) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetAllVerificationMessagesByFid, fid)
            .await
    }

    pub async fn get_all_signer_messages_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetAllSignerMessagesByFid, fid)
            .await
    }

    pub async fn get_all_user_data_messages_by_fid(&self, fid: Fid) -> HubResult<Vec<Message>> {
        self.fid_messages(HubMethod::GetAllUserDataMessagesByFid, fid)
            .await
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Subscribe to hub events matching `filters`.
    ///
    /// Only events produced after the subscription is established are
    /// delivered.
    pub async fn subscribe(&self, filters: EventFilters) -> HubResult<EventStream> {
        let request = filters.to_request();
        let raw = match timeout(self.config.request_timeout, self.transport.subscribe(request))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(event_types = ?filters.event_types, "Subscribe timed out");
                return Err(HubError::transport("subscribe: timed out"));
            }
        };

        debug!(event_types = ?filters.event_types, "Subscription established");
        Ok(EventStream::new(raw, filters))
    }
}

/// Decode every element, failing on the first bad one.
fn decode_all(method: HubMethod, raw: &[RawMessage]) -> HubResult<Vec<Message>> {
    raw.iter()
        .enumerate()
        .map(|(index, message)| {
            decode_message(message).inspect_err(|e| {
                warn!(%method, index, error = %e, "Collection element failed to decode");
            })
        })
        .collect()
}
