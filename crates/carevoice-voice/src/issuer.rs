use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use crate::grants::ParticipantCapabilities;
use crate::host::{
    LiveKitConnector, SessionDescriptor, SessionHandle, SessionHost, SessionHostConnector,
};
use livekit_api::access_token::AccessToken;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Join tokens for one end user and one agent in the same room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub room_name: String,
    pub user_identity: String,
    pub user_token: String,
    pub agent_identity: String,
    pub agent_token: String,
}

#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: LiveKitConfig,
    connector: Arc<dyn SessionHostConnector>,
}

impl TokenIssuer {
    pub fn new(config: LiveKitConfig) -> Self {
        let connector = Arc::new(LiveKitConnector::new(config.clone()));
        Self { config, connector }
    }

    /// Uses `connector` instead of the LiveKit Room Service for provisioning.
    pub fn with_connector(config: LiveKitConfig, connector: Arc<dyn SessionHostConnector>) -> Self {
        Self { config, connector }
    }

    /// Mints a signed join token for one participant in `room_name`.
    pub fn issue(
        &self,
        identity: &str,
        name: &str,
        room_name: &str,
        capabilities: &ParticipantCapabilities,
    ) -> Result<String, VoiceError> {
        self.config.require_credentials()?;
        if identity.is_empty() {
            return Err(VoiceError::Config("participant identity is empty".to_string()));
        }
        if room_name.is_empty() {
            return Err(VoiceError::Config("room name is empty".to_string()));
        }

        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(identity)
            .with_name(name)
            .with_grants(capabilities.video_grants(room_name))
            .with_ttl(self.config.token_ttl());

        token.to_jwt().map_err(VoiceError::LiveKit)
    }

    /// Mints tokens for a fresh end-user identity and agent identity in
    /// `room_name`.
    ///
    /// Both tokens are signed concurrently; either failure fails the pair.
    pub async fn issue_pair(&self, room_name: &str) -> Result<TokenPair, VoiceError> {
        let suffix = identity_suffix();
        let user_identity = format!("enduser-{suffix}");
        let agent_identity = format!("agent-{suffix}");
        let capabilities = ParticipantCapabilities::default();

        let (user_token, agent_token) = tokio::try_join!(
            async { self.issue(&user_identity, &user_identity, room_name, &capabilities) },
            async { self.issue(&agent_identity, &agent_identity, room_name, &capabilities) },
        )?;

        info!(
            room = room_name,
            user = %user_identity,
            agent = %agent_identity,
            "generated LiveKit tokens"
        );

        Ok(TokenPair {
            room_name: room_name.to_string(),
            user_identity,
            user_token,
            agent_identity,
            agent_token,
        })
    }

    /// Creates a room on the session host.
    ///
    /// The host connection is closed on every exit path: success, failure,
    /// or the returned future being dropped mid-call.
    pub async fn provision_session(
        &self,
        descriptor: &SessionDescriptor,
    ) -> Result<SessionHandle, VoiceError> {
        let host = OpenHost(self.connector.connect()?);
        let result = host.0.create_session(descriptor).await;
        drop(host);

        match &result {
            Ok(handle) => info!(
                room = %handle.name,
                sid = %handle.sid,
                max_participants = handle.max_participants,
                "provisioned room"
            ),
            Err(e) => warn!(room = %descriptor.name, error = %e, "room provisioning failed"),
        }
        result
    }
}

/// Closes the wrapped connection when dropped.
struct OpenHost(Box<dyn SessionHost>);

impl Drop for OpenHost {
    fn drop(&mut self) {
        self.0.close();
    }
}

fn identity_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}
