//! Session host (LiveKit Room Service) connections.
//!
//! A connection is opened right before a provisioning call and closed right
//! after it, on success, failure and cancellation alike. The traits exist so that the
//! issuer can be driven against a fake host in tests.

use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use async_trait::async_trait;
use livekit_api::services::room::{CreateRoomOptions, RoomClient};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

fn default_max_participants() -> u32 {
    20
}

fn default_empty_timeout_secs() -> u32 {
    10 * 60
}

/// Room to create on the session host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub name: String,
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,
    /// Seconds an empty room is kept before the host reclaims it.
    #[serde(default = "default_empty_timeout_secs")]
    pub empty_timeout_secs: u32,
}

impl SessionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_participants: default_max_participants(),
            empty_timeout_secs: default_empty_timeout_secs(),
        }
    }

    pub fn with_max_participants(mut self, max: u32) -> Self {
        self.max_participants = max;
        self
    }

    pub fn with_empty_timeout_secs(mut self, secs: u32) -> Self {
        self.empty_timeout_secs = secs;
        self
    }
}

/// Room as reported back by the session host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandle {
    pub sid: String,
    pub name: String,
    pub max_participants: u32,
    pub empty_timeout_secs: u32,
}

impl From<livekit_protocol::Room> for SessionHandle {
    fn from(room: livekit_protocol::Room) -> Self {
        Self {
            sid: room.sid,
            name: room.name,
            max_participants: room.max_participants,
            empty_timeout_secs: room.empty_timeout,
        }
    }
}

/// An open connection to the session host.
#[async_trait]
pub trait SessionHost: Send + Sync {
    async fn create_session(
        &self,
        descriptor: &SessionDescriptor,
    ) -> Result<SessionHandle, VoiceError>;

    /// Releases the connection. Must be safe to call more than once, and
    /// after a failed or abandoned call.
    fn close(&mut self);
}

/// Opens session host connections.
pub trait SessionHostConnector: Send + Sync + fmt::Debug {
    fn connect(&self) -> Result<Box<dyn SessionHost>, VoiceError>;
}

/// Connects to the LiveKit Room Service configured in [`LiveKitConfig`].
#[derive(Debug, Clone)]
pub struct LiveKitConnector {
    config: LiveKitConfig,
}

impl LiveKitConnector {
    pub fn new(config: LiveKitConfig) -> Self {
        Self { config }
    }
}

impl SessionHostConnector for LiveKitConnector {
    fn connect(&self) -> Result<Box<dyn SessionHost>, VoiceError> {
        self.config.require_service()?;
        let client = RoomClient::with_api_key(
            &self.config.url,
            &self.config.api_key,
            &self.config.api_secret,
        );
        Ok(Box::new(LiveKitSessionHost {
            client: Some(client),
        }))
    }
}

#[derive(Debug)]
struct LiveKitSessionHost {
    client: Option<RoomClient>,
}

#[async_trait]
impl SessionHost for LiveKitSessionHost {
    async fn create_session(
        &self,
        descriptor: &SessionDescriptor,
    ) -> Result<SessionHandle, VoiceError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| VoiceError::RoomService("connection already closed".to_string()))?;

        let options = CreateRoomOptions {
            empty_timeout: descriptor.empty_timeout_secs,
            max_participants: descriptor.max_participants,
            ..Default::default()
        };

        client
            .create_room(&descriptor.name, options)
            .await
            .map(SessionHandle::from)
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("closed LiveKit room service connection");
        }
    }
}
