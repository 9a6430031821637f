use livekit_api::access_token::VideoGrants;
use serde::{Deserialize, Serialize};

/// Media sources a participant may be restricted to publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSource {
    Camera,
    Microphone,
    ScreenShare,
    ScreenShareAudio,
}

impl TrackSource {
    /// Returns the source name LiveKit expects in `canPublishSources`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Microphone => "microphone",
            Self::ScreenShare => "screen_share",
            Self::ScreenShareAudio => "screen_share_audio",
        }
    }
}

/// What a participant may do once joined.
///
/// The flags are independent: turning off `can_publish` disables all media
/// publishing no matter what `can_publish_sources` lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantCapabilities {
    /// Receive audio and video from other participants.
    pub can_subscribe: bool,
    /// Publish audio or video tracks.
    pub can_publish: bool,
    /// Send data messages (chat).
    pub can_publish_data: bool,
    /// Restricts publishing to these sources. `None` allows every source.
    #[serde(default)]
    pub can_publish_sources: Option<Vec<TrackSource>>,
}

impl Default for ParticipantCapabilities {
    fn default() -> Self {
        Self {
            can_subscribe: true,
            can_publish: true,
            can_publish_data: true,
            can_publish_sources: None,
        }
    }
}

impl ParticipantCapabilities {
    /// A listener: can subscribe, cannot publish media or data.
    pub fn subscribe_only() -> Self {
        Self {
            can_subscribe: true,
            can_publish: false,
            can_publish_data: false,
            can_publish_sources: None,
        }
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = TrackSource>) -> Self {
        self.can_publish_sources = Some(sources.into_iter().collect());
        self
    }

    pub(crate) fn video_grants(&self, room_name: &str) -> VideoGrants {
        VideoGrants {
            room_join: true,
            room: room_name.to_string(),
            can_subscribe: self.can_subscribe,
            can_publish: self.can_publish,
            can_publish_data: self.can_publish_data,
            can_publish_sources: self
                .can_publish_sources
                .iter()
                .flatten()
                .map(|source| source.as_str().to_string())
                .collect(),
            ..Default::default()
        }
    }
}
