//! LiveKit access for the voice assistant.
//!
//! Mints the signed join tokens the end user and the agent present to the
//! LiveKit server, and provisions rooms through the LiveKit Room Service.
//! Tokens are self-contained JWTs: nothing here keeps session state, and
//! validation (signature and expiry) happens on the LiveKit side.

pub mod config;
pub mod error;
pub mod grants;
pub mod host;
pub mod issuer;

pub use config::LiveKitConfig;
pub use error::VoiceError;
pub use grants::{ParticipantCapabilities, TrackSource};
pub use host::{
    LiveKitConnector, SessionDescriptor, SessionHandle, SessionHost, SessionHostConnector,
};
pub use issuer::{TokenIssuer, TokenPair};
