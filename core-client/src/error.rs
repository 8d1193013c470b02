use bridge_traits::error::BridgeError;
use core_playback::PlaybackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The server answered 2xx with a body the client cannot use.
    #[error("{0}")]
    InvalidResponse(String),

    /// The request never completed.
    #[error("{0}")]
    Network(#[from] BridgeError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),
}

impl ClientError {
    /// Text shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
