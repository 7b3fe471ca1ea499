use thiserror::Error;

pub type SdkResult<T> = Result<T, SdkError>;

/// Drift program context
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Context {
    /// Target DevNet
    DevNet,
    /// Target MainNet
    MainNet,
}

impl Context {
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::DevNet => "devnet",
            Context::MainNet => "mainnet-beta",
        }
    }
}

impl std::str::FromStr for Context {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Context::DevNet),
            "mainnet-beta" | "mainnet" => Ok(Context::MainNet),
            other => Err(SdkError::Generic(format!("unknown ENV value: {other}"))),
        }
    }
}

/// An account's decoded data paired with the slot it was observed at.
#[derive(Debug, Clone, Copy)]
pub struct DataAndSlot<T> {
    pub slot: u64,
    pub data: T,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Rpc(#[from] solana_client::client_error::ClientError),
    #[error("{0}")]
    Ws(#[from] solana_client::nonblocking::pubsub_client::PubsubClientError),
    #[error("error while deserializing account data")]
    Deserializing,
    #[error("invalid drift account")]
    InvalidAccount,
    #[error("invalid oracle account")]
    InvalidOracle,
    #[error("market not found: {0}")]
    MarketNotFound(String),
    #[error("WebSocket connection failed {0}")]
    ConnectionError(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("Received Error from websocket")]
    WebsocketError,
    #[error("Could not decode data: {0}")]
    CouldntDecode(#[from] base64::DecodeError),
    #[error("Couldn't join task: {0}")]
    CouldntJoin(#[from] tokio::task::JoinError),
    #[error("Couldn't send unsubscribe message: {0}")]
    CouldntUnsubscribe(#[from] tokio::sync::mpsc::error::SendError<()>),
    #[error("MathError: {0}")]
    MathError(String),
    #[error("{0}")]
    Generic(String),
    #[error("max reconnection attempts reached")]
    MaxReconnectionAttemptsReached,
}
