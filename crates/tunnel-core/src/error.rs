use thiserror::Error;

/// Errors that can occur while setting up or running tunnel forwards.
#[derive(Error, Debug)]
pub enum TunnelError {
    /// Invalid port number
    #[error("port must be a valid number between 0-65535: {0}")]
    InvalidPort(String),

    /// Invalid forwarding specification
    #[error("invalid {kind} forward spec: {message}")]
    InvalidForwardSpec { kind: String, message: String },

    /// Remote side refused to register a forward
    #[error("remote refused forward registration for {address}: {source}")]
    Registration {
        address: String,
        #[source]
        source: Box<TunnelError>,
    },

    /// Local listener could not bind
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Outbound channel open failed for one connection
    #[error("failed to open channel to {target}: {source}")]
    OpenChannel {
        target: String,
        #[source]
        source: Box<TunnelError>,
    },

    /// Local destination was unreachable for one inbound connection
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SSH protocol error
    #[error("SSH protocol error: {0}")]
    Ssh(#[from] russh::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for tunnel operations
pub type TunnelResult<T> = Result<T, TunnelError>;

impl TunnelError {
    /// Create an invalid forward spec error
    pub fn invalid_forward(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidForwardSpec {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Wrap a transport error as a refused forward registration
    pub fn registration(address: impl Into<String>, source: TunnelError) -> Self {
        Self::Registration {
            address: address.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a transport error as a per-connection channel open failure
    pub fn open_channel(target: impl Into<String>, source: TunnelError) -> Self {
        Self::OpenChannel {
            target: target.into(),
            source: Box::new(source),
        }
    }
}
