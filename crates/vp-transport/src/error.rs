use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("socket not connected; call connect() first or use sendto/recvfrom")]
    NotConnected,
    #[error("transport closed")]
    Closed,
    #[error("network I/O unavailable on this target; delegate to host environment")]
    Unsupported,
}

pub type Result<T> = std::result::Result<T, TransportError>;

impl From<TransportError> for vp_core::Error {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Io(_) => vp_core::Error::NetworkTimeout(0),
            TransportError::NotConnected | TransportError::Closed | TransportError::Unsupported => {
                vp_core::Error::InvalidParameter(e.to_string())
            }
        }
    }
}
