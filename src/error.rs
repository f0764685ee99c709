#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unsupported socket flags {0:#x}: only empty flags are accepted")]
    UnsupportedFlags(i32),
    #[error("Address family {0} is not supported")]
    AddressFamilyNotSupported(u16),
    #[error("Socket error: {0}")]
    Socket(#[source] std::io::Error),
}

impl Error {
    /// Wraps a platform error code fetched right after a failed call.
    pub fn from_os_code(code: i32) -> Self {
        Error::Socket(std::io::Error::from_raw_os_error(code))
    }

    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::Socket(e) => e.raw_os_error(),
            _ => None,
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Socket(e) => e,
            Error::UnsupportedFlags(_) => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, value)
            }
            Error::AddressFamilyNotSupported(_) => {
                std::io::Error::new(std::io::ErrorKind::Unsupported, value)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
