use std::{error, fmt, io};

#[derive(Debug)]
pub enum Error {
    /// A required field was missing or empty.  Raised before any request.
    Validation(&'static str),
    /// The backend answered with a non-success status.
    Rejected {
        status: u16,
        message: Option<String>,
    },
    /// An account update was submitted without any changed field.
    NoChanges,
    InvalidPin,
    NotSignedIn,
    ConnectivityError(Box<dyn error::Error + Send>),
    DecodeError(Box<dyn error::Error + Send>),
    PlaybackError(String),
    IoError(io::Error),
}

impl Error {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::ConnectivityError(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::DecodeError(_))
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(field) => write!(f, "Missing required field: {field}"),
            Self::Rejected {
                status,
                message: Some(message),
            } => write!(f, "Request rejected ({status}): {message}"),
            Self::Rejected {
                status,
                message: None,
            } => write!(f, "Request rejected ({status})"),
            Self::NoChanges => write!(f, "No changes to submit"),
            Self::InvalidPin => write!(f, "Invalid PIN"),
            Self::NotSignedIn => write!(f, "Not signed in"),
            Self::ConnectivityError(err) | Self::DecodeError(err) => err.fmt(f),
            Self::PlaybackError(msg) => f.write_str(msg),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Error {
        Error::ConnectivityError(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::DecodeError(Box::new(err))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::DecodeError(Box::new(err))
    }
}
