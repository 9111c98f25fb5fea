use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use streamify_core::error::Error;

pub const ALERT_DURATION: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertStyle {
    Info,
    Error,
}

/// Transient user-facing notification.
#[derive(Clone, Debug)]
pub struct Alert {
    pub id: usize,
    pub message: Arc<str>,
    pub style: AlertStyle,
    pub created_at: Instant,
}

impl Alert {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= ALERT_DURATION
    }
}

/// Text shown to the user for a failed operation.  Backend messages win over
/// the generic wording.
pub fn describe_error(err: &Error) -> String {
    match err {
        Error::Validation(field) => format!("Please fill in the {field}."),
        Error::Rejected {
            message: Some(message),
            ..
        } if !message.trim().is_empty() => message.clone(),
        Error::Rejected { status, .. } => format!("The server refused the request ({status})."),
        Error::NoChanges => "No changes were made.".to_string(),
        Error::InvalidPin => "Invalid PIN.".to_string(),
        Error::NotSignedIn => "Please sign in first.".to_string(),
        Error::ConnectivityError(_) => "Could not connect to the server.".to_string(),
        Error::DecodeError(_) => "The server sent an unexpected response.".to_string(),
        Error::PlaybackError(msg) => format!("Playback failed: {msg}"),
        Error::IoError(err) => format!("Local storage error: {err}"),
    }
}
