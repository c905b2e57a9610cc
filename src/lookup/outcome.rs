//! Fetch outcomes and race results.

use std::fmt;

use reqwest::StatusCode;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::address::AddressRecord;
use super::deadline::DoneReason;

/// Message printed when no fetcher answered before the deadline.
pub const TIMEOUT_MESSAGE: &str = "Error: Request timeout";

/// Why a single fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("request canceled")]
    Canceled,

    #[error("{}", status_text(.0))]
    Status(StatusCode),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

/// Coarse failure category, stable across error sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Transport,
    Status,
    Decode,
}

impl FetchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FetchError::Transport(_) | FetchError::DeadlineExceeded | FetchError::Canceled => {
                ErrorCategory::Transport
            }
            FetchError::Status(_) => ErrorCategory::Status,
            FetchError::Decode(_) => ErrorCategory::Decode,
        }
    }
}

/// Numeric code followed by the canonical reason, when the code has one.
pub fn status_text(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

impl From<DoneReason> for FetchError {
    fn from(reason: DoneReason) -> Self {
        match reason {
            DoneReason::Elapsed => FetchError::DeadlineExceeded,
            DoneReason::Canceled => FetchError::Canceled,
        }
    }
}

/// Terminal result of one fetcher.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchOutcome {
    Found {
        service: String,
        address: AddressRecord,
    },
    Failed {
        service: String,
        #[serde(serialize_with = "serialize_fetch_error")]
        error: FetchError,
    },
}

impl FetchOutcome {
    pub fn service(&self) -> &str {
        match self {
            FetchOutcome::Found { service, .. } | FetchOutcome::Failed { service, .. } => service,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found { .. })
    }

    /// True when the fetcher gave up because the race deadline elapsed.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(
            self,
            FetchOutcome::Failed {
                error: FetchError::DeadlineExceeded,
                ..
            }
        )
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Found { service, address } => write!(f, "{}: {}", service, address),
            FetchOutcome::Failed { service, error } => match error {
                FetchError::Status(_) => write!(f, "{} returned an error: {}", service, error),
                FetchError::Decode(e) => write!(f, "Error decoding {} response: {}", service, e),
                other => write!(f, "Error in {}: {}", service, other),
            },
        }
    }
}

fn serialize_fetch_error<S: Serializer>(error: &FetchError, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("FetchError", 2)?;
    state.serialize_field("category", &error.category())?;
    state.serialize_field("detail", &error.to_string())?;
    state.end()
}

/// How a race concluded.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RaceResult {
    /// The first outcome written by any fetcher.
    Resolved { outcome: FetchOutcome },
    /// No fetcher answered before the deadline.
    TimedOut,
}

impl RaceResult {
    pub fn outcome(&self) -> Option<&FetchOutcome> {
        match self {
            RaceResult::Resolved { outcome } => Some(outcome),
            RaceResult::TimedOut => None,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, RaceResult::TimedOut)
    }
}

impl fmt::Display for RaceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceResult::Resolved { outcome } => fmt::Display::fmt(outcome, f),
            RaceResult::TimedOut => f.write_str(TIMEOUT_MESSAGE),
        }
    }
}
