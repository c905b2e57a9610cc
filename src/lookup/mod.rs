//! CEP lookup: per-service fetchers raced against a shared deadline.
//!
//! Each configured [`Endpoint`] gets one fetcher task. Fetchers write exactly
//! one [`FetchOutcome`] into a bounded channel; the [`Racer`] reads the first
//! one, or reports [`RaceResult::TimedOut`] if the [`DeadlineToken`] elapses
//! before anything arrives.

mod address;
mod deadline;
mod endpoint;
mod fetcher;
mod outcome;
mod race;

pub use address::{AddressRecord, Schema};
pub use deadline::{DeadlineToken, DoneReason};
pub use endpoint::{Endpoint, BRASIL_API_TEMPLATE, CEP_PLACEHOLDER, VIA_CEP_TEMPLATE};
pub use fetcher::fetch;
pub use outcome::{
    status_text, ErrorCategory, FetchError, FetchOutcome, RaceResult, TIMEOUT_MESSAGE,
};
pub use race::Racer;
