//! cep-race - race Brazilian postal code lookups across address services.
//!
//! A CEP is looked up on several independent HTTP services at once. The first
//! answer within the time budget wins; everything else is abandoned.

pub mod config;
pub mod http_client;
pub mod lookup;

pub use config::{Config, ConfigError};
pub use lookup::{AddressRecord, Endpoint, FetchError, FetchOutcome, RaceResult, Racer, Schema};
