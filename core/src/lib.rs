//! Core of the ECG backend: signal decoding, per-lead zero-crossing
//! analysis, and the account and record operations around it.

pub mod accounts;
pub mod analysis;
pub mod config;
pub mod error;
pub mod log;
pub mod mock;
pub mod model;
pub mod service;
mod storage;

pub use accounts::{Credentials, Registration, User};
pub use analysis::{analyze, crossing_count, Signal, SignalFormatError, ZeroCrossingResult};
pub use config::{AccountPolicy, ConfigError, CoreConfig};
pub use error::{CoreError, CoreResult, FieldError};
pub use model::{EcgId, EcgRecord, Lead, LeadName, UserId};
pub use service::EcgService;
