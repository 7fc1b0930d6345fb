use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::model::{Lead, LeadName};

pub mod codec;
mod ecg;

pub use codec::{decode, encode, Signal, SignalFormatError};
pub use ecg::zero_crossing_count;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroCrossingResult {
    pub lead_name: LeadName,
    pub zero_crossing_count: usize,
}

/// Decodes one signal text and counts its zero crossings.
pub fn crossing_count(signal_text: &str) -> Result<usize, SignalFormatError> {
    decode(signal_text).map(|signal| zero_crossing_count(&signal))
}

/// Counts zero crossings for every lead, in input order.
///
/// The first lead that fails to decode aborts the whole batch.
pub fn analyze(leads: &[Lead]) -> CoreResult<Vec<ZeroCrossingResult>> {
    leads
        .iter()
        .map(|lead| {
            let signal = lead.decode()?;
            Ok(ZeroCrossingResult {
                lead_name: lead.name,
                zero_crossing_count: zero_crossing_count(&signal),
            })
        })
        .collect()
}
