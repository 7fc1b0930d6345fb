use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{decode, Signal};
use crate::error::{CoreError, CoreResult};

pub type UserId = u64;
pub type EcgId = u64;

/// The twelve standard ECG lead labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadName {
    I,
    II,
    III,
    #[serde(rename = "aVR")]
    AVR,
    #[serde(rename = "aVL")]
    AVL,
    #[serde(rename = "aVF")]
    AVF,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
}

impl LeadName {
    pub const ALL: [LeadName; 12] = [
        LeadName::I,
        LeadName::II,
        LeadName::III,
        LeadName::AVR,
        LeadName::AVL,
        LeadName::AVF,
        LeadName::V1,
        LeadName::V2,
        LeadName::V3,
        LeadName::V4,
        LeadName::V5,
        LeadName::V6,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadName::I => "I",
            LeadName::II => "II",
            LeadName::III => "III",
            LeadName::AVR => "aVR",
            LeadName::AVL => "aVL",
            LeadName::AVF => "aVF",
            LeadName::V1 => "V1",
            LeadName::V2 => "V2",
            LeadName::V3 => "V3",
            LeadName::V4 => "V4",
            LeadName::V5 => "V5",
            LeadName::V6 => "V6",
        }
    }
}

impl fmt::Display for LeadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadName::ALL
            .iter()
            .copied()
            .find(|lead| lead.as_str() == s)
            .ok_or_else(|| CoreError::InvalidLeadName(s.to_string()))
    }
}

/// One channel of an ECG. `num_samples` is advisory and never checked
/// against the decoded signal length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: LeadName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_samples: Option<i64>,
    pub signal: String,
}

impl Lead {
    pub fn new(name: LeadName, signal: impl Into<String>) -> Self {
        Self {
            name,
            num_samples: None,
            signal: signal.into(),
        }
    }

    pub fn with_num_samples(mut self, num_samples: i64) -> Self {
        self.num_samples = Some(num_samples);
        self
    }

    pub fn decode(&self) -> CoreResult<Signal> {
        decode(&self.signal).map_err(|source| CoreError::InvalidSignalFormat {
            lead: self.name,
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgRecord {
    pub id: EcgId,
    pub date: DateTime<Utc>,
    pub leads: Vec<Lead>,
    #[serde(skip)]
    pub owner: UserId,
}

impl fmt::Display for EcgRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ECG {}", self.id)
    }
}
