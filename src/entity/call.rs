// src/entity/call.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordBase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallInfo {
    /// `CALL-<YYYYMMDD>-<seq>`, assigned once on first persist
    pub call_id: Option<String>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallCustomer {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    #[serde(flatten)]
    pub base: RecordBase,
    pub call_info: CallInfo,
    pub customer: Option<CallCustomer>,
    /// AI handling outcome, transcript, sentiment and follow-up action.
    /// Stored verbatim.
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl Call {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            base: RecordBase::at(now),
            call_info: CallInfo {
                call_id: None,
                started_at: now,
            },
            customer: None,
            details: Map::new(),
        }
    }

    pub fn call_id(&self) -> Option<&str> {
        self.call_info.call_id.as_deref()
    }
}
