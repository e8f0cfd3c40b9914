//! # Code Tables
//!
//! Fixed lookup tables the gateway encodes into responses, plus the
//! externally supplied `messageId` message table.
//!
//! One policy applies to every lookup in this crate: a key that is absent
//! from the response maps to `None` at the accessor layer, while a key
//! that is present but unknown to its table is a `Format` error.

use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Human label for a CVD verification code (wire codes `1`-`6`).
pub fn cvd_status_label(code: &str) -> GatewayResult<&'static str> {
    match code {
        "1" => Ok("CVD Match"),
        "2" => Ok("CVD Mismatch"),
        "3" => Ok("CVD Not Verified"),
        "4" => Ok("CVD Should have been present"),
        "5" => Ok("CVD Issuer unable to process request"),
        "6" => Ok("CVD Not Provided"),
        other => Err(GatewayError::Format(format!(
            "unknown CVD status code: {}",
            other
        ))),
    }
}

/// Human label for a transaction type code in report rows.
pub fn transaction_type_label(code: &str) -> GatewayResult<&'static str> {
    match code {
        "P" => Ok("purchase"),
        "PA" => Ok("pre-authorization"),
        "PAC" => Ok("pre-authorization completion"),
        "R" => Ok("return"),
        "VP" => Ok("void purchase"),
        "VR" => Ok("void return"),
        other => Err(GatewayError::Format(format!(
            "unknown transaction type code: {}",
            other
        ))),
    }
}

/// Payment profile status, `A`/`C`/`D` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Active,
    Closed,
    Disabled,
}

impl ProfileStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            ProfileStatus::Active => "A",
            ProfileStatus::Closed => "C",
            ProfileStatus::Disabled => "D",
        }
    }

    pub fn from_code(code: &str) -> GatewayResult<Self> {
        match code {
            "A" => Ok(ProfileStatus::Active),
            "C" => Ok(ProfileStatus::Closed),
            "D" => Ok(ProfileStatus::Disabled),
            other => Err(GatewayError::Format(format!(
                "unknown profile status code: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Active => "active",
            ProfileStatus::Closed => "closed",
            ProfileStatus::Disabled => "disabled",
        }
    }
}

/// Request language, `ENG`/`FRE` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Eng,
    Fre,
}

impl Language {
    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Eng => "ENG",
            Language::Fre => "FRE",
        }
    }

    /// Parse a language option, case-insensitively.
    pub fn parse(value: &str) -> GatewayResult<Self> {
        match value.to_uppercase().as_str() {
            "ENG" => Ok(Language::Eng),
            "FRE" => Ok(Language::Fre),
            other => Err(GatewayError::Validation(format!(
                "invalid language option specified: {} (must be one of FRE, ENG)",
                other
            ))),
        }
    }
}

/// One entry in the response-code message table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCode {
    pub cardholder_message: String,
    pub merchant_message: String,
}

/// The gateway's `messageId` -> message table.
///
/// The table contents ship separately from this library; callers load or
/// build one and hand it to the `Gateway`. An empty table is valid: every
/// message lookup against it simply fails as unknown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseCodeTable {
    codes: HashMap<String, ResponseCode>,
}

impl ResponseCodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        message_id: impl Into<String>,
        cardholder_message: impl Into<String>,
        merchant_message: impl Into<String>,
    ) {
        self.codes.insert(
            message_id.into(),
            ResponseCode {
                cardholder_message: cardholder_message.into(),
                merchant_message: merchant_message.into(),
            },
        );
    }

    /// Builder: add an entry.
    pub fn with_code(
        mut self,
        message_id: impl Into<String>,
        cardholder_message: impl Into<String>,
        merchant_message: impl Into<String>,
    ) -> Self {
        self.insert(message_id, cardholder_message, merchant_message);
        self
    }

    /// Look up a message id present in a response. Unknown ids are a
    /// `Format` error, not a default message.
    pub fn get(&self, message_id: &str) -> GatewayResult<&ResponseCode> {
        self.codes.get(message_id).ok_or_else(|| {
            GatewayError::Format(format!("unknown response message id: {}", message_id))
        })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
