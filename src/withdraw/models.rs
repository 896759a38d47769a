//! Data models for withdrawal records

use chrono::{FixedOffset, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheduled times are stored as naive timestamps in this fixed UTC offset.
/// The comparison clock is normalized into the same offset before any
/// due-ness check. Deliberately a constant, not a DST-aware zone lookup.
pub const SCHEDULE_UTC_OFFSET_HOURS: i32 = -3;

pub fn schedule_offset() -> FixedOffset {
    FixedOffset::east_opt(SCHEDULE_UTC_OFFSET_HOURS * 3600)
        .expect("schedule offset is a valid fixed offset")
}

/// The UTC clock expressed in the schedule offset, comparable against
/// stored `scheduled_for` values.
pub fn now_in_schedule_offset() -> NaiveDateTime {
    Utc::now().with_timezone(&schedule_offset()).naive_local()
}

/// Payout method of a withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WithdrawMethod {
    Pix,
}

impl fmt::Display for WithdrawMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawMethod::Pix => write!(f, "PIX"),
        }
    }
}

impl FromStr for WithdrawMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PIX" => Ok(WithdrawMethod::Pix),
            _ => Err(format!("Unknown withdraw method: {}", s)),
        }
    }
}

impl WithdrawMethod {
    /// PIX payouts are addressed by a key; other methods may not be
    pub fn requires_destination(&self) -> bool {
        matches!(self, WithdrawMethod::Pix)
    }
}

/// Kind of PIX destination key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyType {
    Email,
}

impl fmt::Display for PixKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixKeyType::Email => write!(f, "email"),
        }
    }
}

impl FromStr for PixKeyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(PixKeyType::Email),
            _ => Err(format!("Unsupported PIX key type: {}", s)),
        }
    }
}

/// A persisted withdrawal record.
///
/// Lifecycle: created pending (`done=false, error=false`), then exactly one
/// terminal transition to `done=true` with `error` reporting the business
/// outcome. `updated_at` of a done record is its processing timestamp.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Withdrawal {
    pub id: String,
    pub account_id: String,
    pub method: String,
    pub amount: Decimal,
    pub scheduled: bool,
    pub scheduled_for: Option<NaiveDateTime>,
    pub done: bool,
    pub error: bool,
    pub error_reason: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// The PIX destination sub-record, one-to-one with its withdrawal
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PixDestination {
    pub account_withdraw_id: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub key: String,
    pub created_at: Option<NaiveDateTime>,
}

/// A validated request to create a withdrawal.
///
/// Shape invariants (amount > 0, destination present for methods that need
/// one, schedule not in the past) are enforced by the gateway before this
/// struct is built.
#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub method: WithdrawMethod,
    pub amount: Decimal,
    pub pix: Option<PixKey>,
    pub schedule: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct PixKey {
    pub kind: PixKeyType,
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_withdraw_method_roundtrip() {
        assert_eq!("PIX".parse::<WithdrawMethod>().unwrap(), WithdrawMethod::Pix);
        assert_eq!("pix".parse::<WithdrawMethod>().unwrap(), WithdrawMethod::Pix);
        assert_eq!(WithdrawMethod::Pix.to_string(), "PIX");
        assert!("TED".parse::<WithdrawMethod>().is_err());
    }

    #[test]
    fn test_pix_key_type_roundtrip() {
        assert_eq!("email".parse::<PixKeyType>().unwrap(), PixKeyType::Email);
        assert_eq!("EMAIL".parse::<PixKeyType>().unwrap(), PixKeyType::Email);
        assert_eq!(PixKeyType::Email.to_string(), "email");
        assert!("phone".parse::<PixKeyType>().is_err());
    }

    #[test]
    fn test_pix_requires_destination() {
        assert!(WithdrawMethod::Pix.requires_destination());
    }

    #[test]
    fn test_schedule_offset_is_three_hours_behind_utc() {
        let utc = Utc::now().naive_utc();
        let local = now_in_schedule_offset();
        let diff = utc - local;
        // Allow a little slack for the two clock reads.
        assert!(diff >= Duration::hours(3) - Duration::seconds(1));
        assert!(diff <= Duration::hours(3) + Duration::seconds(1));
    }
}
