//! API request/response types, error codes, and request validation
//!
//! Validation happens entirely at this layer: the withdrawal service
//! receives only well-formed input.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::ValidateEmail;

use crate::withdraw::{NewWithdrawal, PixKey, PixKeyType, WithdrawMethod, Withdrawal};
use crate::withdraw::models::now_in_schedule_offset;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;

    // Resource errors (4xxx)
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

// ============================================================================
// StrictDecimal: Format-Validated Decimal at Serde Layer
// ============================================================================

/// Strict format Decimal - validates format during deserialization
///
/// - Rejects `.5` (must be `0.5`)
/// - Rejects `5.` (must be `5.0` or `5`)
/// - Rejects negative numbers
/// - Rejects empty strings
///
/// Business validation (amount strictly positive) happens in
/// [`WithdrawRequest::validate`].
#[derive(Debug, Clone, Copy)]
pub struct StrictDecimal(Decimal);

impl StrictDecimal {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl<'de> Deserialize<'de> for StrictDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        // Support both JSON number and JSON string
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DecimalOrString {
            String(String),
            Number(Decimal),
        }

        let value = DecimalOrString::deserialize(deserializer)?;

        match value {
            DecimalOrString::String(s) => {
                if s.is_empty() {
                    return Err(D::Error::custom("Amount cannot be empty"));
                }
                if s.starts_with('.') {
                    return Err(D::Error::custom("Invalid format: use 0.5 not .5"));
                }
                if s.ends_with('.') {
                    return Err(D::Error::custom("Invalid format: use 5.0 not 5."));
                }

                let d = Decimal::from_str(&s)
                    .map_err(|e| D::Error::custom(format!("Invalid decimal: {}", e)))?;

                if d.is_sign_negative() {
                    return Err(D::Error::custom("Amount cannot be negative"));
                }

                Ok(StrictDecimal(d))
            }
            DecimalOrString::Number(d) => {
                if d.is_sign_negative() {
                    return Err(D::Error::custom("Amount cannot be negative"));
                }
                Ok(StrictDecimal(d))
            }
        }
    }
}

impl Serialize for StrictDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as string to preserve precision
        serializer.serialize_str(&self.0.to_string())
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct PixDto {
    /// Destination key kind; only "email" is accepted
    #[serde(rename = "type")]
    #[schema(example = "email")]
    pub kind: String,
    /// Destination key, validated against the kind
    #[schema(example = "user@example.com")]
    pub key: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    /// Payout method, e.g. "PIX"
    #[schema(example = "PIX")]
    pub method: String,
    /// Amount to withdraw, strictly positive
    #[schema(value_type = String, example = "40.00")]
    pub amount: StrictDecimal,
    /// Required for PIX withdrawals
    pub pix: Option<PixDto>,
    /// Optional schedule time, "Y-m-d H:M" in the schedule offset, not in
    /// the past
    #[schema(example = "2026-09-01 10:00")]
    pub schedule: Option<String>,
}

impl WithdrawRequest {
    /// Validate shape and convert into the engine's input type
    pub fn validate(self) -> Result<NewWithdrawal, String> {
        let method = WithdrawMethod::from_str(&self.method)?;

        let amount = self.amount.inner();
        if amount <= Decimal::ZERO {
            return Err("Amount must be greater than zero".to_string());
        }

        let pix = if method.requires_destination() {
            let Some(pix) = self.pix else {
                return Err("PIX withdrawals require pix.type and pix.key".to_string());
            };
            let kind = PixKeyType::from_str(&pix.kind)?;
            if !pix.key.validate_email() {
                return Err("PIX key must be a valid email address".to_string());
            }
            Some(PixKey { kind, key: pix.key })
        } else {
            None
        };

        let schedule = match self.schedule.as_deref() {
            Some(s) => Some(parse_schedule(s)?),
            None => None,
        };

        Ok(NewWithdrawal {
            method,
            amount,
            pix,
            schedule,
        })
    }
}

/// Parse a schedule time and reject times already in the past.
///
/// The wall-clock comparison happens in the fixed schedule offset, the same
/// reference the dispatcher claims against.
pub fn parse_schedule(s: &str) -> Result<NaiveDateTime, String> {
    let parsed = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .map_err(|_| "Schedule must be a valid date-time in \"Y-m-d H:M\" format".to_string())?;

    if parsed < now_in_schedule_offset() {
        return Err("Schedule time cannot be in the past".to_string());
    }

    Ok(parsed)
}

// ============================================================================
// Responses
// ============================================================================

/// Withdrawal response data, echoing the persisted record
#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawData {
    pub id: String,
    pub account_id: String,
    #[schema(example = "PIX")]
    pub method: String,
    #[schema(value_type = String, example = "40.00")]
    pub amount: Decimal,
    pub scheduled: bool,
    pub scheduled_for: Option<NaiveDateTime>,
    pub done: bool,
    pub error: bool,
    pub error_reason: Option<String>,
}

impl From<Withdrawal> for WithdrawData {
    fn from(w: Withdrawal) -> Self {
        Self {
            id: w.id,
            account_id: w.account_id,
            method: w.method,
            amount: w.amount,
            scheduled: w.scheduled,
            scheduled_for: w.scheduled_for,
            done: w.done,
            error: w.error,
            error_reason: w.error_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn pix_request(amount: &str) -> WithdrawRequest {
        serde_json::from_value(serde_json::json!({
            "method": "PIX",
            "amount": amount,
            "pix": { "type": "email", "key": "user@example.com" }
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_immediate_pix_request() {
        let new = pix_request("40.00").validate().unwrap();
        assert_eq!(new.method, WithdrawMethod::Pix);
        assert_eq!(new.amount, dec!(40.00));
        assert!(new.schedule.is_none());
        assert_eq!(new.pix.unwrap().key, "user@example.com");
    }

    #[test]
    fn test_unknown_method_rejected() {
        let req: WithdrawRequest = serde_json::from_value(serde_json::json!({
            "method": "DOC",
            "amount": "10.00"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert!(pix_request("0.00").validate().is_err());
    }

    #[test]
    fn test_negative_amount_rejected_at_serde_layer() {
        let result: Result<WithdrawRequest, _> = serde_json::from_value(serde_json::json!({
            "method": "PIX",
            "amount": "-5.00",
            "pix": { "type": "email", "key": "user@example.com" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_decimal_rejected_at_serde_layer() {
        for bad in [".5", "5.", ""] {
            let result: Result<WithdrawRequest, _> = serde_json::from_value(serde_json::json!({
                "method": "PIX",
                "amount": bad,
            }));
            assert!(result.is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_pix_without_destination_rejected() {
        let req: WithdrawRequest = serde_json::from_value(serde_json::json!({
            "method": "PIX",
            "amount": "10.00"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_non_email_key_type_rejected() {
        let req: WithdrawRequest = serde_json::from_value(serde_json::json!({
            "method": "PIX",
            "amount": "10.00",
            "pix": { "type": "phone", "key": "+5511999990000" }
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_invalid_email_key_rejected() {
        let req: WithdrawRequest = serde_json::from_value(serde_json::json!({
            "method": "PIX",
            "amount": "10.00",
            "pix": { "type": "email", "key": "not-an-email" }
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_schedule_parses_with_and_without_seconds() {
        let future = now_in_schedule_offset() + Duration::hours(1);
        let no_seconds = future.format("%Y-%m-%d %H:%M").to_string();
        let with_seconds = future.format("%Y-%m-%d %H:%M:%S").to_string();

        assert!(parse_schedule(&no_seconds).is_ok());
        assert!(parse_schedule(&with_seconds).is_ok());
    }

    #[test]
    fn test_schedule_in_past_rejected() {
        let past = now_in_schedule_offset() - Duration::hours(1);
        let s = past.format("%Y-%m-%d %H:%M").to_string();
        assert!(parse_schedule(&s).is_err());
    }

    #[test]
    fn test_garbage_schedule_rejected() {
        assert!(parse_schedule("tomorrow at noon").is_err());
    }
}
