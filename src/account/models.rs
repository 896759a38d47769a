//! Data models for the account ledger

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// A digital account holding a spendable balance.
///
/// Accounts are never created or destroyed by this engine; the balance is
/// mutated only through [`super::AccountRepository::debit`].
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub balance: Decimal,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Account {
    /// Whether the account can cover a debit of `amount`
    pub fn has_funds_for(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account(balance: Decimal) -> Account {
        Account {
            id: "acc-1".to_string(),
            name: "Test".to_string(),
            balance,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_has_funds_for() {
        assert!(account(dec!(100.00)).has_funds_for(dec!(40.00)));
        assert!(account(dec!(50.00)).has_funds_for(dec!(50.00)));
        assert!(!account(dec!(10.00)).has_funds_for(dec!(50.00)));
    }
}
