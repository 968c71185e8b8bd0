//! Account balance and transfer validation

use crate::error::{Error, Result};
use crate::types::TransferRequest;
use crate::STARTING_BALANCE;

/// A single account balance in base units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    balance: u64,
}

impl Default for Account {
    fn default() -> Self {
        Self::new(STARTING_BALANCE)
    }
}

impl Account {
    /// Account with the given opening balance
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    /// Current balance
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Validate a requested amount against the balance
    ///
    /// Boundary check only: zero and overdraft amounts are rejected here
    /// and never reach a verification session.
    pub fn prepare_transfer(&self, amount: u64) -> Result<TransferRequest> {
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        if amount > self.balance {
            return Err(Error::InsufficientFunds {
                requested: amount,
                balance: self.balance,
            });
        }
        Ok(TransferRequest { amount })
    }

    /// Apply a verified transfer
    pub fn apply_transfer(&mut self, request: &TransferRequest) {
        self.balance = self.balance.saturating_sub(request.amount);
    }
}

/// Format an amount with thousands separators for display
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transfer_passes() {
        let account = Account::new(1_000_000);
        let request = account.prepare_transfer(500_000).unwrap();
        assert_eq!(request.amount, 500_000);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let account = Account::new(1_000_000);
        assert!(matches!(
            account.prepare_transfer(0),
            Err(Error::InvalidAmount)
        ));
    }

    #[test]
    fn overdraft_is_rejected() {
        let account = Account::new(100);
        assert!(matches!(
            account.prepare_transfer(101),
            Err(Error::InsufficientFunds { requested: 101, balance: 100 })
        ));
        // The full balance is still spendable
        assert!(account.prepare_transfer(100).is_ok());
    }

    #[test]
    fn apply_debits_the_balance() {
        let mut account = Account::new(1_000_000);
        let request = account.prepare_transfer(500_000).unwrap();
        account.apply_transfer(&request);
        assert_eq!(account.balance(), 500_000);
    }

    #[test]
    fn amounts_format_with_separators() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1_000), "1,000");
        assert_eq!(format_amount(1_000_000), "1,000,000");
        assert_eq!(format_amount(12_345_678), "12,345,678");
    }
}
