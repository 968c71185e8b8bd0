//! Error types for the Shakeguard core library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid transfer amount")]
    InvalidAmount,

    #[error("Amount {requested} exceeds available balance {balance}")]
    InsufficientFunds { requested: u64, balance: u64 },
}
