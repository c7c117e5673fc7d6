pub mod amortization;
pub mod config;
pub mod error;
pub mod insurance;
pub mod payment;
pub mod types;
pub mod validation;

#[cfg(feature = "land_transfer")]
pub mod land_transfer;

#[cfg(feature = "land_transfer")]
pub mod closing;

#[cfg(feature = "scenarios")]
pub mod scenario;

#[cfg(feature = "scenarios")]
pub mod analysis;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage-scenario operations
pub type MortgageResult<T> = Result<T, MortgageError>;
