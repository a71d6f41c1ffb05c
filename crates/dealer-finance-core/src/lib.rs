pub mod error;
pub mod schedule;
pub mod time_value;
pub mod types;

#[cfg(feature = "pricing")]
pub mod pricing;

#[cfg(feature = "emi")]
pub mod emi;

#[cfg(feature = "quote")]
pub mod quote;

pub use error::DealerFinanceError;
pub use types::*;

/// Standard result type for all dealer-finance operations
pub type DealerFinanceResult<T> = Result<T, DealerFinanceError>;
