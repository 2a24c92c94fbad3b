pub mod config;
pub mod cost;
pub mod currency;
pub mod error;
pub mod note;
pub mod parse;
pub mod pricing;
pub mod store;
pub mod types;

#[cfg(feature = "report")]
pub mod report;

pub use config::AnalysisConfig;
pub use error::NgitungError;
pub use pricing::engine::{recompute, PricingInput, PricingParameters, PricingResult};
pub use types::*;

/// Standard result type for all ngitung operations
pub type NgitungResult<T> = Result<T, NgitungError>;
