//! # bean-core
//!
//! Core types for the beanstream-rs gateway client.
//!
//! This crate provides:
//! - `CreditCard` and `Address` field models with constructor-time validation
//! - `Amount` for exact fixed-point monetary values
//! - Code tables (`cvd_status_label`, `ProfileStatus`, `ResponseCodeTable`)
//! - The `Transport` trait the gateway client sends requests through
//! - `GatewayError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use bean_core::{Address, Amount, CreditCard};
//!
//! let card = CreditCard::new("John Doe", "4030000010001234", 5, 2030)?
//!     .with_cvd("123");
//!
//! let address = Address::new(
//!     "John Doe",
//!     "john.doe@example.com",
//!     "123 Fake Street",
//!     "Fake City",
//!     "ON",
//!     "A1A1A1",
//!     "CA",
//! )?
//! .with_phone("555-555-5555");
//!
//! let amount = Amount::from_units(50); // "50.00" on the wire
//! ```

pub mod amount;
pub mod billing;
pub mod codes;
pub mod error;
pub mod transport;

// Re-exports for convenience
pub use amount::Amount;
pub use billing::{Address, CreditCard};
pub use codes::{
    cvd_status_label, transaction_type_label, Language, ProfileStatus, ResponseCode,
    ResponseCodeTable,
};
pub use error::{GatewayError, GatewayResult};
pub use transport::{BoxedTransport, Transport};
