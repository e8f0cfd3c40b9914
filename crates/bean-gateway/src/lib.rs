//! # bean-gateway
//!
//! Beanstream payment gateway client for beanstream-rs.
//!
//! Builds form-encoded requests for the gateway's operations — purchases,
//! pre-authorizations, adjustments, recurring billing, payment profiles
//! and reports — sends them over HTTPS, and parses the key/value or
//! tab-delimited answers into typed response objects.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bean_core::{Address, Amount, CreditCard};
//! use bean_gateway::{Gateway, GatewayConfig};
//!
//! let config = GatewayConfig::new("300200578")?
//!     .with_hash_validation("my-hashcode", bean_gateway::HashAlgorithm::Sha1)?
//!     .with_require_cvd(true);
//! let gateway = Gateway::new(config)?;
//!
//! let card = CreditCard::new("John Doe", "4030000010001234", 5, 2030)?
//!     .with_cvd("123");
//! let address = Address::new(
//!     "John Doe",
//!     "john.doe@example.com",
//!     "123 Fake Street",
//!     "Fake City",
//!     "ON",
//!     "A1A1A1",
//!     "CA",
//! )?;
//!
//! let purchase = gateway.purchase(&Amount::from_units(50), &card, Some(&address))?;
//! let response = purchase.commit().await?;
//!
//! if response.approved() {
//!     println!("transaction id: {:?}", response.transaction_id());
//! }
//! ```
//!
//! A declined charge is a normal response (`approved() == false`), not an
//! error. Errors cover bad configuration, invalid input, and transport or
//! wire-format failures.

pub mod config;
pub mod gateway;
pub mod notification;
pub mod process;
pub mod profile;
pub mod recurring;
pub mod report;
pub mod response;
pub mod transaction;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports
pub use config::{GatewayConfig, HashAlgorithm, ReportLogin, ValidationMode};
pub use gateway::Gateway;
pub use notification::RecurringBillingNotification;
pub use process::{Adjustment, AdjustmentKind, Purchase};
pub use profile::{CreatePaymentProfile, GetPaymentProfile, ModifyPaymentProfile};
pub use recurring::{
    BillingPeriod, CreateRecurringBillingAccount, ModifyRecurringBillingAccount,
};
pub use report::{
    CardLookupRecord, CardLookupResponse, CreditCardLookupReport, TransactionRecord,
    TransactionReport, TransactionReportResponse, TransactionSetReport,
};
pub use response::{
    ModifyRecurringBillingResponse, ProfileError, ProfileResponse, ResponseFields,
    TransactionResponse,
};
pub use transaction::{Endpoint, Params, Transaction, TransactionKind};
pub use transport::HttpTransport;
