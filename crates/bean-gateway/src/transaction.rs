//! # Transaction Core
//!
//! The shared machinery behind every transaction kind: credential
//! seeding, order-number generation, the wire parameter map, per-kind
//! validation, the optional request digest, and the single commit
//! exchange.
//!
//! A transaction moves linearly through Built -> Validated -> Sent ->
//! Parsed. `commit` consumes the transaction, so committing twice is a
//! compile error rather than undefined behavior.

use crate::config::{GatewayConfig, HashAlgorithm, ValidationMode};
use bean_core::{
    Address, BoxedTransport, CreditCard, GatewayError, GatewayResult, ResponseCodeTable,
};
use md5::{Digest, Md5};
use rand::Rng;
use sha1::Sha1;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};
use url::form_urlencoded;

/// The gateway's fixed endpoint roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ProcessTransaction,
    RecurringBilling,
    PaymentProfile,
    ReportDownload,
    Report,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::ProcessTransaction => "/scripts/process_transaction.asp",
            Endpoint::RecurringBilling => "/scripts/recurring_billing.asp",
            Endpoint::PaymentProfile => "/scripts/payment_profile.asp",
            Endpoint::ReportDownload => "/scripts/report_download.asp",
            Endpoint::Report => "/scripts/report.aspx",
        }
    }

    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

/// Tag driving the shared per-kind validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Purchase,
    PreAuthorization,
    Adjustment,
    CreateRecurringBilling,
    ModifyRecurringBilling,
    CreateProfile,
    ModifyProfile,
    QueryProfile,
    TransactionReport,
    CardLookupReport,
}

/// Wire parameter map with deterministic (key-sorted) encode order, so
/// the request digest is reproducible.
#[derive(Debug, Clone, Default)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn extend<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in pairs {
            self.0.insert(key, value);
        }
    }

    /// URL-encode in key order.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// State shared by every transaction kind. Single-use by construction.
pub struct Transaction {
    config: Arc<GatewayConfig>,
    transport: BoxedTransport,
    codes: Arc<ResponseCodeTable>,
    kind: TransactionKind,
    endpoint: Endpoint,
    params: Params,
    order_number: String,
    pub(crate) has_billing_address: bool,
    pub(crate) has_credit_card: bool,
    pub(crate) has_customer_code: bool,
}

// `transport` is a `dyn Transport` trait object and cannot be derived, so
// `Debug` is implemented by hand over the remaining fields. Used only so
// transaction wrapper types can derive `Debug` for test `unwrap_err`.
impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("params", &self.params)
            .field("order_number", &self.order_number)
            .field("has_billing_address", &self.has_billing_address)
            .field("has_credit_card", &self.has_credit_card)
            .field("has_customer_code", &self.has_customer_code)
            .finish_non_exhaustive()
    }
}

impl Transaction {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
        kind: TransactionKind,
        endpoint: Endpoint,
    ) -> Self {
        let order_number = generate_order_number();

        let mut params = Params::default();
        if let ValidationMode::Password { username, password } = &config.validation {
            params.insert("username", username.clone());
            params.insert("password", password.clone());
        }
        params.insert("trnOrderNumber", order_number.clone());

        Self {
            config,
            transport,
            codes,
            kind,
            endpoint,
            params,
            order_number,
            has_billing_address: false,
            has_credit_card: false,
            has_customer_code: false,
        }
    }

    /// Client-generated correlation string attached to this request.
    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub(crate) fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub(crate) fn codes(&self) -> Arc<ResponseCodeTable> {
        self.codes.clone()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key, value);
    }

    pub(crate) fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Attach card fields, enforcing the configured CVD requirement.
    pub(crate) fn set_card(&mut self, card: &CreditCard) -> GatewayResult<()> {
        if self.config.require_cvd && !card.has_cvd() {
            error!("CVD required");
            return Err(GatewayError::Validation("CVD required".into()));
        }
        self.params.extend(card.params());
        self.has_credit_card = true;
        Ok(())
    }

    /// Attach billing address fields under the `ord` prefix.
    pub(crate) fn set_billing_address(&mut self, address: &Address) {
        self.params.extend(address.params("ord"));
        self.has_billing_address = true;
    }

    /// Reference a stored payment profile instead of raw card fields.
    pub(crate) fn set_customer_code(&mut self, customer_code: impl Into<String>) {
        self.params.insert("customerCode", customer_code);
        self.has_customer_code = true;
    }

    /// Attach up to five `ref1`..`ref5` passthrough fields; empty entries
    /// are skipped.
    pub(crate) fn set_refs(&mut self, refs: &[&str]) -> GatewayResult<()> {
        if refs.len() > 5 {
            return Err(GatewayError::Validation("too many ref fields".into()));
        }
        for (idx, reference) in refs.iter().enumerate() {
            if !reference.is_empty() {
                self.params.insert(format!("ref{}", idx + 1), *reference);
            }
        }
        Ok(())
    }

    fn validate(&self) -> GatewayResult<()> {
        match self.kind {
            TransactionKind::Purchase | TransactionKind::PreAuthorization => {
                if (self.has_billing_address || self.has_credit_card) && self.has_customer_code {
                    error!("billing address or credit card specified with customer code");
                    return Err(GatewayError::Validation(
                        "cannot specify both customer code and billing address/credit card".into(),
                    ));
                }
                if !self.has_customer_code
                    && self.config.require_billing_address
                    && !self.has_billing_address
                {
                    error!("billing address required");
                    return Err(GatewayError::Validation("billing address required".into()));
                }
                Ok(())
            }
            TransactionKind::CreateRecurringBilling => {
                if !self.has_billing_address {
                    return Err(GatewayError::Validation(
                        "recurring billing creation requires a billing address".into(),
                    ));
                }
                Ok(())
            }
            TransactionKind::ModifyRecurringBilling => {
                if !self.params.contains("rbAccountId") {
                    return Err(GatewayError::Validation(
                        "recurring billing account id required".into(),
                    ));
                }
                Ok(())
            }
            TransactionKind::CardLookupReport => {
                if !self.params.contains("rptTransId") && !self.params.contains("rptCcNumber") {
                    return Err(GatewayError::Validation(
                        "card lookup requires one of transaction id or credit card number".into(),
                    ));
                }
                Ok(())
            }
            TransactionKind::Adjustment
            | TransactionKind::CreateProfile
            | TransactionKind::ModifyProfile
            | TransactionKind::QueryProfile
            | TransactionKind::TransactionReport => Ok(()),
        }
    }

    /// Validate, encode, sign where applicable, and perform the single
    /// wire exchange. Returns the raw response body.
    pub(crate) async fn commit_raw(self) -> GatewayResult<String> {
        self.validate()?;

        let mut data = self.params.encode();

        // Hashing applies only to requests sent to the process-transaction
        // endpoint.
        if self.endpoint == Endpoint::ProcessTransaction {
            if let ValidationMode::Hash {
                hashcode,
                algorithm,
            } = &self.config.validation
            {
                let digest = request_digest(&data, hashcode, *algorithm);
                data.push_str("&hashValue=");
                data.push_str(&digest);
            }
        }

        let url = self.endpoint.url(&self.config.base_url);
        debug!("sending to {}: {}", url, data);

        let (status, body) = self.transport.post_form(&url, data).await?;

        if status != 200 {
            error!("response code not OK: {}", status);
            return Err(GatewayError::Http {
                status,
                message: body,
            });
        }

        if body == "Empty hash value" {
            error!("hash validation required");
            return Err(GatewayError::Rejected("hash validation required".into()));
        }

        debug!("gateway response: {}", body);
        Ok(body)
    }
}

/// Random 30-character lowercase alphanumeric order number.
fn generate_order_number() -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..30)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Hex digest over the encoded body concatenated with the shared secret.
fn request_digest(encoded: &str, hashcode: &str, algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Md5 => {
            let mut hasher = Md5::new();
            hasher.update(encoded.as_bytes());
            hasher.update(hashcode.as_bytes());
            hex::encode(hasher.finalize())
        }
        HashAlgorithm::Sha1 => {
            let mut hasher = Sha1::new();
            hasher.update(encoded.as_bytes());
            hasher.update(hashcode.as_bytes());
            hex::encode(hasher.finalize())
        }
    }
}
