//! # Process Transaction Operations
//!
//! One-off purchases, pre-authorizations, and adjustments (returns,
//! voids, pre-auth completions) against the process-transaction endpoint.

use crate::config::GatewayConfig;
use crate::response::TransactionResponse;
use crate::transaction::{Endpoint, Transaction, TransactionKind};
use bean_core::{
    Address, Amount, BoxedTransport, CreditCard, GatewayError, GatewayResult, Language,
    ResponseCodeTable,
};
use std::sync::Arc;
use tracing::{instrument, warn};

/// A one-off credit card purchase.
///
/// Also covers pre-authorizations, which differ only in the wire
/// transaction type (`PA` instead of `P`).
#[derive(Debug)]
pub struct Purchase {
    txn: Transaction,
}

impl Purchase {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
        amount: &Amount,
        preauth: bool,
    ) -> Self {
        let kind = if preauth {
            TransactionKind::PreAuthorization
        } else {
            TransactionKind::Purchase
        };
        let mut txn = Transaction::new(
            config,
            transport,
            codes,
            kind,
            Endpoint::ProcessTransaction,
        );

        let merchant_id = txn.config().merchant_id.clone();
        txn.insert("merchant_id", merchant_id);
        txn.insert("trnAmount", amount.format());
        txn.insert("requestType", "BACKEND");
        txn.insert("trnType", if preauth { "PA" } else { "P" });

        Self { txn }
    }

    /// Client-generated correlation string attached to this request.
    pub fn order_number(&self) -> &str {
        self.txn.order_number()
    }

    /// Attach card fields. Fails when the gateway is configured to
    /// require CVD and the card carries none.
    pub fn set_card(&mut self, card: &CreditCard) -> GatewayResult<()> {
        self.txn.set_card(card)
    }

    pub fn set_billing_address(&mut self, address: &Address) {
        self.txn.set_billing_address(address);
    }

    /// Charge a stored payment profile instead of raw card fields.
    pub fn set_customer_code(&mut self, customer_code: impl Into<String>) {
        self.txn.set_customer_code(customer_code);
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.txn.insert("trnComments", comments);
    }

    pub fn set_language(&mut self, language: Language) {
        self.txn.insert("trnLanguage", language.as_code());
    }

    /// Record the customer's IP address. Only meaningful alongside hash
    /// or username/password validation; ignored with a warning otherwise.
    pub fn set_ip_address(&mut self, ip_address: impl Into<String>) {
        if self.txn.config().validation.is_none() {
            warn!("IP address must be used with either hash or username/password validation; ignoring");
            return;
        }
        self.txn.insert("customerIP", ip_address);
    }

    /// Attach up to five passthrough reference fields.
    pub fn set_refs(&mut self, refs: &[&str]) -> GatewayResult<()> {
        self.txn.set_refs(refs)
    }

    /// Validate, send, and parse the gateway's answer. Consumes the
    /// purchase; a declined response is returned, not raised.
    #[instrument(skip(self), fields(order_number = %self.txn.order_number()))]
    pub async fn commit(self) -> GatewayResult<TransactionResponse> {
        let codes = self.txn.codes();
        let body = self.txn.commit_raw().await?;
        Ok(TransactionResponse::parse(&body, codes))
    }
}

/// Post-hoc operation kinds against a prior transaction id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    Return,
    Void,
    PreauthCompletion,
    VoidReturn,
    VoidPurchase,
}

impl AdjustmentKind {
    pub fn as_code(&self) -> &'static str {
        match self {
            AdjustmentKind::Return => "R",
            AdjustmentKind::Void => "V",
            AdjustmentKind::PreauthCompletion => "PAC",
            AdjustmentKind::VoidReturn => "VR",
            AdjustmentKind::VoidPurchase => "VP",
        }
    }
}

/// An adjustment (return, void, pre-auth completion) against a prior
/// transaction.
#[derive(Debug)]
pub struct Adjustment {
    txn: Transaction,
}

impl Adjustment {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
        kind: AdjustmentKind,
        transaction_id: &str,
        amount: &Amount,
    ) -> GatewayResult<Self> {
        if config.validation.is_none() {
            return Err(GatewayError::Configuration(
                "adjustments must be performed with either hash or username/password validation"
                    .into(),
            ));
        }

        let mut txn = Transaction::new(
            config,
            transport,
            codes,
            TransactionKind::Adjustment,
            Endpoint::ProcessTransaction,
        );

        let merchant_id = txn.config().merchant_id.clone();
        txn.insert("merchant_id", merchant_id);
        txn.insert("requestType", "BACKEND");
        txn.insert("trnType", kind.as_code());
        txn.insert("adjId", transaction_id);
        txn.insert("trnAmount", amount.format());

        Ok(Self { txn })
    }

    pub fn order_number(&self) -> &str {
        self.txn.order_number()
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.txn.insert("trnComments", comments);
    }

    pub fn set_refs(&mut self, refs: &[&str]) -> GatewayResult<()> {
        self.txn.set_refs(refs)
    }

    #[instrument(skip(self), fields(order_number = %self.txn.order_number()))]
    pub async fn commit(self) -> GatewayResult<TransactionResponse> {
        let codes = self.txn.codes();
        let body = self.txn.commit_raw().await?;
        Ok(TransactionResponse::parse(&body, codes))
    }
}
