//! # Payment Profiles
//!
//! Server-side stored card/customer representations, referenced by a
//! customer code in lieu of resending card details. All three operations
//! ride the payment-profile endpoint and require the configured profile
//! passcode.

use crate::config::GatewayConfig;
use crate::response::ProfileResponse;
use crate::transaction::{Endpoint, Transaction, TransactionKind};
use bean_core::{
    BoxedTransport, CreditCard, GatewayError, GatewayResult, Language, ProfileStatus,
    ResponseCodeTable,
};
use std::sync::Arc;
use tracing::instrument;

fn new_profile_transaction(
    config: Arc<GatewayConfig>,
    transport: BoxedTransport,
    codes: Arc<ResponseCodeTable>,
    kind: TransactionKind,
    operation_type: &str,
) -> GatewayResult<Transaction> {
    let passcode = config.payment_profile_passcode.clone().ok_or_else(|| {
        GatewayError::Configuration(
            "payment profile passcode must be specified to create or modify payment profiles"
                .into(),
        )
    })?;

    let mut txn = Transaction::new(config, transport, codes, kind, Endpoint::PaymentProfile);

    let merchant_id = txn.config().merchant_id.clone();
    txn.insert("serviceVersion", "1.0");
    txn.insert("merchantId", merchant_id);
    txn.insert("passCode", passcode);
    txn.insert("responseFormat", "QS");
    txn.insert("operationType", operation_type);

    Ok(txn)
}

fn set_language(txn: &mut Transaction, language: Language) {
    txn.insert("trnLanguage", language.as_code());
}

fn set_velocity_id(txn: &mut Transaction, velocity_id: impl Into<String>) {
    txn.insert("velocityIdentity", velocity_id);
}

fn set_status_id(txn: &mut Transaction, status_id: impl Into<String>) {
    txn.insert("statusIdentity", status_id);
}

fn set_status(txn: &mut Transaction, status: ProfileStatus) {
    txn.insert("status", status.as_code());
}

fn set_card_validation(txn: &mut Transaction, validate: bool) {
    txn.insert("cardValidation", if validate { "1" } else { "0" });
}

/// Create a payment profile from card details (`operationType N`).
#[derive(Debug)]
pub struct CreatePaymentProfile {
    txn: Transaction,
}

impl CreatePaymentProfile {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
        card: &CreditCard,
    ) -> GatewayResult<Self> {
        let mut txn = new_profile_transaction(
            config,
            transport,
            codes,
            TransactionKind::CreateProfile,
            "N",
        )?;
        txn.params_mut().extend(card.params());
        Ok(Self { txn })
    }

    pub fn order_number(&self) -> &str {
        self.txn.order_number()
    }

    pub fn set_language(&mut self, language: Language) {
        set_language(&mut self.txn, language);
    }

    pub fn set_velocity_id(&mut self, velocity_id: impl Into<String>) {
        set_velocity_id(&mut self.txn, velocity_id);
    }

    pub fn set_status_id(&mut self, status_id: impl Into<String>) {
        set_status_id(&mut self.txn, status_id);
    }

    pub fn set_status(&mut self, status: ProfileStatus) {
        set_status(&mut self.txn, status);
    }

    /// Toggle a validation charge against the card before storing it.
    pub fn set_card_validation(&mut self, validate: bool) {
        set_card_validation(&mut self.txn, validate);
    }

    #[instrument(skip(self), fields(order_number = %self.txn.order_number()))]
    pub async fn commit(self) -> GatewayResult<ProfileResponse> {
        let codes = self.txn.codes();
        let body = self.txn.commit_raw().await?;
        Ok(ProfileResponse::parse(&body, codes))
    }
}

/// Modify an existing payment profile (`operationType M`).
pub struct ModifyPaymentProfile {
    txn: Transaction,
}

impl ModifyPaymentProfile {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
        customer_code: &str,
    ) -> GatewayResult<Self> {
        let mut txn = new_profile_transaction(
            config,
            transport,
            codes,
            TransactionKind::ModifyProfile,
            "M",
        )?;
        txn.insert("customerCode", customer_code);
        Ok(Self { txn })
    }

    pub fn order_number(&self) -> &str {
        self.txn.order_number()
    }

    /// Replace the stored card.
    pub fn set_card(&mut self, card: &CreditCard) {
        self.txn.params_mut().extend(card.params());
    }

    pub fn set_language(&mut self, language: Language) {
        set_language(&mut self.txn, language);
    }

    pub fn set_velocity_id(&mut self, velocity_id: impl Into<String>) {
        set_velocity_id(&mut self.txn, velocity_id);
    }

    pub fn set_status_id(&mut self, status_id: impl Into<String>) {
        set_status_id(&mut self.txn, status_id);
    }

    pub fn set_status(&mut self, status: ProfileStatus) {
        set_status(&mut self.txn, status);
    }

    pub fn set_card_validation(&mut self, validate: bool) {
        set_card_validation(&mut self.txn, validate);
    }

    #[instrument(skip(self), fields(order_number = %self.txn.order_number()))]
    pub async fn commit(self) -> GatewayResult<ProfileResponse> {
        let codes = self.txn.codes();
        let body = self.txn.commit_raw().await?;
        Ok(ProfileResponse::parse(&body, codes))
    }
}

/// Query a payment profile (`operationType Q`).
pub struct GetPaymentProfile {
    txn: Transaction,
}

impl GetPaymentProfile {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
        customer_code: &str,
    ) -> GatewayResult<Self> {
        let mut txn = new_profile_transaction(
            config,
            transport,
            codes,
            TransactionKind::QueryProfile,
            "Q",
        )?;
        txn.insert("customerCode", customer_code);
        Ok(Self { txn })
    }

    pub fn order_number(&self) -> &str {
        self.txn.order_number()
    }

    #[instrument(skip(self), fields(order_number = %self.txn.order_number()))]
    pub async fn commit(self) -> GatewayResult<ProfileResponse> {
        let codes = self.txn.codes();
        let body = self.txn.commit_raw().await?;
        Ok(ProfileResponse::parse(&body, codes))
    }
}
