//! # Recurring Billing
//!
//! Creating a recurring billing account is a purchase with recurring
//! options attached; modifying one goes to the dedicated
//! recurring-billing endpoint and answers in a narrow XML format.

use crate::config::GatewayConfig;
use crate::response::{ModifyRecurringBillingResponse, TransactionResponse};
use crate::transaction::{Endpoint, Transaction, TransactionKind};
use bean_core::{
    Address, Amount, BoxedTransport, CreditCard, GatewayError, GatewayResult, ResponseCodeTable,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Billing frequency period, `D`/`W`/`M`/`Y` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl BillingPeriod {
    pub fn as_code(&self) -> &'static str {
        match self {
            BillingPeriod::Daily => "D",
            BillingPeriod::Weekly => "W",
            BillingPeriod::Monthly => "M",
            BillingPeriod::Yearly => "Y",
        }
    }

    /// Parse a frequency period letter, case-insensitively.
    pub fn parse(value: &str) -> GatewayResult<Self> {
        match value.to_uppercase().as_str() {
            "D" => Ok(BillingPeriod::Daily),
            "W" => Ok(BillingPeriod::Weekly),
            "M" => Ok(BillingPeriod::Monthly),
            "Y" => Ok(BillingPeriod::Yearly),
            other => Err(GatewayError::Validation(format!(
                "invalid frequency period specified: {} (must be one of DWMY)",
                other
            ))),
        }
    }
}

/// Billing-cycle dates go on the wire as `MMDDYYYY`.
fn billing_date(date: NaiveDate) -> String {
    date.format("%m%d%Y").to_string()
}

/// Create a recurring billing account: a purchase-shaped request that
/// charges the card and registers the billing schedule. Requires a
/// billing address.
pub struct CreateRecurringBillingAccount {
    txn: Transaction,
}

impl CreateRecurringBillingAccount {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
        amount: &Amount,
        card: &CreditCard,
        frequency_period: BillingPeriod,
        frequency_increment: u32,
    ) -> GatewayResult<Self> {
        let mut txn = Transaction::new(
            config,
            transport,
            codes,
            TransactionKind::CreateRecurringBilling,
            Endpoint::ProcessTransaction,
        );

        let merchant_id = txn.config().merchant_id.clone();
        txn.insert("merchant_id", merchant_id);
        txn.insert("trnAmount", amount.format());
        txn.insert("requestType", "BACKEND");
        txn.insert("trnType", "P");

        txn.insert("trnRecurring", "1");
        txn.insert("rbBillingPeriod", frequency_period.as_code());
        txn.insert("rbBillingIncrement", frequency_increment.to_string());

        txn.set_card(card)?;

        Ok(Self { txn })
    }

    pub fn order_number(&self) -> &str {
        self.txn.order_number()
    }

    pub fn set_billing_address(&mut self, address: &Address) {
        self.txn.set_billing_address(address);
    }

    /// Bill on the last day of the month. Only meaningful for monthly
    /// billing; ignored with a warning otherwise.
    pub fn set_end_month(&mut self, on: bool) {
        if self.txn.params().get("rbBillingPeriod") != Some("M") {
            warn!("cannot set end_month attribute if billing period is not monthly");
            return;
        }
        self.txn.insert("rbEndMonth", if on { "1" } else { "0" });
    }

    /// Delay the initial charge to the first billing date.
    pub fn set_delay_charge(&mut self, on: bool) {
        self.txn.insert("rbCharge", if on { "0" } else { "1" });
    }

    pub fn set_first_date(&mut self, first_date: NaiveDate) {
        self.txn.insert("rbFirstBilling", billing_date(first_date));
    }

    pub fn set_second_date(&mut self, second_date: NaiveDate) {
        self.txn.insert("rbSecondBilling", billing_date(second_date));
    }

    /// Date the billing schedule expires.
    pub fn set_expiry(&mut self, expiry: NaiveDate) {
        self.txn.insert("rbExpiry", billing_date(expiry));
    }

    pub fn set_tax1(&mut self, on: bool) {
        self.txn.insert("rbApplyTax1", if on { "1" } else { "0" });
    }

    pub fn set_tax2(&mut self, on: bool) {
        self.txn.insert("rbApplyTax2", if on { "1" } else { "0" });
    }

    pub fn set_taxes(&mut self, on: bool) {
        self.set_tax1(on);
        self.set_tax2(on);
    }

    #[instrument(skip(self), fields(order_number = %self.txn.order_number()))]
    pub async fn commit(self) -> GatewayResult<TransactionResponse> {
        let codes = self.txn.codes();
        let body = self.txn.commit_raw().await?;
        Ok(TransactionResponse::parse(&body, codes))
    }
}

/// Modify an existing recurring billing account.
pub struct ModifyRecurringBillingAccount {
    txn: Transaction,
}

impl ModifyRecurringBillingAccount {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
        account_id: &str,
    ) -> Self {
        let mut txn = Transaction::new(
            config,
            transport,
            codes,
            TransactionKind::ModifyRecurringBilling,
            Endpoint::RecurringBilling,
        );

        let merchant_id = txn.config().merchant_id.clone();
        txn.insert("merchantId", merchant_id);
        txn.insert("serviceVersion", "1.0");
        txn.insert("operationType", "M");
        txn.insert("rbAccountId", account_id);

        Self { txn }
    }

    pub fn order_number(&self) -> &str {
        self.txn.order_number()
    }

    /// Change the recurring charge amount.
    pub fn set_amount(&mut self, amount: &Amount) {
        self.txn.insert("trnAmount", amount.format());
    }

    pub fn set_billing_period(&mut self, period: BillingPeriod) {
        self.txn.insert("rbBillingPeriod", period.as_code());
    }

    pub fn set_billing_increment(&mut self, increment: u32) {
        self.txn
            .insert("rbBillingIncrement", increment.to_string());
    }

    #[instrument(skip(self), fields(order_number = %self.txn.order_number()))]
    pub async fn commit(self) -> GatewayResult<ModifyRecurringBillingResponse> {
        let body = self.txn.commit_raw().await?;
        ModifyRecurringBillingResponse::parse(&body)
    }
}
