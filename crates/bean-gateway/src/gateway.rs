//! # Gateway Facade
//!
//! Wires merchant configuration into not-yet-committed transactions of
//! each kind. The facade is purely a factory: every method hands back a
//! fresh transaction carrying the merchant identity, the shared
//! transport, and the response-code table, with the card, address or
//! customer code already attached where given.

use crate::config::GatewayConfig;
use crate::notification::RecurringBillingNotification;
use crate::process::{Adjustment, AdjustmentKind, Purchase};
use crate::profile::{CreatePaymentProfile, GetPaymentProfile, ModifyPaymentProfile};
use crate::recurring::{
    BillingPeriod, CreateRecurringBillingAccount, ModifyRecurringBillingAccount,
};
use crate::report::{CreditCardLookupReport, TransactionReport, TransactionSetReport};
use crate::transport::HttpTransport;
use bean_core::{
    Address, Amount, BoxedTransport, CreditCard, GatewayResult, ResponseCodeTable,
};
use std::sync::Arc;

/// The gateway client: immutable configuration plus a factory method per
/// transaction kind.
#[derive(Clone)]
pub struct Gateway {
    config: Arc<GatewayConfig>,
    transport: BoxedTransport,
    codes: Arc<ResponseCodeTable>,
}

impl Gateway {
    /// Create a gateway over the default HTTPS transport.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let transport = Arc::new(HttpTransport::new(config.timeout)?);
        Ok(Self {
            config: Arc::new(config),
            transport,
            codes: Arc::new(ResponseCodeTable::default()),
        })
    }

    /// Create a gateway from environment variables.
    pub fn from_env() -> GatewayResult<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    /// Builder: attach the externally supplied response-code message
    /// table used by `cardholder_message` / `merchant_message` lookups.
    pub fn with_response_codes(mut self, codes: ResponseCodeTable) -> Self {
        self.codes = Arc::new(codes);
        self
    }

    /// Builder: swap the transport (for testing).
    pub fn with_transport(mut self, transport: BoxedTransport) -> Self {
        self.transport = transport;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// A one-off credit card purchase.
    pub fn purchase(
        &self,
        amount: &Amount,
        card: &CreditCard,
        billing_address: Option<&Address>,
    ) -> GatewayResult<Purchase> {
        let mut txn = Purchase::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            amount,
            false,
        );
        txn.set_card(card)?;
        if let Some(address) = billing_address {
            txn.set_billing_address(address);
        }
        Ok(txn)
    }

    /// A pre-authorization: identical to a purchase on the wire except
    /// for the transaction type.
    pub fn preauth(
        &self,
        amount: &Amount,
        card: &CreditCard,
        billing_address: Option<&Address>,
    ) -> GatewayResult<Purchase> {
        let mut txn = Purchase::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            amount,
            true,
        );
        txn.set_card(card)?;
        if let Some(address) = billing_address {
            txn.set_billing_address(address);
        }
        Ok(txn)
    }

    /// A purchase charged to a stored payment profile instead of a card.
    pub fn purchase_with_profile(&self, amount: &Amount, customer_code: &str) -> Purchase {
        let mut txn = Purchase::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            amount,
            false,
        );
        txn.set_customer_code(customer_code);
        txn
    }

    /// An adjustment (return, void, pre-auth completion) against a prior
    /// transaction id. Requires a configured validation mode.
    pub fn adjustment(
        &self,
        kind: AdjustmentKind,
        transaction_id: &str,
        amount: &Amount,
    ) -> GatewayResult<Adjustment> {
        Adjustment::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            kind,
            transaction_id,
            amount,
        )
    }

    /// Create a recurring billing account charging `card` every
    /// `frequency_increment` periods.
    pub fn create_recurring_billing_account(
        &self,
        amount: &Amount,
        card: &CreditCard,
        frequency_period: BillingPeriod,
        frequency_increment: u32,
        billing_address: Option<&Address>,
    ) -> GatewayResult<CreateRecurringBillingAccount> {
        let mut txn = CreateRecurringBillingAccount::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            amount,
            card,
            frequency_period,
            frequency_increment,
        )?;
        if let Some(address) = billing_address {
            txn.set_billing_address(address);
        }
        Ok(txn)
    }

    /// Modify an existing recurring billing account.
    pub fn modify_recurring_billing_account(
        &self,
        account_id: &str,
    ) -> ModifyRecurringBillingAccount {
        ModifyRecurringBillingAccount::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            account_id,
        )
    }

    /// Store a card as a payment profile. Requires the profile passcode.
    pub fn create_payment_profile(
        &self,
        card: &CreditCard,
    ) -> GatewayResult<CreatePaymentProfile> {
        CreatePaymentProfile::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            card,
        )
    }

    /// Modify a stored payment profile. Requires the profile passcode.
    pub fn modify_payment_profile(
        &self,
        customer_code: &str,
    ) -> GatewayResult<ModifyPaymentProfile> {
        ModifyPaymentProfile::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            customer_code,
        )
    }

    /// Query a stored payment profile. Requires the profile passcode.
    pub fn get_payment_profile(&self, customer_code: &str) -> GatewayResult<GetPaymentProfile> {
        GetPaymentProfile::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            customer_code,
        )
    }

    /// Download transaction details. Requires the report login.
    pub fn transaction_report(&self) -> GatewayResult<TransactionReport> {
        TransactionReport::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
        )
    }

    /// Download details for a specific set of transaction ids.
    pub fn transaction_set_report(
        &self,
        transaction_ids: Vec<String>,
    ) -> GatewayResult<TransactionSetReport> {
        TransactionSetReport::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
            transaction_ids,
        )
    }

    /// Search transactions by card number or transaction id.
    pub fn credit_card_lookup_report(&self) -> GatewayResult<CreditCardLookupReport> {
        CreditCardLookupReport::new(
            self.config.clone(),
            self.transport.clone(),
            self.codes.clone(),
        )
    }

    /// Parse an inbound recurring-billing charge notification.
    pub fn parse_recurring_notification(&self, body: &str) -> RecurringBillingNotification {
        RecurringBillingNotification::parse(body, self.codes.clone())
    }
}
