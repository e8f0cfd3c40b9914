//! # Recurring Billing Notifications
//!
//! When a recurring billing account is charged, the gateway POSTs a
//! form-encoded notification to the merchant's configured callback URL.
//! This parses that inbound payload; nothing here touches the network.

use crate::response::{
    lookup_cardholder_message, lookup_merchant_message, ResponseFields,
};
use bean_core::{GatewayError, GatewayResult, ResponseCodeTable};
use chrono::NaiveDate;
use std::sync::Arc;

/// Dates in notifications arrive as `MM/DD/YYYY`.
fn notification_date(raw: &str) -> GatewayResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .map_err(|e| GatewayError::Format(format!("bad notification date '{}': {}", raw, e)))
}

/// A parsed recurring-billing charge notification.
#[derive(Debug, Clone)]
pub struct RecurringBillingNotification {
    fields: ResponseFields,
    codes: Arc<ResponseCodeTable>,
}

impl RecurringBillingNotification {
    pub fn parse(body: &str, codes: Arc<ResponseCodeTable>) -> Self {
        Self {
            fields: ResponseFields::parse(body),
            codes,
        }
    }

    pub fn fields(&self) -> &ResponseFields {
        &self.fields
    }

    /// The recurring billing account that was charged.
    pub fn account_id(&self) -> Option<&str> {
        self.fields.first("billingId")
    }

    pub fn approved(&self) -> bool {
        self.fields.first("trnApproved").unwrap_or("0") == "1"
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.fields.first("trnId")
    }

    pub fn auth_code(&self) -> Option<&str> {
        self.fields.first("authCode")
    }

    pub fn cardholder_message(&self) -> GatewayResult<Option<&str>> {
        lookup_cardholder_message(&self.fields, &self.codes)
    }

    pub fn merchant_message(&self) -> GatewayResult<Option<&str>> {
        lookup_merchant_message(&self.fields, &self.codes)
    }

    /// Account holder name.
    pub fn name(&self) -> Option<&str> {
        self.fields.first("accountName")
    }

    pub fn email(&self) -> Option<&str> {
        self.fields.first("emailAddress")
    }

    pub fn billing_amount(&self) -> Option<&str> {
        self.fields.first("billingAmount")
    }

    pub fn billing_date(&self) -> GatewayResult<Option<NaiveDate>> {
        self.fields
            .first("billingDate")
            .map(notification_date)
            .transpose()
    }

    pub fn billing_period(&self) -> Option<&str> {
        self.fields.first("billingPeriod")
    }

    pub fn billing_increment(&self) -> Option<&str> {
        self.fields.first("billingIncrement")
    }

    /// Start of the billing period this charge covers.
    pub fn period_from(&self) -> GatewayResult<Option<NaiveDate>> {
        self.fields
            .first("periodFrom")
            .map(notification_date)
            .transpose()
    }

    /// End of the billing period this charge covers.
    pub fn period_to(&self) -> GatewayResult<Option<NaiveDate>> {
        self.fields
            .first("periodTo")
            .map(notification_date)
            .transpose()
    }
}
