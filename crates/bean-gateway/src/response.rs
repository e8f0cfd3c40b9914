//! # Response Parsing & Models
//!
//! The gateway answers in two wire shapes: URL-encoded key/value pairs
//! (possibly with repeated keys) and, for one recurring-billing
//! operation, a small fixed-structure XML fragment. This module parses
//! both into typed read-only accessors.
//!
//! Accessor policy, applied uniformly: a key absent from the response is
//! `None`; a key present with a code its lookup table does not know is a
//! `Format` error. A decline (`approved() == false`) is a normal parsed
//! outcome, never an error.

use bean_core::{
    cvd_status_label, Address, GatewayError, GatewayResult, ProfileStatus, ResponseCodeTable,
};
use chrono::NaiveDateTime;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::sync::Arc;
use url::form_urlencoded;

/// Parsed key/value response body. The wire format allows repeated keys;
/// typed accessors read the first value.
#[derive(Debug, Clone, Default)]
pub struct ResponseFields(HashMap<String, Vec<String>>);

impl ResponseFields {
    pub fn parse(body: &str) -> Self {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in form_urlencoded::parse(body.as_bytes()) {
            fields
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self(fields)
    }

    /// First value for a key, or `None` when absent.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(|s| s.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// All values recorded for a key.
    pub fn all(&self, key: &str) -> &[String] {
        self.0.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

pub(crate) fn lookup_cvd_status(fields: &ResponseFields) -> GatewayResult<Option<&'static str>> {
    match fields.first("cvdId") {
        Some(code) => cvd_status_label(code).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn lookup_cardholder_message<'a>(
    fields: &ResponseFields,
    codes: &'a ResponseCodeTable,
) -> GatewayResult<Option<&'a str>> {
    match fields.first("messageId") {
        Some(id) => codes.get(id).map(|c| Some(c.cardholder_message.as_str())),
        None => Ok(None),
    }
}

pub(crate) fn lookup_merchant_message<'a>(
    fields: &ResponseFields,
    codes: &'a ResponseCodeTable,
) -> GatewayResult<Option<&'a str>> {
    match fields.first("messageId") {
        Some(id) => codes.get(id).map(|c| Some(c.merchant_message.as_str())),
        None => Ok(None),
    }
}

/// Typed view over a process-transaction response (purchases,
/// pre-authorizations, adjustments and recurring-account creation).
#[derive(Debug, Clone)]
pub struct TransactionResponse {
    fields: ResponseFields,
    codes: Arc<ResponseCodeTable>,
}

impl TransactionResponse {
    pub(crate) fn parse(body: &str, codes: Arc<ResponseCodeTable>) -> Self {
        Self {
            fields: ResponseFields::parse(body),
            codes,
        }
    }

    /// Raw parsed fields, for anything without a typed accessor.
    pub fn fields(&self) -> &ResponseFields {
        &self.fields
    }

    /// Order number assigned in the transaction request.
    pub fn order_number(&self) -> Option<&str> {
        self.fields.first("trnOrderNumber")
    }

    /// Gateway transaction identifier.
    pub fn transaction_id(&self) -> Option<&str> {
        self.fields.first("trnId")
    }

    /// Whether the transaction was approved. False is a decline, not an
    /// error.
    pub fn approved(&self) -> bool {
        self.fields.first("trnApproved").unwrap_or("0") == "1"
            && self
                .fields
                .first("responseCode")
                .map_or(true, |code| code == "1")
    }

    /// Bank-issued authorization code, present on approvals.
    pub fn auth_code(&self) -> Option<&str> {
        self.fields.first("authCode")
    }

    /// CVD verification outcome.
    pub fn cvd_status(&self) -> GatewayResult<Option<&'static str>> {
        lookup_cvd_status(&self.fields)
    }

    /// Cardholder-facing message for the response `messageId`.
    pub fn cardholder_message(&self) -> GatewayResult<Option<&str>> {
        lookup_cardholder_message(&self.fields, &self.codes)
    }

    /// Merchant-facing message for the response `messageId`.
    pub fn merchant_message(&self) -> GatewayResult<Option<&str>> {
        lookup_merchant_message(&self.fields, &self.codes)
    }

    /// The amount the transaction was for, as the gateway echoed it.
    pub fn amount(&self) -> Option<&str> {
        self.fields.first("trnAmount")
    }

    /// Date and time the gateway processed the transaction.
    pub fn datetime(&self) -> GatewayResult<Option<NaiveDateTime>> {
        match self.fields.first("trnDate") {
            Some(raw) => NaiveDateTime::parse_from_str(raw, "%m/%d/%Y %I:%M:%S %p")
                .map(Some)
                .map_err(|e| GatewayError::Format(format!("bad trnDate '{}': {}", raw, e))),
            None => Ok(None),
        }
    }

    /// The five request reference fields, in order.
    pub fn refs(&self) -> [Option<&str>; 5] {
        [
            self.fields.first("ref1"),
            self.fields.first("ref2"),
            self.fields.first("ref3"),
            self.fields.first("ref4"),
            self.fields.first("ref5"),
        ]
    }

    /// Recurring billing account id, present when the transaction created
    /// a recurring billing account.
    pub fn account_id(&self) -> Option<&str> {
        self.fields.first("rbAccountId")
    }
}

/// Structured failure detail extracted from a payment-profile response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// A gateway- or cardholder-level message.
    Message(String),
    /// Field-level validation failures (`responseCode` 19), keyed by the
    /// human name of the offending field.
    Fields(Vec<(String, String)>),
}

/// Human names for the wire fields a profile response can flag.
const PROFILE_FIELD_NAMES: &[(&str, &str)] = &[
    ("ordName", "name"),
    ("ordAddress1", "address line 1"),
    ("ordAddress2", "address line 2"),
    ("ordCity", "city"),
    ("ordProvince", "state/province"),
    ("ordCountry", "country"),
    ("ordPostalCode", "zip/postal code"),
    ("ordEmailAddress", "email address"),
    ("trnCardNumber", "credit card number"),
    ("trnCardOwner", "credit card owner"),
    ("trnCardExpiry", "credit card expiry"),
    ("customerCode", "customer code"),
];

fn profile_field_name(wire_name: &str) -> &'static str {
    PROFILE_FIELD_NAMES
        .iter()
        .find(|(wire, _)| *wire == wire_name)
        .map(|(_, human)| *human)
        .unwrap_or("unknown")
}

/// Typed view over a payment-profile response (`responseFormat QS`).
#[derive(Debug, Clone)]
pub struct ProfileResponse {
    fields: ResponseFields,
    codes: Arc<ResponseCodeTable>,
}

impl ProfileResponse {
    pub(crate) fn parse(body: &str, codes: Arc<ResponseCodeTable>) -> Self {
        Self {
            fields: ResponseFields::parse(body),
            codes,
        }
    }

    pub fn fields(&self) -> &ResponseFields {
        &self.fields
    }

    pub fn approved(&self) -> bool {
        self.fields.first("responseCode").unwrap_or("0") == "1"
            && self.fields.first("trnApproved").unwrap_or("1") == "1"
    }

    /// Customer code identifying the stored profile.
    pub fn customer_code(&self) -> Option<&str> {
        self.fields.first("customerCode")
    }

    pub fn order_number(&self) -> Option<&str> {
        self.fields.first("trnOrderNumber")
    }

    /// Raw gateway response message.
    pub fn message(&self) -> Option<&str> {
        self.fields.first("responseMessage")
    }

    pub fn cvd_status(&self) -> GatewayResult<Option<&'static str>> {
        lookup_cvd_status(&self.fields)
    }

    pub fn cardholder_message(&self) -> GatewayResult<Option<&str>> {
        lookup_cardholder_message(&self.fields, &self.codes)
    }

    pub fn merchant_message(&self) -> GatewayResult<Option<&str>> {
        lookup_merchant_message(&self.fields, &self.codes)
    }

    /// Profile status (`A`/`C`/`D` on the wire).
    pub fn status(&self) -> GatewayResult<Option<ProfileStatus>> {
        match self.fields.first("status") {
            Some(code) => ProfileStatus::from_code(code).map(Some),
            None => Ok(None),
        }
    }

    pub fn bank_account_type(&self) -> Option<&str> {
        self.fields.first("bankAccountType")
    }

    pub fn card_owner(&self) -> Option<&str> {
        self.fields.first("trnCardOwner")
    }

    pub fn card_number(&self) -> Option<&str> {
        self.fields.first("trnCardNumber")
    }

    /// Expiry month from the stored `MMYY` expiry.
    pub fn expiry_month(&self) -> Option<&str> {
        self.fields
            .first("trnCardExpiry")
            .filter(|v| v.is_ascii() && v.len() >= 2)
            .map(|v| &v[..v.len() - 2])
    }

    /// Expiry year from the stored `MMYY` expiry.
    pub fn expiry_year(&self) -> Option<&str> {
        self.fields
            .first("trnCardExpiry")
            .filter(|v| v.is_ascii() && v.len() >= 2)
            .map(|v| &v[v.len() - 2..])
    }

    /// Reassemble the stored billing address. Fails with `Validation` when
    /// the response is missing required address fields.
    pub fn billing_address(&self) -> GatewayResult<Address> {
        let field = |key: &str| self.fields.first(key).unwrap_or("");

        let mut address = Address::new(
            field("ordName"),
            field("ordEmailAddress"),
            field("ordAddress1"),
            field("ordCity"),
            field("ordProvince"),
            field("ordPostalCode"),
            field("ordCountry"),
        )?;
        if let Some(phone) = self.fields.first("ordPhoneNumber") {
            address = address.with_phone(phone);
        }
        if let Some(address2) = self.fields.first("ordAddress2") {
            address = address.with_address2(address2);
        }
        Ok(address)
    }

    /// Structured failure detail, or `None` for approved responses (and
    /// for failures the gateway attached no detail to).
    pub fn errors(&self) -> GatewayResult<Option<ProfileError>> {
        if self.approved() {
            return Ok(None);
        }

        let Some(response_code) = self.fields.first("responseCode") else {
            return Ok(Some(ProfileError::Message("no response code".into())));
        };

        if response_code == "19" {
            // Field-level detail: parallel lists of messages and wire field
            // names. The trailing <br> leaves one empty message to drop.
            let messages = self
                .fields
                .first("errorMessage")
                .unwrap_or("")
                .split("<br>")
                .filter(|m| !m.is_empty());
            let fields = self
                .fields
                .first("errorFields")
                .unwrap_or("")
                .split(',')
                .filter(|f| !f.is_empty());

            let pairs = fields
                .zip(messages)
                .map(|(field, message)| (profile_field_name(field).to_string(), message.to_string()))
                .collect();
            return Ok(Some(ProfileError::Fields(pairs)));
        }

        if let Some(message) = self.cardholder_message()? {
            return Ok(Some(ProfileError::Message(message.to_string())));
        }

        if let Some(message) = self.fields.first("responseMessage") {
            let message = if message == "DECLINED" {
                "Declined"
            } else {
                message
            };
            return Ok(Some(ProfileError::Message(message.to_string())));
        }

        Ok(None)
    }
}

/// Response to a recurring-billing modification.
///
/// The wire format is a fixed three-field XML fragment; anything else
/// fails closed with a `Format` error rather than returning partial data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyRecurringBillingResponse {
    pub account_id: String,
    pub code: String,
    pub message: String,
}

impl ModifyRecurringBillingResponse {
    pub fn parse(body: &str) -> GatewayResult<Self> {
        let mut reader = Reader::from_str(body);

        let mut account_id = None;
        let mut code = None;
        let mut message = None;

        expect_start(&mut reader, "response")?;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    let slot = match name.as_str() {
                        "accountId" => &mut account_id,
                        "code" => &mut code,
                        "message" => &mut message,
                        other => {
                            return Err(GatewayError::Format(format!(
                                "unexpected element in recurring billing response: {}",
                                other
                            )))
                        }
                    };
                    *slot = Some(read_text_element(&mut reader, &name)?);
                }
                Ok(Event::End(end)) if end.name().as_ref() == b"response" => break,
                Ok(Event::Text(text)) if text_is_blank(&text) => continue,
                Ok(Event::Eof) => {
                    return Err(GatewayError::Format(
                        "unterminated recurring billing response".into(),
                    ))
                }
                Ok(other) => {
                    return Err(GatewayError::Format(format!(
                        "unexpected content in recurring billing response: {:?}",
                        other
                    )))
                }
                Err(e) => {
                    return Err(GatewayError::Format(format!(
                        "invalid recurring billing response: {}",
                        e
                    )))
                }
            }
        }

        let missing = |what: &str| {
            GatewayError::Format(format!("recurring billing response missing {}", what))
        };

        Ok(Self {
            account_id: account_id.ok_or_else(|| missing("accountId"))?,
            code: code.ok_or_else(|| missing("code"))?,
            message: message.ok_or_else(|| missing("message"))?,
        })
    }

    pub fn approved(&self) -> bool {
        self.code == "1"
    }
}

fn text_is_blank(text: &quick_xml::events::BytesText<'_>) -> bool {
    text.iter().all(|b| b.is_ascii_whitespace())
}

fn expect_start(reader: &mut Reader<&[u8]>, expected: &str) -> GatewayResult<()> {
    loop {
        match reader.read_event() {
            Ok(Event::Decl(_)) => continue,
            Ok(Event::Text(text)) if text_is_blank(&text) => continue,
            Ok(Event::Start(start)) if start.name().as_ref() == expected.as_bytes() => {
                return Ok(())
            }
            Ok(other) => {
                return Err(GatewayError::Format(format!(
                    "expected <{}>, found {:?}",
                    expected, other
                )))
            }
            Err(e) => {
                return Err(GatewayError::Format(format!(
                    "invalid recurring billing response: {}",
                    e
                )))
            }
        }
    }
}

/// Read the text content of the element just opened, through its end tag.
fn read_text_element(reader: &mut Reader<&[u8]>, name: &str) -> GatewayResult<String> {
    let mut content = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(text)) => {
                let decoded = text.unescape().map_err(|e| {
                    GatewayError::Format(format!("invalid text in <{}>: {}", name, e))
                })?;
                content.push_str(&decoded);
            }
            Ok(Event::End(end)) if end.name().as_ref() == name.as_bytes() => {
                return Ok(content.trim().to_string())
            }
            Ok(other) => {
                return Err(GatewayError::Format(format!(
                    "unexpected content in <{}>: {:?}",
                    name, other
                )))
            }
            Err(e) => {
                return Err(GatewayError::Format(format!(
                    "invalid recurring billing response: {}",
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes() -> Arc<ResponseCodeTable> {
        Arc::new(
            ResponseCodeTable::new()
                .with_code("1", "Approved", "Transaction approved")
                .with_code("7", "Declined", "Card declined"),
        )
    }

    #[test]
    fn test_parse_key_value_body() {
        let response =
            TransactionResponse::parse("trnApproved=1&trnId=123&authCode=ABC", codes());

        assert!(response.approved());
        assert_eq!(response.transaction_id(), Some("123"));
        assert_eq!(response.auth_code(), Some("ABC"));
    }

    #[test]
    fn test_absent_approval_defaults_to_declined() {
        let response = TransactionResponse::parse("trnId=123", codes());
        assert!(!response.approved());
    }

    #[test]
    fn test_response_code_gates_approval() {
        let response = TransactionResponse::parse("trnApproved=1&responseCode=2", codes());
        assert!(!response.approved());

        let response = TransactionResponse::parse("trnApproved=1&responseCode=1", codes());
        assert!(response.approved());
    }

    #[test]
    fn test_repeated_keys_read_first_value() {
        let fields = ResponseFields::parse("ref1=a&ref1=b");
        assert_eq!(fields.first("ref1"), Some("a"));
        assert_eq!(fields.all("ref1"), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_url_decoding() {
        let fields = ResponseFields::parse("messageText=Approved%20by%20issuer&x=a+b");
        assert_eq!(fields.first("messageText"), Some("Approved by issuer"));
        assert_eq!(fields.first("x"), Some("a b"));
    }

    #[test]
    fn test_cvd_status_policy() {
        let response = TransactionResponse::parse("trnApproved=1&cvdId=1", codes());
        assert_eq!(response.cvd_status().unwrap(), Some("CVD Match"));

        let response = TransactionResponse::parse("trnApproved=1", codes());
        assert_eq!(response.cvd_status().unwrap(), None);

        let response = TransactionResponse::parse("trnApproved=1&cvdId=9", codes());
        assert!(response.cvd_status().is_err());
    }

    #[test]
    fn test_message_lookup_policy() {
        let response = TransactionResponse::parse("trnApproved=1&messageId=1", codes());
        assert_eq!(response.cardholder_message().unwrap(), Some("Approved"));
        assert_eq!(
            response.merchant_message().unwrap(),
            Some("Transaction approved")
        );

        let response = TransactionResponse::parse("trnApproved=1", codes());
        assert_eq!(response.cardholder_message().unwrap(), None);

        let response = TransactionResponse::parse("trnApproved=1&messageId=404", codes());
        assert!(response.cardholder_message().is_err());
    }

    #[test]
    fn test_transaction_datetime() {
        let response =
            TransactionResponse::parse("trnDate=1%2F17%2F2012+11%3A36%3A34+AM", codes());
        let datetime = response.datetime().unwrap().unwrap();
        assert_eq!(datetime.format("%Y-%m-%d %H:%M:%S").to_string(), "2012-01-17 11:36:34");

        let response = TransactionResponse::parse("trnDate=yesterday", codes());
        assert!(response.datetime().is_err());
    }

    #[test]
    fn test_refs() {
        let response = TransactionResponse::parse("ref1=a&ref3=c", codes());
        assert_eq!(response.refs(), [Some("a"), None, Some("c"), None, None]);
    }

    #[test]
    fn test_recurring_account_id() {
        let response = TransactionResponse::parse("trnApproved=1&rbAccountId=2213", codes());
        assert_eq!(response.account_id(), Some("2213"));
    }

    #[test]
    fn test_profile_approved_defaults() {
        // responseCode is required for profile approval; trnApproved
        // defaults open.
        let response = ProfileResponse::parse("responseCode=1", codes());
        assert!(response.approved());

        let response = ProfileResponse::parse("trnApproved=1", codes());
        assert!(!response.approved());

        let response = ProfileResponse::parse("responseCode=1&trnApproved=0", codes());
        assert!(!response.approved());
    }

    #[test]
    fn test_profile_expiry_split() {
        let response = ProfileResponse::parse("responseCode=1&trnCardExpiry=0530", codes());
        assert_eq!(response.expiry_month(), Some("05"));
        assert_eq!(response.expiry_year(), Some("30"));

        let response = ProfileResponse::parse("responseCode=1&trnCardExpiry=5", codes());
        assert_eq!(response.expiry_month(), None);
        assert_eq!(response.expiry_year(), None);
    }

    #[test]
    fn test_profile_status() {
        let response = ProfileResponse::parse("responseCode=1&status=A", codes());
        assert_eq!(response.status().unwrap(), Some(ProfileStatus::Active));

        let response = ProfileResponse::parse("responseCode=1&status=X", codes());
        assert!(response.status().is_err());
    }

    #[test]
    fn test_profile_billing_address_reassembly() {
        let body = "responseCode=1&ordName=John+Doe&ordEmailAddress=j%40example.com\
                    &ordAddress1=123+Fake+Street&ordCity=Fake+City&ordProvince=ON\
                    &ordPostalCode=A1A1A1&ordCountry=CA&ordPhoneNumber=555-555-5555";
        let response = ProfileResponse::parse(body, codes());
        let address = response.billing_address().unwrap();

        assert_eq!(address.name(), "John Doe");
        assert_eq!(address.phone(), Some("555-555-5555"));
        assert_eq!(address.province(), "ON");
    }

    #[test]
    fn test_profile_billing_address_missing_fields_fails() {
        let response = ProfileResponse::parse("responseCode=1&ordName=John+Doe", codes());
        assert!(response.billing_address().is_err());
    }

    #[test]
    fn test_profile_errors_field_level() {
        let body = "responseCode=19&trnApproved=0\
                    &errorMessage=Name+is+missing%3Cbr%3EBad+postal+code%3Cbr%3E\
                    &errorFields=ordName%2CordPostalCode";
        let response = ProfileResponse::parse(body, codes());

        let errors = response.errors().unwrap().unwrap();
        assert_eq!(
            errors,
            ProfileError::Fields(vec![
                ("name".to_string(), "Name is missing".to_string()),
                ("zip/postal code".to_string(), "Bad postal code".to_string()),
            ])
        );
    }

    #[test]
    fn test_profile_errors_message_paths() {
        let response = ProfileResponse::parse("responseCode=7&messageId=7", codes());
        assert_eq!(
            response.errors().unwrap(),
            Some(ProfileError::Message("Declined".to_string()))
        );

        let response =
            ProfileResponse::parse("responseCode=2&responseMessage=DECLINED", codes());
        assert_eq!(
            response.errors().unwrap(),
            Some(ProfileError::Message("Declined".to_string()))
        );

        let response = ProfileResponse::parse("trnApproved=0", codes());
        assert_eq!(
            response.errors().unwrap(),
            Some(ProfileError::Message("no response code".to_string()))
        );
    }

    #[test]
    fn test_profile_errors_none_when_approved() {
        let response = ProfileResponse::parse("responseCode=1", codes());
        assert_eq!(response.errors().unwrap(), None);
    }

    #[test]
    fn test_modify_recurring_xml_parses() {
        let body = "<response><accountId>2213</accountId><code>1</code>\
                    <message>Request successful</message></response>";
        let response = ModifyRecurringBillingResponse::parse(body).unwrap();

        assert_eq!(response.account_id, "2213");
        assert_eq!(response.code, "1");
        assert_eq!(response.message, "Request successful");
        assert!(response.approved());
    }

    #[test]
    fn test_modify_recurring_xml_any_field_order() {
        let body = "<response>\n  <code>2</code>\n  <message>Declined</message>\n  \
                    <accountId>9</accountId>\n</response>";
        let response = ModifyRecurringBillingResponse::parse(body).unwrap();
        assert!(!response.approved());
        assert_eq!(response.account_id, "9");
    }

    #[test]
    fn test_modify_recurring_xml_fails_closed() {
        // Missing field
        assert!(ModifyRecurringBillingResponse::parse(
            "<response><code>1</code><message>ok</message></response>"
        )
        .is_err());
        // Unknown element
        assert!(ModifyRecurringBillingResponse::parse(
            "<response><accountId>1</accountId><code>1</code><message>ok</message>\
             <extra>x</extra></response>"
        )
        .is_err());
        // Wrong root
        assert!(ModifyRecurringBillingResponse::parse("<resp><code>1</code></resp>").is_err());
        // Not XML at all
        assert!(ModifyRecurringBillingResponse::parse("trnApproved=1").is_err());
        // Truncated
        assert!(ModifyRecurringBillingResponse::parse(
            "<response><accountId>1</accountId>"
        )
        .is_err());
    }
}
