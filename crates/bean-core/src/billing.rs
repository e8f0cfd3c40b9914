//! # Billing Field Models
//!
//! Cardholder and address data, validated at construction and flattened
//! into the gateway's wire field vocabulary.

use crate::error::{GatewayError, GatewayResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A credit card, validated at construction.
///
/// Expiry is normalized to the gateway's `MM` / `YY` convention by
/// anchoring to the last calendar day of the expiry month; an invalid
/// month/year combination fails construction instead of wrapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    name: String,
    number: String,
    exp_month: String,
    exp_year: String,
    cvd: Option<String>,
}

impl CreditCard {
    /// Create a credit card.
    ///
    /// # Arguments
    /// * `name` - the owner of the card, as displayed on the card itself
    /// * `number` - the card number
    /// * `exp_month` - month of expiry, 1-indexed
    /// * `exp_year` - 4-digit year of expiry
    pub fn new(
        name: impl Into<String>,
        number: impl Into<String>,
        exp_month: u32,
        exp_year: i32,
    ) -> GatewayResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(GatewayError::Validation(
                "Name must be specified in credit card".into(),
            ));
        }

        let number = number.into();
        if number.is_empty() {
            return Err(GatewayError::Validation(
                "Number must be specified in credit card".into(),
            ));
        }

        let expiry = last_day_of_month(exp_year, exp_month)?;

        Ok(Self {
            name,
            number,
            exp_month: expiry.format("%m").to_string(),
            exp_year: expiry.format("%y").to_string(),
            cvd: None,
        })
    }

    /// Builder: attach the card verification digits.
    pub fn with_cvd(mut self, cvd: impl Into<String>) -> Self {
        let cvd = cvd.into();
        self.cvd = if cvd.is_empty() { None } else { Some(cvd) };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Normalized 2-digit expiry month, `"01"`..`"12"`.
    pub fn exp_month(&self) -> &str {
        &self.exp_month
    }

    /// Normalized 2-digit expiry year (year mod 100).
    pub fn exp_year(&self) -> &str {
        &self.exp_year
    }

    pub fn has_cvd(&self) -> bool {
        self.cvd.is_some()
    }

    /// Flat wire-field mapping for embedding into a request. Absent CVD is
    /// omitted rather than sent as an empty string.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("trnCardOwner".to_string(), self.name.clone()),
            ("trnCardNumber".to_string(), self.number.clone()),
            ("trnExpMonth".to_string(), self.exp_month.clone()),
            ("trnExpYear".to_string(), self.exp_year.clone()),
        ];
        if let Some(cvd) = &self.cvd {
            params.push(("trnCardCvd".to_string(), cvd.clone()));
        }
        params
    }
}

/// Last calendar day of the given month, or a validation error for an
/// impossible month/year combination.
fn last_day_of_month(year: i32, month: u32) -> GatewayResult<NaiveDate> {
    let invalid = || {
        GatewayError::Validation(format!(
            "invalid credit card expiry: month {} year {}",
            month, year
        ))
    };

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_month = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        m => NaiveDate::from_ymd_opt(year, m + 1, 1),
    }
    .ok_or_else(invalid)?;

    next_month.pred_opt().ok_or_else(invalid)
}

/// A billing or shipping address, validated at construction.
///
/// Name, email, first address line, city, province, postal code and
/// country are required; province and country must be exactly two
/// characters. Phone and the second address line are optional and are
/// omitted from the wire params when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    name: String,
    email: String,
    phone: Option<String>,
    address1: String,
    address2: Option<String>,
    city: String,
    province: String,
    postal_code: String,
    country: String,
}

impl Address {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        address1: impl Into<String>,
        city: impl Into<String>,
        province: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> GatewayResult<Self> {
        let name = required(name, "Name")?;
        let email = required(email, "Email")?;
        let address1 = required(address1, "Address1")?;
        let city = required(city, "City")?;

        let province = required(province, "Province/state")?;
        if province.chars().count() != 2 {
            return Err(GatewayError::Validation(format!(
                "Malformed province/state code: {}",
                province
            )));
        }

        let postal_code = required(postal_code, "Postal code")?;

        let country = required(country, "Country code")?;
        if country.chars().count() != 2 {
            return Err(GatewayError::Validation(format!(
                "Malformed country code: {}",
                country
            )));
        }

        Ok(Self {
            name,
            email,
            phone: None,
            address1,
            address2: None,
            city,
            province,
            postal_code,
            country,
        })
    }

    /// Builder: attach a phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        let phone = phone.into();
        self.phone = if phone.is_empty() { None } else { Some(phone) };
        self
    }

    /// Builder: attach a second address line.
    pub fn with_address2(mut self, address2: impl Into<String>) -> Self {
        let address2 = address2.into();
        self.address2 = if address2.is_empty() {
            None
        } else {
            Some(address2)
        };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address1(&self) -> &str {
        &self.address1
    }

    pub fn address2(&self) -> Option<&str> {
        self.address2.as_deref()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Flat wire-field mapping under the given key prefix (`ord` for
    /// billing fields, `shipping` variants in reports use their own
    /// prefix). Absent optional fields are omitted.
    pub fn params(&self, key_prefix: &str) -> Vec<(String, String)> {
        let mut params = vec![
            (format!("{}Name", key_prefix), self.name.clone()),
            (format!("{}EmailAddress", key_prefix), self.email.clone()),
            (format!("{}Address1", key_prefix), self.address1.clone()),
            (format!("{}City", key_prefix), self.city.clone()),
            (format!("{}Province", key_prefix), self.province.clone()),
            (format!("{}PostalCode", key_prefix), self.postal_code.clone()),
            (format!("{}Country", key_prefix), self.country.clone()),
        ];
        if let Some(phone) = &self.phone {
            params.push((format!("{}PhoneNumber", key_prefix), phone.clone()));
        }
        if let Some(address2) = &self.address2 {
            params.push((format!("{}Address2", key_prefix), address2.clone()));
        }
        params
    }
}

fn required(value: impl Into<String>, what: &str) -> GatewayResult<String> {
    let value = value.into();
    if value.is_empty() {
        return Err(GatewayError::Validation(format!(
            "{} must be specified in address",
            what
        )));
    }
    Ok(value)
}
