//! # Gateway Configuration
//!
//! Immutable merchant configuration. Everything the upstream integrations
//! kept as mutable global toggles lives here as an explicit value,
//! validated when it is built and read-only afterwards.
//!
//! Configuration can be assembled programmatically, loaded from
//! environment variables, or parsed from TOML. All three paths run the
//! same validation: hash and username/password validation are mutually
//! exclusive, and whichever is enabled must carry its secrets.

use bean_core::{GatewayError, GatewayResult};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Production gateway host; override with `with_base_url` for testing.
pub const DEFAULT_BASE_URL: &str = "https://www.beanstream.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Digest algorithm for hash validation. The gateway accepts exactly
/// these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
}

impl HashAlgorithm {
    /// Parse the operator-supplied algorithm name; must be exactly `MD5`
    /// or `SHA1`.
    pub fn parse(name: &str) -> GatewayResult<Self> {
        match name {
            "MD5" => Ok(HashAlgorithm::Md5),
            "SHA1" => Ok(HashAlgorithm::Sha1),
            other => Err(GatewayError::Configuration(format!(
                "hash algorithm must be one of MD5, SHA1: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA1",
        }
    }
}

/// How requests prove themselves to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationMode {
    /// Merchant id only; no per-request credential.
    None,
    /// Digest over the encoded body, appended as `hashValue`.
    Hash {
        hashcode: String,
        algorithm: HashAlgorithm,
    },
    /// Plain `username`/`password` fields on every request.
    Password { username: String, password: String },
}

impl ValidationMode {
    pub fn is_none(&self) -> bool {
        matches!(self, ValidationMode::None)
    }
}

/// Login block for the reporting endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportLogin {
    pub company: String,
    pub user: String,
    pub password: String,
}

/// Immutable gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub merchant_id: String,
    pub validation: ValidationMode,
    pub require_cvd: bool,
    pub require_billing_address: bool,
    pub payment_profile_passcode: Option<String>,
    pub report_login: Option<ReportLogin>,
    pub base_url: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Create a configuration with no per-request validation and default
    /// endpoints.
    pub fn new(merchant_id: impl Into<String>) -> GatewayResult<Self> {
        let merchant_id = merchant_id.into();
        if merchant_id.is_empty() {
            return Err(GatewayError::Configuration(
                "merchant id must be specified".into(),
            ));
        }

        Ok(Self {
            merchant_id,
            validation: ValidationMode::None,
            require_cvd: false,
            require_billing_address: false,
            payment_profile_passcode: None,
            report_login: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Builder: enable hash validation. Fails if another validation mode
    /// is already enabled or the hashcode is empty.
    pub fn with_hash_validation(
        mut self,
        hashcode: impl Into<String>,
        algorithm: HashAlgorithm,
    ) -> GatewayResult<Self> {
        if !self.validation.is_none() {
            return Err(GatewayError::Configuration(
                "Only one validation method may be specified".into(),
            ));
        }
        let hashcode = hashcode.into();
        if hashcode.is_empty() {
            return Err(GatewayError::Configuration(
                "hashcode and algorithm must be specified".into(),
            ));
        }
        self.validation = ValidationMode::Hash {
            hashcode,
            algorithm,
        };
        Ok(self)
    }

    /// Builder: enable username/password validation. Fails if another
    /// validation mode is already enabled or either credential is empty.
    pub fn with_password_validation(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> GatewayResult<Self> {
        if !self.validation.is_none() {
            return Err(GatewayError::Configuration(
                "Only one validation method may be specified".into(),
            ));
        }
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(GatewayError::Configuration(
                "username and password must be specified".into(),
            ));
        }
        self.validation = ValidationMode::Password { username, password };
        Ok(self)
    }

    /// Builder: require CVD on every card.
    pub fn with_require_cvd(mut self, require: bool) -> Self {
        self.require_cvd = require;
        self
    }

    /// Builder: require a billing address on purchases.
    pub fn with_require_billing_address(mut self, require: bool) -> Self {
        self.require_billing_address = require;
        self
    }

    /// Builder: passcode for the payment-profile endpoints.
    pub fn with_payment_profile_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.payment_profile_passcode = Some(passcode.into());
        self
    }

    /// Builder: login block for the reporting endpoints.
    pub fn with_report_login(
        mut self,
        company: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.report_login = Some(ReportLogin {
            company: company.into(),
            user: user.into(),
            password: password.into(),
        });
        self
    }

    /// Builder: set a custom gateway base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder: set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `BEANSTREAM_MERCHANT_ID`
    ///
    /// Optional:
    /// - `BEANSTREAM_HASHCODE` + `BEANSTREAM_HASH_ALGORITHM` (hash validation)
    /// - `BEANSTREAM_USERNAME` + `BEANSTREAM_PASSWORD` (password validation)
    /// - `BEANSTREAM_REQUIRE_CVD`, `BEANSTREAM_REQUIRE_BILLING_ADDRESS`
    /// - `BEANSTREAM_PROFILE_PASSCODE`
    /// - `BEANSTREAM_REPORT_COMPANY` / `_REPORT_USER` / `_REPORT_PASSWORD`
    /// - `BEANSTREAM_BASE_URL`
    pub fn from_env() -> GatewayResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let raw = RawConfig {
            merchant_id: env::var("BEANSTREAM_MERCHANT_ID").map_err(|_| {
                GatewayError::Configuration("BEANSTREAM_MERCHANT_ID not set".to_string())
            })?,
            hashcode: env::var("BEANSTREAM_HASHCODE").ok(),
            hash_algorithm: env::var("BEANSTREAM_HASH_ALGORITHM").ok(),
            username: env::var("BEANSTREAM_USERNAME").ok(),
            password: env::var("BEANSTREAM_PASSWORD").ok(),
            require_cvd: env_flag("BEANSTREAM_REQUIRE_CVD"),
            require_billing_address: env_flag("BEANSTREAM_REQUIRE_BILLING_ADDRESS"),
            payment_profile_passcode: env::var("BEANSTREAM_PROFILE_PASSCODE").ok(),
            report_login: match (
                env::var("BEANSTREAM_REPORT_COMPANY").ok(),
                env::var("BEANSTREAM_REPORT_USER").ok(),
                env::var("BEANSTREAM_REPORT_PASSWORD").ok(),
            ) {
                (Some(company), Some(user), Some(password)) => Some(ReportLogin {
                    company,
                    user,
                    password,
                }),
                _ => None,
            },
            base_url: env::var("BEANSTREAM_BASE_URL").ok(),
            timeout_secs: None,
        };

        raw.assemble()
    }

    /// Load configuration from a TOML document.
    ///
    /// ```toml
    /// merchant_id = "300200578"
    /// hashcode = "ABCDEF"
    /// hash_algorithm = "SHA1"
    /// require_cvd = true
    ///
    /// [report_login]
    /// company = "acme"
    /// user = "reports"
    /// password = "secret"
    /// ```
    pub fn from_toml(toml_str: &str) -> GatewayResult<Self> {
        let raw: RawConfig = toml::from_str(toml_str)
            .map_err(|e| GatewayError::Configuration(format!("invalid config: {}", e)))?;
        raw.assemble()
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes")
    )
}

/// Deserialization mirror; `assemble` applies the validation rules shared
/// by every loading path.
#[derive(Debug, Deserialize)]
struct RawConfig {
    merchant_id: String,
    hashcode: Option<String>,
    hash_algorithm: Option<String>,
    username: Option<String>,
    password: Option<String>,
    #[serde(default)]
    require_cvd: bool,
    #[serde(default)]
    require_billing_address: bool,
    payment_profile_passcode: Option<String>,
    report_login: Option<ReportLogin>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl RawConfig {
    fn assemble(self) -> GatewayResult<GatewayConfig> {
        let wants_hash = self.hashcode.is_some() || self.hash_algorithm.is_some();
        let wants_password = self.username.is_some() || self.password.is_some();

        if wants_hash && wants_password {
            return Err(GatewayError::Configuration(
                "Only one validation method may be specified".into(),
            ));
        }

        let mut config = GatewayConfig::new(self.merchant_id)?;

        if wants_hash {
            let hashcode = self.hashcode.ok_or_else(|| {
                GatewayError::Configuration("hashcode and algorithm must be specified".into())
            })?;
            let algorithm = self.hash_algorithm.ok_or_else(|| {
                GatewayError::Configuration("hashcode and algorithm must be specified".into())
            })?;
            config = config.with_hash_validation(hashcode, HashAlgorithm::parse(&algorithm)?)?;
        }

        if wants_password {
            let username = self.username.ok_or_else(|| {
                GatewayError::Configuration("username and password must be specified".into())
            })?;
            let password = self.password.ok_or_else(|| {
                GatewayError::Configuration("username and password must be specified".into())
            })?;
            config = config.with_password_validation(username, password)?;
        }

        config = config
            .with_require_cvd(self.require_cvd)
            .with_require_billing_address(self.require_billing_address);

        if let Some(passcode) = self.payment_profile_passcode {
            config = config.with_payment_profile_passcode(passcode);
        }
        if let Some(login) = self.report_login {
            config.report_login = Some(login);
        }
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
