//! # Reports
//!
//! Tab-delimited report downloads: transaction reports (optionally
//! filtered to an id set) and credit card lookups. The first response
//! line is a column header; every following non-blank line must split on
//! tabs into exactly the schema's arity, or the whole parse fails.

use crate::config::GatewayConfig;
use crate::transaction::{Endpoint, Transaction, TransactionKind};
use bean_core::{
    transaction_type_label, Address, BoxedTransport, GatewayError, GatewayResult,
    ResponseCodeTable,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Column count of a transaction report row.
const TRANSACTION_REPORT_ARITY: usize = 41;

/// Column count of a credit card lookup row.
const CARD_LOOKUP_ARITY: usize = 11;

/// Card type codes the transaction report filter accepts.
const CARD_TYPES: &[&str] = &["VI", "MC", "NN", "AM", "DI", "CB", "JB"];

/// Split a tab-delimited body into rows of exactly `arity` fields.
/// A field that is empty or the single NUL character parses as `None`.
fn parse_rows(body: &str, arity: usize) -> GatewayResult<Vec<Vec<Option<String>>>> {
    let mut rows = Vec::new();
    // The first line is the column header.
    for line in body.split("\r\n").skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != arity {
            return Err(GatewayError::Format(format!(
                "unexpected report row format: {}",
                line
            )));
        }
        rows.push(
            fields
                .into_iter()
                .map(|field| match field {
                    "" | "\0" => None,
                    other => Some(other.to_string()),
                })
                .collect(),
        );
    }
    Ok(rows)
}

/// Consolidate the nine address sub-columns starting at `start` into an
/// `Address` when both name and email are present.
fn consolidate_address(
    row: &[Option<String>],
    start: usize,
) -> GatewayResult<Option<Address>> {
    // Sub-columns: name, email, phone, address1, address2, city,
    // province, postal, country.
    let get = |offset: usize| row[start + offset].as_deref();

    let (Some(name), Some(email)) = (get(0), get(1)) else {
        return Ok(None);
    };

    let mut address = Address::new(
        name,
        email,
        get(3).unwrap_or(""),
        get(5).unwrap_or(""),
        get(6).unwrap_or(""),
        get(7).unwrap_or(""),
        get(8).unwrap_or(""),
    )?;
    if let Some(phone) = get(2) {
        address = address.with_phone(phone);
    }
    if let Some(address2) = get(4) {
        address = address.with_address2(address2);
    }
    Ok(Some(address))
}

/// One row of a transaction report, with address sub-fields consolidated
/// and the transaction type mapped to its human label.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub merchant_id: Option<String>,
    pub merchant_name: Option<String>,
    pub transaction_id: Option<String>,
    pub transaction_datetime: Option<String>,
    pub card_owner: Option<String>,
    pub ip: Option<String>,
    pub transaction_type: Option<String>,
    pub amount: Option<String>,
    pub original_amount: Option<String>,
    pub returns: Option<String>,
    pub order_number: Option<String>,
    pub batch_number: Option<String>,
    pub auth_code: Option<String>,
    pub card_type: Option<String>,
    pub adjustment_to: Option<String>,
    pub response: Option<String>,
    pub message_id: Option<String>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub eci: Option<String>,
    pub eft_rejected: Option<String>,
    pub eft_returned: Option<String>,
    pub avs_response: Option<String>,
    pub cvd_response: Option<String>,
    pub currency: Option<String>,
}

impl TransactionRecord {
    fn from_row(mut row: Vec<Option<String>>) -> GatewayResult<Self> {
        let billing_address = consolidate_address(&row, 17)?;
        let shipping_address = consolidate_address(&row, 26)?;

        let transaction_type = match row[6].take() {
            Some(code) => Some(transaction_type_label(&code)?.to_string()),
            None => None,
        };

        Ok(Self {
            merchant_id: row[0].take(),
            merchant_name: row[1].take(),
            transaction_id: row[2].take(),
            transaction_datetime: row[3].take(),
            card_owner: row[4].take(),
            ip: row[5].take(),
            transaction_type,
            amount: row[7].take(),
            original_amount: row[8].take(),
            returns: row[9].take(),
            order_number: row[10].take(),
            batch_number: row[11].take(),
            auth_code: row[12].take(),
            card_type: row[13].take(),
            adjustment_to: row[14].take(),
            response: row[15].take(),
            message_id: row[16].take(),
            billing_address,
            shipping_address,
            eci: row[35].take(),
            eft_rejected: row[36].take(),
            eft_returned: row[37].take(),
            avs_response: row[38].take(),
            cvd_response: row[39].take(),
            currency: row[40].take(),
        })
    }
}

/// Parsed transaction report.
#[derive(Debug, Clone, Default)]
pub struct TransactionReportResponse {
    records: Vec<TransactionRecord>,
}

impl TransactionReportResponse {
    fn parse(body: &str) -> GatewayResult<Self> {
        let records = parse_rows(body, TRANSACTION_REPORT_ARITY)?
            .into_iter()
            .map(TransactionRecord::from_row)
            .collect::<GatewayResult<Vec<_>>>()?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for TransactionReportResponse {
    type Item = TransactionRecord;
    type IntoIter = std::vec::IntoIter<TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

fn seed_report_params(txn: &mut Transaction) -> GatewayResult<()> {
    let config = txn.config();
    let merchant_id = config.merchant_id.clone();
    let login = config.report_login.clone().ok_or_else(|| {
        GatewayError::Configuration("report login must be specified to run reports".into())
    })?;

    txn.insert("merchantId", merchant_id);
    txn.insert("loginCompany", login.company);
    txn.insert("loginUser", login.user);
    txn.insert("loginPass", login.password);

    txn.insert("rptFormat", "TAB");
    txn.insert("rspFormat", "NVP");
    txn.insert("rptTarget", "INLINE");
    Ok(())
}

/// Download transaction details over an id range, date range or batch.
#[derive(Debug)]
pub struct TransactionReport {
    txn: Transaction,
}

impl TransactionReport {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
    ) -> GatewayResult<Self> {
        let mut txn = Transaction::new(
            config,
            transport,
            codes,
            TransactionKind::TransactionReport,
            Endpoint::ReportDownload,
        );
        seed_report_params(&mut txn)?;
        txn.insert("rptVersion", "1.6");
        txn.insert("rptNoFile", "1");
        Ok(Self { txn })
    }

    pub fn set_transaction_range(&mut self, start: &str, end: &str) {
        self.txn.insert("rptRange", "1");
        self.txn.insert("rptIdStart", start);
        self.txn.insert("rptIdEnd", end);
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.txn.insert("rptStartYear", start.format("%Y").to_string());
        self.txn.insert("rptStartMonth", start.format("%m").to_string());
        self.txn.insert("rptStartDay", start.format("%d").to_string());

        self.txn.insert("rptEndYear", end.format("%Y").to_string());
        self.txn.insert("rptEndMonth", end.format("%m").to_string());
        self.txn.insert("rptEndDay", end.format("%d").to_string());
    }

    pub fn set_batch_number(&mut self, batch_number: impl Into<String>) {
        self.txn.insert("rptBatchNumber", batch_number);
    }

    /// Filter by approval status. Requesting neither approved nor
    /// declined rows is ignored with a warning.
    pub fn set_status(&mut self, approved: bool, declined: bool) {
        match (approved, declined) {
            (false, false) => {
                warn!("weird status request for not approved and not declined; ignoring");
            }
            (true, true) => self.txn.insert("rptStatus", "0"),
            (true, false) => self.txn.insert("rptStatus", "1"),
            (false, true) => self.txn.insert("rptStatus", "2"),
        }
    }

    /// Filter by card type code (`VI`, `MC`, ...). Unrecognized codes are
    /// passed through with a warning.
    pub fn set_card_type(&mut self, card_type: &str) {
        if !CARD_TYPES.contains(&card_type) {
            warn!("unexpected card type: {}", card_type);
        }
        self.txn.insert("rptCardType", card_type);
    }

    /// Filter by settlement source. Requesting neither credit card nor
    /// direct payment rows is ignored with a warning.
    pub fn set_transaction_types(&mut self, credit_card: bool, direct_payment: bool) {
        match (credit_card, direct_payment) {
            (false, false) => {
                warn!("weird transaction type request for not credit card and not direct payment; ignoring");
            }
            (true, true) => self.txn.insert("rptTransTypes", "3"),
            (true, false) => self.txn.insert("rptTransTypes", "1"),
            (false, true) => self.txn.insert("rptTransTypes", "2"),
        }
    }

    pub fn set_include_refs(&mut self, include_refs: bool) {
        if include_refs {
            self.txn.insert("rptRef", "1");
        } else {
            self.txn.params_mut().remove("rptRef");
        }
    }

    #[instrument(skip(self), fields(order_number = %self.txn.order_number()))]
    pub async fn commit(self) -> GatewayResult<TransactionReportResponse> {
        let body = self.txn.commit_raw().await?;
        TransactionReportResponse::parse(&body)
    }
}

/// Fetch details for a specific set of transaction ids: requests the id
/// range covering the set, then filters out everything not asked for.
#[derive(Debug)]
pub struct TransactionSetReport {
    report: TransactionReport,
    transaction_ids: Vec<String>,
}

impl TransactionSetReport {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
        transaction_ids: Vec<String>,
    ) -> GatewayResult<Self> {
        let mut ids = transaction_ids;
        ids.sort();

        let first = ids.first().cloned().ok_or_else(|| {
            GatewayError::Validation("transaction id set must not be empty".into())
        })?;
        let last = ids.last().cloned().ok_or_else(|| {
            GatewayError::Validation("transaction id set must not be empty".into())
        })?;

        let mut report = TransactionReport::new(config, transport, codes)?;
        report.set_transaction_range(&first, &last);

        Ok(Self {
            report,
            transaction_ids: ids,
        })
    }

    #[instrument(skip(self))]
    pub async fn commit(self) -> GatewayResult<TransactionReportResponse> {
        let wanted: HashSet<String> = self.transaction_ids.into_iter().collect();
        let response = self.report.commit().await?;

        let records = response
            .into_records()
            .into_iter()
            .filter(|record| {
                record
                    .transaction_id
                    .as_deref()
                    .is_some_and(|id| wanted.contains(id))
            })
            .collect();

        Ok(TransactionReportResponse { records })
    }
}

/// One row of a credit card lookup report.
#[derive(Debug, Clone, Serialize)]
pub struct CardLookupRecord {
    pub transaction_id: Option<String>,
    pub date: Option<String>,
    pub source_ip: Option<String>,
    pub amount: Option<String>,
    pub type_id: Option<String>,
    pub type_name: Option<String>,
    pub card_type: Option<String>,
    pub card_expiry: Option<String>,
    pub order_id: Option<String>,
    pub batch_number: Option<String>,
    pub status: Option<String>,
}

impl CardLookupRecord {
    fn from_row(mut row: Vec<Option<String>>) -> Self {
        Self {
            transaction_id: row[0].take(),
            date: row[1].take(),
            source_ip: row[2].take(),
            amount: row[3].take(),
            type_id: row[4].take(),
            type_name: row[5].take(),
            card_type: row[6].take(),
            card_expiry: row[7].take(),
            order_id: row[8].take(),
            batch_number: row[9].take(),
            status: row[10].take(),
        }
    }
}

/// Parsed credit card lookup report.
#[derive(Debug, Clone, Default)]
pub struct CardLookupResponse {
    records: Vec<CardLookupRecord>,
}

impl CardLookupResponse {
    fn parse(body: &str) -> GatewayResult<Self> {
        let records = parse_rows(body, CARD_LOOKUP_ARITY)?
            .into_iter()
            .map(CardLookupRecord::from_row)
            .collect();
        Ok(Self { records })
    }

    pub fn records(&self) -> &[CardLookupRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for CardLookupResponse {
    type Item = CardLookupRecord;
    type IntoIter = std::vec::IntoIter<CardLookupRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Search transactions by card number or transaction id.
pub struct CreditCardLookupReport {
    txn: Transaction,
}

impl CreditCardLookupReport {
    pub(crate) fn new(
        config: Arc<GatewayConfig>,
        transport: BoxedTransport,
        codes: Arc<ResponseCodeTable>,
    ) -> GatewayResult<Self> {
        let mut txn = Transaction::new(
            config,
            transport,
            codes,
            TransactionKind::CardLookupReport,
            Endpoint::Report,
        );
        seed_report_params(&mut txn)?;
        txn.insert("rptAPIVersion", "1.0");
        txn.insert("rptType", "SEARCH");
        Ok(Self { txn })
    }

    pub fn set_transaction_id(&mut self, transaction_id: &str) {
        self.txn.insert("rptTransId", transaction_id);
    }

    pub fn set_credit_card_number(&mut self, credit_card_number: &str) {
        self.txn.insert("rptCcNumber", credit_card_number);
    }

    pub fn set_datetime_range(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
        self.txn.insert("rptStartYear", start.format("%Y").to_string());
        self.txn.insert("rptStartMonth", start.format("%m").to_string());
        self.txn.insert("rptStartDay", start.format("%d").to_string());
        self.txn.insert("rptStartHour", start.format("%H").to_string());
        self.txn.insert("rptStartMin", start.format("%M").to_string());
        self.txn.insert("rptStartSec", start.format("%S").to_string());

        self.txn.insert("rptEndYear", end.format("%Y").to_string());
        self.txn.insert("rptEndMonth", end.format("%m").to_string());
        self.txn.insert("rptEndDay", end.format("%d").to_string());
        self.txn.insert("rptEndHour", end.format("%H").to_string());
        self.txn.insert("rptEndMin", end.format("%M").to_string());
        self.txn.insert("rptEndSec", end.format("%S").to_string());
    }

    /// Filter by approval status. Asking for both clears the filter;
    /// asking for neither is ignored with a warning.
    pub fn set_status(&mut self, approved: bool, declined: bool) {
        match (approved, declined) {
            (false, false) => {
                warn!("weird status request for not approved and not declined; ignoring");
            }
            (true, true) => {
                self.txn.params_mut().remove("rptTransStatus");
            }
            (true, false) => self.txn.insert("rptTransStatus", "1"),
            (false, true) => self.txn.insert("rptTransStatus", "2"),
        }
    }

    #[instrument(skip(self), fields(order_number = %self.txn.order_number()))]
    pub async fn commit(self) -> GatewayResult<CardLookupResponse> {
        let body = self.txn.commit_raw().await?;
        CardLookupResponse::parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Gateway;
    use crate::testutil::StaticTransport;

    /// Build a transaction report row with the given overrides.
    fn report_row(overrides: &[(usize, &str)]) -> String {
        let mut fields = vec![""; TRANSACTION_REPORT_ARITY];
        for (idx, value) in overrides {
            fields[*idx] = value;
        }
        fields.join("\t")
    }

    fn report_body(rows: &[String]) -> String {
        let mut lines = vec!["header line".to_string()];
        lines.extend(rows.iter().cloned());
        lines.push(String::new());
        lines.join("\r\n")
    }

    fn report_gateway(transport: Arc<StaticTransport>) -> Gateway {
        let config = GatewayConfig::new("300200578")
            .unwrap()
            .with_report_login("acme", "reports", "secret");
        Gateway::new(config).unwrap().with_transport(transport)
    }

    #[tokio::test]
    async fn test_report_login_required() {
        let transport = Arc::new(StaticTransport::ok(""));
        let gateway = Gateway::new(GatewayConfig::new("300200578").unwrap())
            .unwrap()
            .with_transport(transport);

        let err = gateway.transaction_report().unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_report_wire_fields() {
        let body = report_body(&[]);
        let transport = Arc::new(StaticTransport::ok(body));
        let gateway = report_gateway(transport.clone());

        let mut report = gateway.transaction_report().unwrap();
        report.set_date_range(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );
        report.set_status(true, false);
        report.set_card_type("VI");
        report.set_transaction_types(true, false);
        report.set_include_refs(true);

        let response = report.commit().await.unwrap();
        assert!(response.is_empty());

        let (url, sent) = transport.sent().pop().unwrap();
        assert!(url.ends_with("/scripts/report_download.asp"));
        assert!(sent.contains("merchantId=300200578"));
        assert!(sent.contains("loginCompany=acme"));
        assert!(sent.contains("loginUser=reports"));
        assert!(sent.contains("loginPass=secret"));
        assert!(sent.contains("rptFormat=TAB"));
        assert!(sent.contains("rspFormat=NVP"));
        assert!(sent.contains("rptTarget=INLINE"));
        assert!(sent.contains("rptVersion=1.6"));
        assert!(sent.contains("rptNoFile=1"));
        assert!(sent.contains("rptStartYear=2026"));
        assert!(sent.contains("rptEndDay=31"));
        assert!(sent.contains("rptStatus=1"));
        assert!(sent.contains("rptCardType=VI"));
        assert!(sent.contains("rptTransTypes=1"));
        assert!(sent.contains("rptRef=1"));
    }

    #[tokio::test]
    async fn test_report_rows_parse_into_records() {
        let row = report_row(&[
            (0, "300200578"),
            (2, "10000001"),
            (6, "P"),
            (7, "50.00"),
            (17, "John Doe"),
            (18, "john.doe@example.com"),
            (20, "123 Fake Street"),
            (22, "Fake City"),
            (23, "ON"),
            (24, "A1A1A1"),
            (25, "CA"),
            (40, "CAD"),
        ]);
        let body = report_body(&[row]);
        let transport = Arc::new(StaticTransport::ok(body));
        let gateway = report_gateway(transport.clone());

        let report = gateway.transaction_report().unwrap();
        let response = report.commit().await.unwrap();
        assert_eq!(response.len(), 1);

        let record = &response.records()[0];
        assert_eq!(record.transaction_id.as_deref(), Some("10000001"));
        assert_eq!(record.transaction_type.as_deref(), Some("purchase"));
        assert_eq!(record.amount.as_deref(), Some("50.00"));
        assert_eq!(record.currency.as_deref(), Some("CAD"));

        let billing = record.billing_address.as_ref().unwrap();
        assert_eq!(billing.name(), "John Doe");
        assert_eq!(billing.province(), "ON");
        assert!(record.shipping_address.is_none());
    }

    #[tokio::test]
    async fn test_wrong_column_count_is_a_format_error() {
        let body = format!("header\r\n{}\r\n", ["a", "b", "c"].join("\t"));
        let transport = Arc::new(StaticTransport::ok(body));
        let gateway = report_gateway(transport.clone());

        let report = gateway.transaction_report().unwrap();
        let err = report.commit().await.unwrap_err();
        assert!(matches!(err, GatewayError::Format(_)));
    }

    #[tokio::test]
    async fn test_nul_fields_are_none() {
        let row = report_row(&[(2, "10000001"), (4, "\0")]);
        let body = report_body(&[row]);
        let transport = Arc::new(StaticTransport::ok(body));
        let gateway = report_gateway(transport.clone());

        let response = gateway
            .transaction_report()
            .unwrap()
            .commit()
            .await
            .unwrap();
        assert!(response.records()[0].card_owner.is_none());
    }

    #[tokio::test]
    async fn test_unknown_transaction_type_is_a_format_error() {
        let row = report_row(&[(6, "ZZ")]);
        let body = report_body(&[row]);
        let transport = Arc::new(StaticTransport::ok(body));
        let gateway = report_gateway(transport.clone());

        let report = gateway.transaction_report().unwrap();
        assert!(matches!(
            report.commit().await.unwrap_err(),
            GatewayError::Format(_)
        ));
    }

    #[tokio::test]
    async fn test_set_report_filters_to_requested_ids() {
        let rows = vec![
            report_row(&[(2, "10000001"), (6, "P")]),
            report_row(&[(2, "10000002"), (6, "P")]),
            report_row(&[(2, "10000003"), (6, "R")]),
        ];
        let body = report_body(&rows);
        let transport = Arc::new(StaticTransport::ok(body));
        let gateway = report_gateway(transport.clone());

        let report = gateway
            .transaction_set_report(vec!["10000003".to_string(), "10000001".to_string()])
            .unwrap();
        let response = report.commit().await.unwrap();

        let ids: Vec<_> = response
            .records()
            .iter()
            .filter_map(|r| r.transaction_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["10000001", "10000003"]);

        // The request covered the sorted id range.
        let (_, sent) = transport.sent().pop().unwrap();
        assert!(sent.contains("rptRange=1"));
        assert!(sent.contains("rptIdStart=10000001"));
        assert!(sent.contains("rptIdEnd=10000003"));
    }

    #[tokio::test]
    async fn test_empty_id_set_fails() {
        let transport = Arc::new(StaticTransport::ok(""));
        let gateway = report_gateway(transport.clone());

        assert!(matches!(
            gateway.transaction_set_report(Vec::new()).unwrap_err(),
            GatewayError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_card_lookup_requires_a_search_key() {
        let transport = Arc::new(StaticTransport::ok("header\r\n"));
        let gateway = report_gateway(transport.clone());

        let lookup = gateway.credit_card_lookup_report().unwrap();
        let err = lookup.commit().await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_card_lookup_roundtrip() {
        let row = [
            "10000001",
            "1/17/2012 11:36:34 AM",
            "10.0.0.1",
            "50.00",
            "1",
            "Purchase",
            "VI",
            "0530",
            "order-1",
            "77",
            "1",
        ]
        .join("\t");
        let body = format!("header\r\n{}\r\n", row);
        let transport = Arc::new(StaticTransport::ok(body));
        let gateway = report_gateway(transport.clone());

        let mut lookup = gateway.credit_card_lookup_report().unwrap();
        lookup.set_credit_card_number("4030000010001234");
        lookup.set_datetime_range(
            NaiveDate::from_ymd_opt(2012, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            NaiveDate::from_ymd_opt(2012, 1, 31)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        );

        let response = lookup.commit().await.unwrap();
        assert_eq!(response.len(), 1);
        assert_eq!(
            response.records()[0].transaction_id.as_deref(),
            Some("10000001")
        );
        assert_eq!(response.records()[0].card_type.as_deref(), Some("VI"));

        let (url, sent) = transport.sent().pop().unwrap();
        assert!(url.ends_with("/scripts/report.aspx"));
        assert!(sent.contains("rptAPIVersion=1.0"));
        assert!(sent.contains("rptType=SEARCH"));
        assert!(sent.contains("rptCcNumber=4030000010001234"));
        assert!(sent.contains("rptStartHour=00"));
        assert!(sent.contains("rptEndSec=59"));
    }

    #[tokio::test]
    async fn test_card_lookup_status_filter() {
        let transport = Arc::new(StaticTransport::ok("header\r\n"));
        let gateway = report_gateway(transport.clone());

        let mut lookup = gateway.credit_card_lookup_report().unwrap();
        lookup.set_transaction_id("10000001");
        lookup.set_status(false, true);
        // Asking for both again clears the filter.
        lookup.set_status(true, true);
        lookup.commit().await.unwrap();

        let (_, sent) = transport.sent().pop().unwrap();
        assert!(!sent.contains("rptTransStatus"));
    }
}
