//! End-to-end commit flows over real HTTP, against a wiremock server.

use bean_core::{Address, Amount, CreditCard, GatewayError};
use bean_gateway::{AdjustmentKind, Gateway, GatewayConfig, HashAlgorithm};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn card() -> CreditCard {
    CreditCard::new("John Doe", "4030000010001234", 5, 2030)
        .unwrap()
        .with_cvd("123")
}

fn address() -> Address {
    Address::new(
        "John Doe",
        "john.doe@example.com",
        "123 Fake Street",
        "Fake City",
        "ON",
        "A1A1A1",
        "CA",
    )
    .unwrap()
}

fn gateway(server: &MockServer, config: GatewayConfig) -> Gateway {
    Gateway::new(config.with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn purchase_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scripts/process_transaction.asp"))
        .and(body_string_contains("merchant_id=300200578"))
        .and(body_string_contains("trnAmount=50.00"))
        .and(body_string_contains("trnType=P"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "trnApproved=1&trnId=10000123&authCode=TEST&cvdId=1&messageId=1\
             &trnAmount=50.00&trnOrderNumber=abc123",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server, GatewayConfig::new("300200578").unwrap());

    let purchase = gateway
        .purchase(&Amount::from_units(50), &card(), Some(&address()))
        .unwrap();
    let response = purchase.commit().await.unwrap();

    assert!(response.approved());
    assert_eq!(response.transaction_id(), Some("10000123"));
    assert_eq!(response.auth_code(), Some("TEST"));
    assert_eq!(response.cvd_status().unwrap(), Some("CVD Match"));
    assert_eq!(response.amount(), Some("50.00"));
}

#[tokio::test]
async fn declined_purchase_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scripts/process_transaction.asp"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("trnApproved=0&trnId=10000124&cvdId=2"),
        )
        .mount(&server)
        .await;

    let gateway = gateway(&server, GatewayConfig::new("300200578").unwrap());

    let purchase = gateway
        .purchase(&Amount::from_units(250), &card(), Some(&address()))
        .unwrap();
    let response = purchase.commit().await.unwrap();

    assert!(!response.approved());
    assert_eq!(response.cvd_status().unwrap(), Some("CVD Mismatch"));
}

#[tokio::test]
async fn hash_validation_appends_digest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scripts/process_transaction.asp"))
        .and(body_string_contains("hashValue="))
        .respond_with(ResponseTemplate::new(200).set_body_string("trnApproved=1"))
        .expect(1)
        .mount(&server)
        .await;

    let config = GatewayConfig::new("300200578")
        .unwrap()
        .with_hash_validation("my-hashcode", HashAlgorithm::Md5)
        .unwrap();
    let gateway = gateway(&server, config);

    let purchase = gateway
        .purchase(&Amount::from_units(50), &card(), None)
        .unwrap();
    assert!(purchase.commit().await.unwrap().approved());
}

#[tokio::test]
async fn password_validation_sends_credential_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scripts/process_transaction.asp"))
        .and(body_string_contains("username=merchant-user"))
        .and(body_string_contains("password=merchant-pass"))
        .respond_with(ResponseTemplate::new(200).set_body_string("trnApproved=1"))
        .expect(1)
        .mount(&server)
        .await;

    let config = GatewayConfig::new("300200578")
        .unwrap()
        .with_password_validation("merchant-user", "merchant-pass")
        .unwrap();
    let gateway = gateway(&server, config);

    let adjustment = gateway
        .adjustment(AdjustmentKind::Return, "10000123", &Amount::from_units(10))
        .unwrap();
    assert!(adjustment.commit().await.unwrap().approved());
}

#[tokio::test]
async fn non_200_status_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scripts/process_transaction.asp"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let gateway = gateway(&server, GatewayConfig::new("300200578").unwrap());

    let purchase = gateway
        .purchase(&Amount::from_units(50), &card(), None)
        .unwrap();
    let err = purchase.commit().await.unwrap_err();
    assert!(matches!(err, GatewayError::Http { status: 503, .. }));
}

#[tokio::test]
async fn empty_hash_value_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scripts/process_transaction.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Empty hash value"))
        .mount(&server)
        .await;

    let gateway = gateway(&server, GatewayConfig::new("300200578").unwrap());

    let purchase = gateway
        .purchase(&Amount::from_units(50), &card(), None)
        .unwrap();
    let err = purchase.commit().await.unwrap_err();
    assert!(matches!(err, GatewayError::Rejected(_)));
}

#[tokio::test]
async fn transaction_report_round_trip() {
    let mut fields = vec![""; 41];
    fields[2] = "10000001";
    fields[6] = "PA";
    fields[7] = "50.00";
    let body = format!("column header\r\n{}\r\n", fields.join("\t"));

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scripts/report_download.asp"))
        .and(body_string_contains("loginCompany=acme"))
        .and(body_string_contains("rptFormat=TAB"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let config = GatewayConfig::new("300200578")
        .unwrap()
        .with_report_login("acme", "reports", "secret");
    let gateway = gateway(&server, config);

    let report = gateway.transaction_report().unwrap();
    let response = report.commit().await.unwrap();

    assert_eq!(response.len(), 1);
    let record = &response.records()[0];
    assert_eq!(record.transaction_id.as_deref(), Some("10000001"));
    assert_eq!(record.transaction_type.as_deref(), Some("pre-authorization"));
}

#[tokio::test]
async fn modify_recurring_billing_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scripts/recurring_billing.asp"))
        .and(body_string_contains("operationType=M"))
        .and(body_string_contains("rbAccountId=2213"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<response><accountId>2213</accountId><code>1</code>\
             <message>Request successful</message></response>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server, GatewayConfig::new("300200578").unwrap());

    let modify = gateway.modify_recurring_billing_account("2213");
    let response = modify.commit().await.unwrap();

    assert!(response.approved());
    assert_eq!(response.account_id, "2213");
    assert_eq!(response.message, "Request successful");
}
