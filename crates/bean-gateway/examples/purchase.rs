//! One-off purchase against the gateway's test environment.
//!
//! ```bash
//! export BEANSTREAM_MERCHANT_ID=300200578
//! cargo run --example purchase
//! ```

use bean_core::{Address, Amount, CreditCard};
use bean_gateway::Gateway;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::DEBUG.into())
                .from_env_lossy(),
        )
        .init();

    let gateway = Gateway::from_env()?;

    let card = CreditCard::new("John Doe", "4030000010001234", 5, 2030)?.with_cvd("123");
    let address = Address::new(
        "John Doe",
        "john.doe@example.com",
        "123 Fake Street",
        "Fake City",
        "ON",
        "A1A1A1",
        "CA",
    )?
    .with_phone("555-555-5555");

    let purchase = gateway.purchase(&Amount::from_units(50), &card, Some(&address))?;
    println!("order number: {}", purchase.order_number());

    let response = purchase.commit().await?;
    println!("approved: {}", response.approved());
    if let Some(transaction_id) = response.transaction_id() {
        println!("transaction id: {}", transaction_id);
    }
    if let Some(cvd) = response.cvd_status()? {
        println!("cvd: {}", cvd);
    }

    Ok(())
}
