//! Submits a small batch, polls until it finishes and prints the valid
//! addresses.

use emaillistchecker::{BatchStatus, Client, ResultsFilter, ResultsFormat};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("emaillistchecker=info")),
        )
        .init();

    let client = Client::from_env()?;
    let emails = [
        "john@example.com",
        "jane@example.com",
        "info@example.org",
    ];

    let batch = client.verify_batch(&emails, Some("Demo batch")).await?;
    println!("Submitted batch {} ({})", batch.id, batch.status);

    let batch = loop {
        let batch = client.get_batch_status(&batch.id).await?;
        println!("  {}: {}%", batch.status, batch.progress);
        if batch.is_terminal() {
            break batch;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    };

    if batch.status == BatchStatus::Failed {
        anyhow::bail!("batch {} failed on the server", batch.id);
    }

    let results = client
        .get_batch_results(&batch.id, ResultsFormat::Json, ResultsFilter::Valid)
        .await?;
    for record in results.records().unwrap_or_default() {
        println!("{} (score {:.2})", record.email, record.score);
    }

    let csv = client
        .get_batch_results(&batch.id, ResultsFormat::Csv, ResultsFilter::All)
        .await?;
    println!("\n{}", csv.export().unwrap_or_default());
    Ok(())
}
