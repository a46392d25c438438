//! Verifies one address and prints the outcome.
//!
//! ```text
//! EMAILLISTCHECKER_API_KEY=... cargo run --example verify_single -- someone@example.com
//! ```

use emaillistchecker::{Client, Error, VerifyOptions};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("emaillistchecker=info")),
        )
        .init();

    let email = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "test@example.com".to_string());

    let client = Client::from_env()?;
    let options = VerifyOptions::default().timeout(Duration::from_secs(20));

    match client.verify_with(&email, options).await {
        Ok(result) => {
            println!("{}: {} ({})", result.email, result.result, result.reason);
            println!("  score:      {:.2}", result.score);
            println!("  disposable: {}", result.disposable);
            println!("  role:       {}", result.role);
            println!("  free:       {}", result.free);
            println!("  mx:         {}", result.mx_records.join(", "));
        }
        Err(Error::RateLimit { retry_after }) => {
            eprintln!("Rate limited, try again in {}s", retry_after.as_secs());
        }
        Err(Error::InsufficientCredits { message, .. }) => {
            eprintln!("Out of credits: {message}");
        }
        Err(e) => return Err(e.into()),
    }

    let credits = client.get_credits().await?;
    println!("Credits left: {} ({} plan)", credits.balance, credits.plan);
    Ok(())
}
