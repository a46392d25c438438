use crate::client::Client;
use crate::core::error::Result;
use crate::core::models::VerificationResult;
use crate::core::options::{require_non_empty, VerifyOptions};
use serde::Serialize;

#[derive(Serialize)]
struct VerifyRequest<'a> {
    email: &'a str,
    smtp_check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u64>,
}

impl Client {
    /// Verifies a single email address with the SMTP probe enabled.
    ///
    /// Syntax is checked by the server; locally the address only has to be
    /// non-empty.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn run() -> emaillistchecker::Result<()> {
    /// let client = emaillistchecker::Client::new("your_api_key")?;
    /// let result = client.verify("test@example.com").await?;
    /// if result.result.is_deliverable() {
    ///     println!("{} is deliverable (score {})", result.email, result.score);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn verify(&self, email: &str) -> Result<VerificationResult> {
        self.verify_with(email, VerifyOptions::default()).await
    }

    /// Verifies a single email address with explicit options.
    pub async fn verify_with(
        &self,
        email: &str,
        options: VerifyOptions,
    ) -> Result<VerificationResult> {
        require_non_empty("email", email)?;
        let request = VerifyRequest {
            email,
            smtp_check: options.smtp_check,
            timeout: options.timeout_secs()?,
        };
        self.post_json(&["verify"], &request).await
    }
}
