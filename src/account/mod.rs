//! Account information and list management.

use crate::client::{parse_body, Client};
use crate::core::error::Result;
use crate::core::models::{Credits, DeleteConfirmation, ListSummary, Usage};
use crate::core::options::require_non_empty;
use reqwest::Method;
use serde_json::Value;

impl Client {
    /// Fetches the current credit balance. Never cached.
    pub async fn get_credits(&self) -> Result<Credits> {
        self.get_json(&["credits"]).await
    }

    /// Fetches API usage statistics. Never cached.
    pub async fn get_usage(&self) -> Result<Usage> {
        self.get_json(&["usage"]).await
    }

    /// Lists the verification lists stored on the account.
    pub async fn get_lists(&self) -> Result<Vec<ListSummary>> {
        self.get_json(&["lists"]).await
    }

    /// Deletes a list.
    ///
    /// Deleting an id that does not exist (including one deleted earlier)
    /// fails with [`Error::NotFound`](crate::Error::NotFound).
    pub async fn delete_list(&self, list_id: impl AsRef<str>) -> Result<DeleteConfirmation> {
        let list_id = list_id.as_ref();
        require_non_empty("list_id", list_id)?;

        let url = self.endpoint(&["lists", list_id])?;
        let response = self.execute(Method::DELETE, url, |request| request).await?;

        // the confirmation is read from the top level, not the `data` member
        let confirmation = match parse_body(&response.body)? {
            Value::Null => DeleteConfirmation::default(),
            value => serde_json::from_value(value)?,
        };
        tracing::info!(
            target: "emaillistchecker::lists",
            "Deleted list {} (HTTP {})",
            list_id,
            response.status
        );
        Ok(confirmation)
    }
}
