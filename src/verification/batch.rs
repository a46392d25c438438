//! Batch submission, status polling and result download.

use super::BATCH_TARGET;
use crate::client::{decode, parse_body, unwrap_envelope, Client};
use crate::core::error::{Error, Result};
use crate::core::models::{
    Batch, BatchResults, BatchStatus, ResultsFilter, ResultsFormat, VerificationResult,
};
use crate::core::options::{require_batch_size, require_non_empty, BatchOptions};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Serialize)]
struct BatchRequest<'a> {
    emails: Vec<&'a str>,
    auto_start: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

impl Client {
    /// Submits addresses for asynchronous verification and returns as soon
    /// as the server has accepted the job (status `pending` or
    /// `processing`). Poll with [`Client::get_batch_status`].
    pub async fn verify_batch<S>(&self, emails: &[S], name: Option<&str>) -> Result<Batch>
    where
        S: AsRef<str>,
    {
        let mut options = BatchOptions::default();
        options.name = name.map(str::to_string);
        self.verify_batch_with(emails, options).await
    }

    /// Submits a batch with a webhook, a name or a deferred start.
    pub async fn verify_batch_with<S>(&self, emails: &[S], options: BatchOptions) -> Result<Batch>
    where
        S: AsRef<str>,
    {
        require_batch_size(emails.len())?;
        let request = BatchRequest {
            emails: emails.iter().map(|email| email.as_ref()).collect(),
            auto_start: options.auto_start,
            name: options.name.as_deref(),
            callback_url: options.callback_url.as_deref(),
        };

        let batch: Batch = self.post_json(&["verify", "batch"], &request).await?;
        tracing::info!(
            target: BATCH_TARGET,
            "[Batch {}] Submitted {} emails (status: {})",
            batch.id,
            emails.len(),
            batch.status
        );
        Ok(batch)
    }

    /// Uploads a CSV, TXT or XLSX file for batch verification.
    pub async fn verify_batch_file(
        &self,
        path: impl AsRef<Path>,
        options: BatchOptions,
    ) -> Result<Batch> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let size = contents.len();

        let url = self.endpoint(&["verify", "batch", "upload"])?;
        let upload_name = file_name.clone();
        let response = self
            .execute(Method::POST, url, move |request| {
                let mut form = Form::new()
                    .part("file", Part::bytes(contents).file_name(upload_name))
                    .text("auto_start", options.auto_start.to_string());
                if let Some(name) = options.name {
                    form = form.text("name", name);
                }
                if let Some(callback_url) = options.callback_url {
                    form = form.text("callback_url", callback_url);
                }
                request.multipart(form)
            })
            .await?;

        let batch: Batch = decode(&response.body)?;
        tracing::info!(
            target: BATCH_TARGET,
            "[Batch {}] Uploaded {} ({} bytes, status: {})",
            batch.id,
            file_name,
            size,
            batch.status
        );
        Ok(batch)
    }

    /// Reads the current state of a batch. Safe to call repeatedly; the
    /// client does not enforce a minimum polling interval.
    pub async fn get_batch_status(&self, batch_id: impl AsRef<str>) -> Result<Batch> {
        let batch_id = batch_id.as_ref();
        require_non_empty("batch_id", batch_id)?;
        self.get_json(&["verify", "batch", batch_id]).await
    }

    /// Downloads the results of a completed batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BatchIncomplete`] when the server reports that the
    /// batch is still pending, processing or has failed, rather than an
    /// empty result set.
    pub async fn get_batch_results(
        &self,
        batch_id: impl AsRef<str>,
        format: ResultsFormat,
        filter: ResultsFilter,
    ) -> Result<BatchResults> {
        let batch_id = batch_id.as_ref();
        require_non_empty("batch_id", batch_id)?;

        let mut url = self.endpoint(&["verify", "batch", batch_id, "results"])?;
        url.query_pairs_mut()
            .append_pair("format", format.as_str())
            .append_pair("filter", filter.as_str());

        let response = self.execute(Method::GET, url, |request| request).await?;
        let results = match format {
            ResultsFormat::Json => {
                let value = parse_body(&response.body)?;
                ensure_finished(batch_id, &value)?;
                BatchResults::Records(records_from(batch_id, unwrap_envelope(value))?)
            }
            ResultsFormat::Csv | ResultsFormat::Txt => {
                BatchResults::Export(export_from(batch_id, &response.body)?)
            }
        };
        Ok(results)
    }

    /// Polls a batch until it reaches `completed` or `failed`.
    ///
    /// Runs in the caller's task: one status request, then a sleep of exactly
    /// `interval`, repeated. There is no backoff. With `max_polls > 0` the wait
    /// gives up after that many requests with [`Error::BatchIncomplete`];
    /// `0` polls without limit. Errors from a status request end the wait.
    pub async fn wait_for_batch(
        &self,
        batch_id: impl AsRef<str>,
        interval: Duration,
        max_polls: usize,
    ) -> Result<Batch> {
        let batch_id = batch_id.as_ref();
        let started = Instant::now();
        let mut polls = 0;

        loop {
            let batch = self.get_batch_status(batch_id).await?;
            polls += 1;
            tracing::debug!(
                target: BATCH_TARGET,
                "[Batch {}] Poll {}: {} ({}%)",
                batch_id,
                polls,
                batch.status,
                batch.progress
            );

            if batch.is_terminal() {
                tracing::info!(
                    target: BATCH_TARGET,
                    "[Batch {}] Finished as {} after {} polls in {:.2?}",
                    batch_id,
                    batch.status,
                    polls,
                    started.elapsed()
                );
                return Ok(batch);
            }

            if max_polls > 0 && polls >= max_polls {
                tracing::warn!(
                    target: BATCH_TARGET,
                    "[Batch {}] Still {} after {} polls, giving up",
                    batch_id,
                    batch.status,
                    polls
                );
                return Err(Error::BatchIncomplete {
                    batch_id: batch_id.to_string(),
                    status: batch.status,
                });
            }

            tokio::time::sleep(interval).await;
        }
    }
}

/// Status of a batch-shaped object that is still pending, processing or
/// has failed.
fn unfinished_status(map: &Map<String, Value>) -> Option<BatchStatus> {
    let status = BatchStatus::from(map.get("status")?.as_str()?);
    matches!(
        status,
        BatchStatus::Pending | BatchStatus::Processing | BatchStatus::Failed
    )
    .then_some(status)
}

/// Rejects a results body whose batch status, at the top level or inside
/// the `data` envelope, says the batch has not completed.
fn ensure_finished(batch_id: &str, value: &Value) -> Result<()> {
    let nested = value.get("data");
    let status = std::iter::once(value)
        .chain(nested)
        .filter_map(Value::as_object)
        .find_map(unfinished_status);

    match status {
        Some(status) => Err(Error::BatchIncomplete {
            batch_id: batch_id.to_string(),
            status,
        }),
        None => Ok(()),
    }
}

fn records_from(batch_id: &str, value: Value) -> Result<Vec<VerificationResult>> {
    let mut map = match value {
        Value::Object(map) => map,
        other => return Ok(serde_json::from_value(other)?),
    };

    if let Some(status) = unfinished_status(&map) {
        return Err(Error::BatchIncomplete {
            batch_id: batch_id.to_string(),
            status,
        });
    }
    // paginated downloads nest the records one level deeper
    for key in ["data", "results"] {
        if map.get(key).is_some_and(Value::is_array) {
            let records = map.remove(key).unwrap_or(Value::Null);
            return Ok(serde_json::from_value(records)?);
        }
    }
    Ok(serde_json::from_value(Value::Object(map))?)
}

fn export_from(batch_id: &str, body: &[u8]) -> Result<String> {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return Ok(String::from_utf8_lossy(body).into_owned());
    };

    ensure_finished(batch_id, &value)?;
    match unwrap_envelope(value) {
        Value::String(text) => Ok(text),
        other => Ok(other.to_string()),
    }
}
