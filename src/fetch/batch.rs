//! Batched export and download of selected variants.
//!
//! Only the export request of a batch is retried. Downloads are attempted
//! once; a failed or missing item is reported and skipped without touching
//! its siblings.

use std::collections::HashSet;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::validation::Diagnostics;

use super::client::{DocumentApi, ImageExport};
use super::error::FetchError;

/// Batching and retry knobs, taken from `swatch.yaml`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl From<&Config> for FetchSettings {
    fn from(config: &Config) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            batch_delay: config.batch_delay(),
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff(),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// A batch whose export request failed. None of its nodes were processed.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedBatch {
    pub node_ids: Vec<String>,
    pub error: FetchError,
}

/// Everything that came back from a fetch run.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    /// Processed items as `(node_id, result)`, in request order.
    pub items: Vec<(String, T)>,
    pub failed_batches: Vec<FailedBatch>,
    pub diagnostics: Diagnostics,
}

impl<T> Default for FetchOutcome<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failed_batches: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }
}

/// Drives a `DocumentApi` through batched exports.
pub struct AssetFetcher<'a> {
    api: &'a dyn DocumentApi,
    settings: FetchSettings,
}

impl<'a> AssetFetcher<'a> {
    pub fn new(api: &'a dyn DocumentApi, settings: FetchSettings) -> Self {
        Self { api, settings }
    }

    /// Export, download and process every node in `node_ids`.
    ///
    /// `process` runs on each downloaded SVG as soon as it arrives, so the
    /// per-item work of one batch overlaps its downloads.
    pub async fn fetch<T, F>(&self, node_ids: &[String], process: F) -> FetchOutcome<T>
    where
        F: Fn(&str, String) -> T + Sync,
    {
        let mut outcome = FetchOutcome::default();
        let batches: Vec<&[String]> = node_ids.chunks(self.settings.batch_size.max(1)).collect();
        let total = batches.len();

        for (n, batch) in batches.into_iter().enumerate() {
            if n > 0 && !self.settings.batch_delay.is_zero() {
                tokio::time::sleep(self.settings.batch_delay).await;
            }
            info!(batch = n + 1, total, size = batch.len(), "exporting batch");

            let export = match self.export_with_retry(batch).await {
                Ok(export) => export,
                Err(error) => {
                    warn!(batch = n + 1, %error, "batch export failed");
                    outcome.failed_batches.push(FailedBatch {
                        node_ids: batch.to_vec(),
                        error,
                    });
                    continue;
                }
            };

            self.process_batch(batch, export, &process, &mut outcome).await;
        }

        outcome
    }

    async fn process_batch<T, F>(
        &self,
        batch: &[String],
        mut export: ImageExport,
        process: &F,
        outcome: &mut FetchOutcome<T>,
    ) where
        F: Fn(&str, String) -> T + Sync,
    {
        let requested: HashSet<&str> = batch.iter().map(String::as_str).collect();
        let mut orphans: Vec<&String> = export
            .images
            .keys()
            .filter(|id| !requested.contains(id.as_str()))
            .collect();
        orphans.sort();
        for id in orphans {
            warn!(node = %id, "export returned a node that was not requested");
            outcome.diagnostics.warn(
                "swatch::fetch::orphan-export",
                id,
                "export URL for a node that was not requested, ignored",
            );
        }

        let mut pending = Vec::with_capacity(batch.len());
        for id in batch {
            match export.images.remove(id).flatten() {
                Some(url) => pending.push((id.as_str(), url)),
                None => {
                    warn!(node = %id, "no export URL, skipping");
                    outcome.diagnostics.warn(
                        "swatch::fetch::null-export",
                        id,
                        "the API returned no export URL for this node",
                    );
                }
            }
        }

        let downloads = pending.into_iter().map(|(id, url)| async move {
            let result = self.api.download(&url).await.map(|svg| process(id, svg));
            (id, result)
        });

        for (id, result) in join_all(downloads).await {
            match result {
                Ok(item) => outcome.items.push((id.to_string(), item)),
                Err(error) => {
                    warn!(node = %id, %error, "download failed, skipping");
                    outcome.diagnostics.warn(
                        "swatch::fetch::download",
                        id,
                        format!("download failed: {}", error),
                    );
                }
            }
        }
    }

    /// One export request with exponential backoff on transient failures.
    async fn export_with_retry(&self, node_ids: &[String]) -> Result<ImageExport, FetchError> {
        let mut last_error = FetchError::Connection("No attempts made".into());
        let mut backoff = self.settings.retry_backoff;

        for attempt in 0..=self.settings.max_retries {
            if attempt > 0 {
                debug!("Retry attempt {} after {:?}", attempt, backoff);
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
            }

            match self.api.export_svgs(node_ids).await {
                Ok(export) => {
                    if let Some(err) = export.err {
                        return Err(FetchError::Api(err));
                    }
                    return Ok(export);
                }
                Err(e) => {
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    if let Some(retry_after) = e.retry_after() {
                        backoff = retry_after;
                    }
                    warn!("Export request failed (attempt {}): {}", attempt + 1, e);
                    last_error = e;
                }
            }
        }

        Err(FetchError::RetriesExhausted(last_error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentNode;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Replays queued export responses and serves downloads from a map.
    #[derive(Default)]
    struct ScriptedApi {
        exports: Mutex<VecDeque<Result<ImageExport, FetchError>>>,
        requests: Mutex<Vec<Vec<String>>>,
        files: HashMap<String, String>,
    }

    impl ScriptedApi {
        fn export(mut self, response: Result<ImageExport, FetchError>) -> Self {
            self.exports.get_mut().unwrap().push_back(response);
            self
        }

        fn file(mut self, url: &str, body: &str) -> Self {
            self.files.insert(url.to_string(), body.to_string());
            self
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DocumentApi for ScriptedApi {
        async fn fetch_document(&self) -> Result<DocumentNode, FetchError> {
            Ok(DocumentNode::new("0:0", "Document", "DOCUMENT"))
        }

        async fn export_svgs(&self, node_ids: &[String]) -> Result<ImageExport, FetchError> {
            self.requests.lock().unwrap().push(node_ids.to_vec());
            self.exports
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Api("no scripted response".into())))
        }

        async fn download(&self, url: &str) -> Result<String, FetchError> {
            self.files.get(url).cloned().ok_or(FetchError::Http {
                status: 404,
                message: url.to_string(),
            })
        }
    }

    fn export(entries: &[(&str, Option<&str>)]) -> ImageExport {
        ImageExport {
            images: entries
                .iter()
                .map(|(id, url)| (id.to_string(), url.map(str::to_string)))
                .collect(),
            err: None,
        }
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn fast(batch_size: usize) -> FetchSettings {
        FetchSettings {
            batch_size,
            batch_delay: Duration::ZERO,
            max_retries: 3,
            retry_backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_null_export_is_skipped() {
        let api = ScriptedApi::default()
            .export(Ok(export(&[("1", Some("u1")), ("2", None), ("3", Some("u3"))])))
            .file("u1", "<svg/>")
            .file("u3", "<svg></svg>");

        let fetcher = AssetFetcher::new(&api, fast(100));
        let outcome = fetcher
            .fetch(&ids(&["1", "2", "3"]), |_, svg| svg.len())
            .await;

        let got: Vec<&str> = outcome.items.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(got, vec!["1", "3"]);
        assert_eq!(
            outcome
                .diagnostics
                .with_code("swatch::fetch::null-export")
                .filter(|d| d.subject.as_deref() == Some("2"))
                .count(),
            1
        );
        assert!(outcome.failed_batches.is_empty());
    }

    #[tokio::test]
    async fn test_download_failure_does_not_abort_batch() {
        let api = ScriptedApi::default()
            .export(Ok(export(&[("1", Some("missing")), ("2", Some("u2"))])))
            .file("u2", "<svg/>");

        let outcome = AssetFetcher::new(&api, fast(100))
            .fetch(&ids(&["1", "2"]), |_, svg| svg)
            .await;

        assert_eq!(outcome.items, vec![("2".to_string(), "<svg/>".to_string())]);
        assert_eq!(outcome.diagnostics.with_code("swatch::fetch::download").count(), 1);
    }

    #[tokio::test]
    async fn test_orphan_url_is_reported() {
        let api = ScriptedApi::default()
            .export(Ok(export(&[("1", Some("u1")), ("9:9", Some("u9"))])))
            .file("u1", "<svg/>")
            .file("u9", "<svg/>");

        let outcome = AssetFetcher::new(&api, fast(100))
            .fetch(&ids(&["1"]), |id, _| id.to_string())
            .await;

        assert_eq!(outcome.items.len(), 1);
        let orphan: Vec<_> = outcome
            .diagnostics
            .with_code("swatch::fetch::orphan-export")
            .collect();
        assert_eq!(orphan.len(), 1);
        assert_eq!(orphan[0].subject.as_deref(), Some("9:9"));
    }

    #[tokio::test]
    async fn test_batches_respect_size() {
        let api = ScriptedApi::default()
            .export(Ok(export(&[("1", Some("u")), ("2", Some("u"))])))
            .export(Ok(export(&[("3", Some("u"))])))
            .file("u", "<svg/>");

        let outcome = AssetFetcher::new(&api, fast(2))
            .fetch(&ids(&["1", "2", "3"]), |_, _| ())
            .await;

        assert_eq!(outcome.items.len(), 3);
        assert_eq!(
            *api.requests.lock().unwrap(),
            vec![ids(&["1", "2"]), ids(&["3"])]
        );
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let api = ScriptedApi::default()
            .export(Err(FetchError::RateLimited { retry_after_ms: 1 }))
            .export(Err(FetchError::Http {
                status: 502,
                message: "bad gateway".into(),
            }))
            .export(Ok(export(&[("1", Some("u1"))])))
            .file("u1", "<svg/>");

        let outcome = AssetFetcher::new(&api, fast(100))
            .fetch(&ids(&["1"]), |_, _| ())
            .await;

        assert_eq!(api.request_count(), 3);
        assert_eq!(outcome.items.len(), 1);
        assert!(outcome.failed_batches.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_fails_batch_without_retry() {
        let api = ScriptedApi::default()
            .export(Ok(ImageExport {
                images: HashMap::new(),
                err: Some("Render timeout".into()),
            }))
            .export(Ok(export(&[("3", Some("u3"))])))
            .file("u3", "<svg/>");

        let outcome = AssetFetcher::new(&api, fast(2))
            .fetch(&ids(&["1", "2", "3"]), |_, _| ())
            .await;

        assert_eq!(api.request_count(), 2);
        assert_eq!(outcome.failed_batches.len(), 1);
        assert_eq!(outcome.failed_batches[0].node_ids, ids(&["1", "2"]));
        assert_eq!(
            outcome.failed_batches[0].error,
            FetchError::Api("Render timeout".into())
        );
        let got: Vec<&str> = outcome.items.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(got, vec!["3"]);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let mut api = ScriptedApi::default();
        for _ in 0..4 {
            api = api.export(Err(FetchError::Timeout));
        }

        let mut settings = fast(100);
        settings.max_retries = 3;
        let outcome = AssetFetcher::new(&api, settings)
            .fetch(&ids(&["1"]), |_, _| ())
            .await;

        assert_eq!(api.request_count(), 4);
        assert!(matches!(
            outcome.failed_batches[0].error,
            FetchError::RetriesExhausted(_)
        ));
    }
}
