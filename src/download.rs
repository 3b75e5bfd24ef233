//! Download triggering.
//!
//! Submitting the form ends with "fetch this target and save it under this
//! name" without leaving the current view. The controller only asks for the
//! download to start; it never waits for or inspects the response. That
//! request is the [`DownloadTrigger`] capability.
//!
//! With the `http` feature, [`HttpDownloader`] provides a native trigger
//! that resolves the relative target against a base URL and saves the body
//! from a detached task.

use crate::errors::TriggerError;

/// Capability that starts a download of `target` saved as `suggested_filename`.
///
/// Returning `Ok(())` means the download was started, not that it finished
/// or that the server accepted the parameters.
pub trait DownloadTrigger: Send + Sync {
    fn trigger_download(&self, target: &str, suggested_filename: &str) -> Result<(), TriggerError>;
}

impl<T: DownloadTrigger + ?Sized> DownloadTrigger for std::sync::Arc<T> {
    fn trigger_download(&self, target: &str, suggested_filename: &str) -> Result<(), TriggerError> {
        (**self).trigger_download(target, suggested_filename)
    }
}

/// Reduce a suggested file name to its final path component.
///
/// Rejects names that would escape the destination directory.
pub fn safe_filename(suggested: &str) -> Option<&str> {
    let name = std::path::Path::new(suggested).file_name()?.to_str()?;
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name)
}

#[cfg(feature = "http")]
pub use self::http::{DownloadOutcome, HttpDownloader};

#[cfg(feature = "http")]
mod http {
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use reqwest::Client;
    use thiserror::Error;
    use tokio::runtime::Handle;
    use tokio_util::task::TaskTracker;
    use tracing::{error, info};
    use url::Url;

    use super::{safe_filename, DownloadTrigger};
    use crate::errors::{GenError, GenResult, TriggerError};

    #[derive(Debug, Error)]
    enum FetchError {
        #[error("request failed: {0}")]
        Http(#[from] reqwest::Error),
        #[error("could not write file: {0}")]
        Io(#[from] std::io::Error),
    }

    /// How one background download ended.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DownloadOutcome {
        pub url: Url,
        /// Saved file, or why nothing was saved
        pub result: Result<PathBuf, String>,
    }

    impl DownloadOutcome {
        pub fn is_saved(&self) -> bool {
            self.result.is_ok()
        }

        /// The saved path, or [`GenError::Download`] when nothing was written.
        pub fn into_result(self) -> GenResult<PathBuf> {
            self.result
                .map_err(|reason| GenError::Download(format!("{}: {reason}", self.url)))
        }
    }

    /// Native download trigger over HTTP.
    #[derive(Debug, Clone)]
    pub struct HttpDownloader {
        client: Client,
        base_url: Url,
        out_dir: PathBuf,
        tasks: TaskTracker,
        outcomes: Arc<Mutex<Vec<DownloadOutcome>>>,
    }

    impl HttpDownloader {
        /// Create a downloader resolving targets against `base_url` and saving
        /// into `out_dir`.
        pub fn new(base_url: &str, out_dir: impl Into<PathBuf>) -> Result<Self, TriggerError> {
            let base_url = Url::parse(base_url).map_err(|e| TriggerError::InvalidTarget {
                target: base_url.to_string(),
                reason: e.to_string(),
            })?;

            Ok(Self {
                client: Client::new(),
                base_url,
                out_dir: out_dir.into(),
                tasks: TaskTracker::new(),
                outcomes: Arc::new(Mutex::new(Vec::new())),
            })
        }

        pub fn out_dir(&self) -> &Path {
            &self.out_dir
        }

        /// Absolute URL a relative target resolves to.
        pub fn resolve(&self, target: &str) -> Result<Url, TriggerError> {
            let url = self
                .base_url
                .join(target)
                .map_err(|e| TriggerError::InvalidTarget {
                    target: target.to_string(),
                    reason: e.to_string(),
                })?;

            match url.scheme() {
                "http" | "https" => Ok(url),
                other => Err(TriggerError::InvalidTarget {
                    target: target.to_string(),
                    reason: format!("unsupported scheme '{other}'"),
                }),
            }
        }

        /// Wait for every started download to finish and collect how each ended.
        ///
        /// Downloads started after this call are not waited for. Each outcome
        /// is returned once.
        pub async fn wait(&self) -> Vec<DownloadOutcome> {
            self.tasks.close();
            self.tasks.wait().await;
            self.outcomes
                .lock()
                .map(|mut outcomes| std::mem::take(&mut *outcomes))
                .unwrap_or_default()
        }
    }

    impl DownloadTrigger for HttpDownloader {
        fn trigger_download(
            &self,
            target: &str,
            suggested_filename: &str,
        ) -> Result<(), TriggerError> {
            let url = self.resolve(target)?;
            let filename =
                safe_filename(suggested_filename).ok_or_else(|| TriggerError::InvalidTarget {
                    target: target.to_string(),
                    reason: format!("unusable file name '{suggested_filename}'"),
                })?;

            let runtime = Handle::try_current()
                .map_err(|e| TriggerError::Refused(format!("no async runtime: {e}")))?;

            std::fs::create_dir_all(&self.out_dir)?;
            let dest = self.out_dir.join(filename);

            let client = self.client.clone();
            let outcomes = Arc::clone(&self.outcomes);
            self.tasks.spawn_on(
                async move {
                    let result = match fetch_to_file(&client, url.clone(), &dest).await {
                        Ok(len) => {
                            info!(%url, dest = %dest.display(), bytes = len, "download saved");
                            Ok(dest)
                        }
                        Err(e) => {
                            error!(%url, error = %e, "download failed");
                            Err(e.to_string())
                        }
                    };
                    if let Ok(mut outcomes) = outcomes.lock() {
                        outcomes.push(DownloadOutcome { url, result });
                    }
                },
                &runtime,
            );
            Ok(())
        }
    }

    async fn fetch_to_file(client: &Client, url: Url, dest: &Path) -> Result<usize, FetchError> {
        let body = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tokio::fs::write(dest, &body).await?;
        Ok(body.len())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_filename_strips_directories() {
        assert_eq!(safe_filename("Custom.mxtpro"), Some("Custom.mxtpro"));
        assert_eq!(safe_filename("../../etc/Custom.mxtpro"), Some("Custom.mxtpro"));
        assert_eq!(safe_filename(".."), None);
        assert_eq!(safe_filename(""), None);
    }
}
