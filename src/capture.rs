use crate::config::CaptureConfig;
use crate::fetcher::{FetchError, PageFetcher};
use crate::images;
use crate::metadata::{MetadataStore, StoreError};
use crate::naming;
use crate::results::{CaptureOutcome, CaptureReport, CaptureStatus};
use std::error::Error;
use std::fs;
use std::path::Path;
use thiserror::Error as ThisError;

/// Why a page failed to be captured
#[derive(Debug, ThisError)]
pub enum CaptureError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to save document {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Metadata(#[from] StoreError),
}

/// Capture every URL in input order.
///
/// The error covers setup only (output directory, HTTP client); a page that
/// fails never stops the rest of the batch.
pub async fn run_batch(
    urls: &[String],
    config: &CaptureConfig,
) -> Result<Vec<CaptureOutcome>, Box<dyn Error>> {
    fs::create_dir_all(&config.output_dir)?;
    let fetcher = PageFetcher::new(config)?;
    let store = MetadataStore::new(&config.output_dir);

    let mut outcomes = Vec::with_capacity(urls.len());
    for url in urls {
        let status = capture_page(url, &fetcher, &store, config).await;
        outcomes.push(CaptureOutcome {
            url: url.clone(),
            status,
        });
    }
    Ok(outcomes)
}

/// Drive one URL through fetch, optional image localization, and persistence.
///
/// Only a fetch or persistence failure fails the page; a localization problem
/// degrades to a partial success with the page still saved. The previous
/// metadata is read before the sidecar is overwritten, and the document is
/// written before the sidecar so the record always describes a saved page.
pub async fn capture_page(
    url: &str,
    fetcher: &PageFetcher,
    store: &MetadataStore,
    config: &CaptureConfig,
) -> CaptureStatus {
    ::log::info!("Capturing {}", url);

    let mut capture = match fetcher.fetch(url).await {
        Ok(capture) => capture,
        Err(e) => {
            ::log::error!("Unable to fetch URL {}: {}", url, e);
            return CaptureStatus::Failed(e.into());
        }
    };

    let mut localization_failed = false;
    if config.deep_fetch {
        let output_dir = Path::new(&config.output_dir);
        match images::localize_images(&mut capture, fetcher, output_dir).await {
            Ok(outcome) if outcome.failed == 0 => {
                ::log::debug!("Localized {} images for {}", outcome.downloaded, url);
            }
            Ok(outcome) => {
                ::log::warn!(
                    "Failed to save all images for URL {} ({} of {} failed)",
                    url,
                    outcome.failed,
                    outcome.attempted
                );
                localization_failed = true;
            }
            Err(e) => {
                ::log::warn!("Failed to save all images for URL {}: {}", url, e);
                localization_failed = true;
            }
        }
    }

    let previous = if config.print_metadata {
        store.read_last(url)
    } else {
        None
    };

    let document_file = naming::document_file_name(url);
    let document_path = Path::new(&config.output_dir).join(&document_file);
    if let Err(source) = fs::write(&document_path, &capture.text) {
        ::log::error!("Failed to save document for {}: {}", url, source);
        return CaptureStatus::Failed(CaptureError::Persist {
            path: document_path.display().to_string(),
            source,
        });
    }

    if let Err(e) = store.write(url, &capture.metadata) {
        ::log::error!("Failed to save metadata for {}: {}", url, e);
        return CaptureStatus::Failed(e.into());
    }

    ::log::info!("Saved {} as {}", url, document_file);
    CaptureStatus::Captured(CaptureReport {
        current: capture.metadata,
        previous,
        document_file,
        localization_failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Minimal loopback HTTP server that answers every request with the same
    // body. Returns the base URL to fetch.
    async fn serve(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(_) => break,
                };
                tokio::spawn(async move {
                    let mut request = [0u8; 4096];
                    let _ = socket.read(&mut request).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\n\
                         Date: Tue, 15 Nov 1994 08:12:31 GMT\r\n\
                         Content-Type: text/html\r\n\
                         Content-Length: {}\r\n\
                         Connection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });
        format!("http://{}", addr)
    }

    fn test_config(dir: &Path) -> CaptureConfig {
        CaptureConfig {
            output_dir: dir.display().to_string(),
            print_metadata: true,
            ..CaptureConfig::default()
        }
    }

    const PAGE: &str = "<html><body>\
        <a href=\"/one\">one</a><a href=\"/two\">two</a>\
        <img src=\"pic.png\">\
        </body></html>";

    #[tokio::test]
    async fn test_capture_persists_document_and_sidecar() {
        let url = serve(PAGE).await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let outcomes = run_batch(&[url.clone()], &config).await.unwrap();
        assert_eq!(outcomes.len(), 1);
        let report = match &outcomes[0].status {
            CaptureStatus::Captured(report) => report,
            CaptureStatus::Failed(e) => panic!("capture failed: {}", e),
        };

        assert_eq!(report.current.links_count, 2);
        assert_eq!(report.current.images_count, 1);
        assert_eq!(report.current.fetch_date, "Tue, 15 Nov 1994 08:12:31 GMT");
        // First run has no prior sidecar
        assert!(report.previous.is_none());

        let document_path = dir.path().join(&report.document_file);
        assert_eq!(fs::read_to_string(document_path).unwrap(), PAGE);
        assert!(
            dir.path()
                .join(format!("{}.metadata", report.document_file))
                .exists()
        );
    }

    #[tokio::test]
    async fn test_second_run_reports_previous_metadata() {
        let url = serve(PAGE).await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        run_batch(&[url.clone()], &config).await.unwrap();
        let outcomes = run_batch(&[url.clone()], &config).await.unwrap();
        let report = match &outcomes[0].status {
            CaptureStatus::Captured(report) => report,
            CaptureStatus::Failed(e) => panic!("capture failed: {}", e),
        };

        let previous = report.previous.as_ref().expect("prior sidecar");
        assert_eq!(previous, &report.current);
    }

    #[tokio::test]
    async fn test_failing_url_does_not_block_the_batch() {
        let url = serve(PAGE).await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        // Nothing listens on port 1
        let urls = vec!["http://127.0.0.1:1".to_string(), url];
        let outcomes = run_batch(&urls, &config).await.unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].status.is_success());
        assert!(outcomes[1].status.is_success());
    }

    #[tokio::test]
    async fn test_deep_fetch_localizes_images() {
        let url = serve(PAGE).await;
        let dir = tempfile::tempdir().unwrap();
        let config = CaptureConfig {
            deep_fetch: true,
            ..test_config(dir.path())
        };

        let outcomes = run_batch(&[url.clone()], &config).await.unwrap();
        let report = match &outcomes[0].status {
            CaptureStatus::Captured(report) => report,
            CaptureStatus::Failed(e) => panic!("capture failed: {}", e),
        };
        assert!(!report.localization_failed);

        let folder = format!("{}.folder", report.document_file);
        assert!(dir.path().join(&folder).join("1.jpg").exists());

        let saved = fs::read_to_string(dir.path().join(&report.document_file)).unwrap();
        assert!(saved.contains(&format!("{}/1.jpg", folder)));
        assert!(!saved.contains("pic.png"));
    }
}
