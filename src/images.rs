use crate::fetcher::{PageCapture, PageFetcher};
use crate::naming;
use ego_tree::NodeId;
use scraper::{Html, Node, Selector};
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Failure that aborts the localization pass for a page
#[derive(Debug, Error)]
pub enum LocalizeError {
    #[error("failed to create asset folder {path}: {source}")]
    CreateFolder {
        path: String,
        source: std::io::Error,
    },
}

/// Failure localizing a single image; recovered without aborting the pass
#[derive(Debug, Error)]
pub enum ImageDownloadError {
    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Classification of an image source attribute against the page's fetch URL
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Already-absolute source; left untouched and never downloaded
    Absolute,

    /// Source resolved to a downloadable URL
    Resolved(Url),
}

/// Classify and resolve an image source.
///
/// Sources beginning with `http` are absolute and used as-is. Sources
/// beginning with `/` resolve against the host root of the fetch URL;
/// anything else resolves against the document's containing directory.
pub fn resolve_image_source(src: &str, fetch_url: &str) -> Result<ImageSource, url::ParseError> {
    if src.starts_with("http") {
        return Ok(ImageSource::Absolute);
    }
    let base = naming::resolve_base_url(fetch_url, !src.starts_with('/'))?;
    Ok(ImageSource::Resolved(base.join(src)?))
}

/// Tally of a localization pass over one page
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalizeOutcome {
    /// Image elements that carried a source attribute
    pub attempted: usize,

    /// Images downloaded and rewritten to a local path
    pub downloaded: usize,

    /// Images that could not be resolved, downloaded, or written
    pub failed: usize,
}

/// Download every resolvable image on the page and rewrite its reference to
/// the local copy.
///
/// Images are numbered `1.jpg`, `2.jpg`, ... in document order inside the
/// page's asset folder; the counter advances for every element with a source
/// attribute, whether or not localizing it succeeded, so repeat runs produce
/// stable names. Elements without a source attribute are skipped. A failure
/// on one image never aborts the rest; only failure to create the asset
/// folder does.
pub async fn localize_images(
    capture: &mut PageCapture,
    fetcher: &PageFetcher,
    output_dir: &Path,
) -> Result<LocalizeOutcome, LocalizeError> {
    let folder_name = naming::asset_folder_name(&capture.url);
    let folder_path = output_dir.join(&folder_name);

    let selector = Selector::parse("img").unwrap();
    let elements: Vec<(NodeId, String)> = capture
        .document
        .select(&selector)
        .filter_map(|element| {
            element
                .value()
                .attr("src")
                .map(|src| (element.id(), src.to_string()))
        })
        .collect();

    let mut outcome = LocalizeOutcome::default();
    let mut counter = 1usize;
    let mut rewritten = false;

    for (node_id, src) in elements {
        outcome.attempted += 1;
        match resolve_image_source(&src, &capture.url) {
            Ok(ImageSource::Absolute) => {
                ::log::debug!("Leaving absolute image source untouched: {}", src);
            }
            Ok(ImageSource::Resolved(remote)) => {
                fs::create_dir_all(&folder_path).map_err(|source| LocalizeError::CreateFolder {
                    path: folder_path.display().to_string(),
                    source,
                })?;

                let file_name = format!("{}.jpg", counter);
                match save_image(fetcher, &remote, &folder_path.join(&file_name)).await {
                    Ok(()) => {
                        let local = format!("{}/{}", folder_name, file_name);
                        rewrite_source(&mut capture.document, node_id, &local);
                        rewritten = true;
                        outcome.downloaded += 1;
                        ::log::debug!("Localized {} -> {}", remote, local);
                    }
                    Err(e) => {
                        ::log::warn!("Failed to localize image {}: {}", remote, e);
                        outcome.failed += 1;
                    }
                }
            }
            Err(e) => {
                ::log::warn!("Skipping image with unresolvable source {:?}: {}", src, e);
                outcome.failed += 1;
            }
        }
        counter += 1;
    }

    if rewritten {
        capture.text = capture.document.root_element().html();
    }
    Ok(outcome)
}

async fn save_image(
    fetcher: &PageFetcher,
    url: &Url,
    path: &Path,
) -> Result<(), ImageDownloadError> {
    let bytes = fetcher.download(url).await?;
    fs::write(path, bytes).map_err(|source| ImageDownloadError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Point an image element's source attribute at its local copy
fn rewrite_source(document: &mut Html, id: NodeId, local: &str) {
    if let Some(mut node) = document.tree.get_mut(id) {
        if let Node::Element(element) = node.value() {
            for (name, value) in element.attrs.iter_mut() {
                if &*name.local == "src" {
                    *value = local.into();
                }
            }
        }
    }
}
