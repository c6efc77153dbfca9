use url::Url;

/// Ensure a URL has a scheme, defaulting to `http://` when none is present.
pub fn with_scheme(url: &str) -> String {
    if Url::parse(url).is_ok() {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Derive the filesystem-safe identifier for a URL.
///
/// The `scheme://` prefix is stripped when the URL carries one, then every
/// `/` becomes `_`. Same URL in, same identifier out, so repeat fetches land
/// on the same artifact. URLs that differ only in scheme collide; callers
/// accept that.
pub fn artifact_identifier(url: &str) -> String {
    let without_scheme = match Url::parse(url) {
        Ok(parsed) => {
            let prefix = format!("{}://", parsed.scheme());
            match url.get(..prefix.len()) {
                Some(head) if head.eq_ignore_ascii_case(&prefix) => &url[prefix.len()..],
                _ => url,
            }
        }
        Err(_) => url,
    };
    without_scheme.replace('/', "_")
}

/// File name for the saved document: the identifier with a single `.html`
/// suffix.
pub fn document_file_name(url: &str) -> String {
    let identifier = artifact_identifier(url);
    if identifier.ends_with(".html") {
        identifier
    } else {
        format!("{}.html", identifier)
    }
}

/// File name for the metadata sidecar stored next to the document.
pub fn metadata_file_name(url: &str) -> String {
    format!("{}.metadata", document_file_name(url))
}

/// Name of the per-page folder that holds localized image assets.
pub fn asset_folder_name(url: &str) -> String {
    format!("{}.folder", document_file_name(url))
}

/// Build the base URL that image sources resolve against.
///
/// Query and fragment are stripped. With `relative_to_document` the path is
/// the URL's containing directory; without it the path is the host root.
pub fn resolve_base_url(url: &str, relative_to_document: bool) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(&with_scheme(url))?;
    base.set_query(None);
    base.set_fragment(None);
    if relative_to_document {
        if let Ok(mut segments) = base.path_segments_mut() {
            // Drop the final segment, keep the trailing slash of the directory
            segments.pop().push("");
        }
    } else {
        base.set_path("/");
    }
    Ok(base)
}
