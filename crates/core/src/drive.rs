//! Google Drive share-link to thumbnail conversion

const THUMBNAIL_BASE: &str = "https://drive.google.com/thumbnail";

/// Convert a Drive "file/d/{id}/view" share link into a thumbnail URL at the
/// requested pixel width. Idempotent on already-converted URLs; unrecognized
/// URLs pass through unchanged and may simply fail to render as an image.
pub fn thumbnail_url(url: &str, width: u32) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.contains("thumbnail?") {
        return url.to_string();
    }
    match extract_file_id(url) {
        Some(id) => format!("{}?id={}&sz=w{}", THUMBNAIL_BASE, id, width),
        None => url.to_string(),
    }
}

fn extract_file_id(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/file/d/")?;
    let id = rest.split(['/', '?', '#']).next()?;
    (!id.is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_share_link_and_is_idempotent() {
        let converted =
            thumbnail_url("https://drive.google.com/file/d/ABC123/view?usp=sharing", 400);
        assert!(converted.contains("id=ABC123"));
        assert!(converted.contains("sz=w400"));
        assert_eq!(thumbnail_url(&converted, 400), converted);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(thumbnail_url("", 400), "");
    }

    #[test]
    fn foreign_urls_pass_through_unchanged() {
        let url = "https://example.com/image.png";
        assert_eq!(thumbnail_url(url, 400), url);
    }
}
