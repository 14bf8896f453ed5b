//! Parsers for the bulk-import paste box: a newline URL list, an
//! `{"images": [...]}` JSON dump, or several such blocks separated by a
//! blank line (one block per chapter).

use manga_den_common::LibraryError;
use serde_json::Value;

type Result<T> = std::result::Result<T, LibraryError>;

/// Newline-delimited URL list. Lines are trimmed; anything that does not
/// start with `http` is dropped. Order is preserved and empty input is fine.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("http"))
        .map(str::to_string)
        .collect()
}

/// Extracts the `images` array from a JSON object. A parse failure is logged
/// and yields an empty list, never an error; a non-string element inside
/// `images` is rejected outright.
pub fn parse_json(text: &str) -> Result<Vec<String>> {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("bulk import JSON did not parse: {e}");
            return Ok(Vec::new());
        }
    };

    let Some(images) = value.get("images").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    images
        .iter()
        .map(|entry| match entry {
            Value::String(url) => Ok(url.clone()),
            other => Err(LibraryError::Validation(format!(
                "images array holds a non-string entry: {other}"
            ))),
        })
        .collect()
}

/// Text that looks like JSON is tried as JSON first; if that yields nothing,
/// fall back to the plain URL list.
pub fn auto_detect(text: &str) -> Result<Vec<String>> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let urls = parse_json(text)?;
        if !urls.is_empty() {
            return Ok(urls);
        }
    }
    Ok(parse_url_list(text))
}

/// Splits the paste into chapter blocks on blank lines and auto-detects each
/// one. The returned offset is the raw zero-based block index, so a skipped
/// block (blank, or no usable URLs) still consumes its chapter number and
/// leaves a gap in the emitted sequence.
pub fn parse_multi_chapter_block(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut out = Vec::new();
    for (offset, block) in text.split("\n\n").enumerate() {
        if block.trim().is_empty() {
            continue;
        }
        let images = auto_detect(block)?;
        if images.is_empty() {
            continue;
        }
        out.push((offset, images));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_list_keeps_http_lines_in_order() {
        let urls = parse_url_list("https://a/1.jpg\nhttps://a/2.jpg\nnotaurl");
        assert_eq!(urls, vec!["https://a/1.jpg", "https://a/2.jpg"]);
    }

    #[test]
    fn url_list_trims_and_tolerates_empty_input() {
        assert_eq!(
            parse_url_list("  https://a/1.jpg  \n\n   "),
            vec!["https://a/1.jpg"]
        );
        assert!(parse_url_list("").is_empty());
    }

    #[test]
    fn json_extracts_images_array() {
        let urls = parse_json(r#"{"images":["u1","u2"]}"#).unwrap();
        assert_eq!(urls, vec!["u1", "u2"]);
    }

    #[test]
    fn json_parse_failure_yields_empty_not_error() {
        assert!(parse_json("{not json").unwrap().is_empty());
    }

    #[test]
    fn json_without_images_field_yields_empty() {
        assert!(parse_json(r#"{"pages":["u1"]}"#).unwrap().is_empty());
        assert!(parse_json(r#"["u1","u2"]"#).unwrap().is_empty());
    }

    #[test]
    fn json_rejects_non_string_images() {
        let result = parse_json(r#"{"images":["u1", 7]}"#);
        assert!(matches!(result, Err(LibraryError::Validation(_))));
    }

    #[test]
    fn auto_detect_handles_both_formats() {
        assert_eq!(
            auto_detect(r#"{"images":["u1","u2"]}"#).unwrap(),
            vec!["u1", "u2"]
        );
        assert_eq!(
            auto_detect("https://a/1.jpg\nhttps://a/2.jpg").unwrap(),
            vec!["https://a/1.jpg", "https://a/2.jpg"]
        );
    }

    #[test]
    fn auto_detect_falls_back_when_json_is_barren() {
        // Looks like JSON, parses, but has no images: fall through to the
        // URL-list path, which here finds nothing either.
        assert!(auto_detect(r#"{"other": 1}"#).unwrap().is_empty());
    }

    #[test]
    fn multi_block_numbering_is_positional() {
        let blocks =
            parse_multi_chapter_block("https://a/1.jpg\n\n\n\nhttps://b/1.jpg").unwrap();
        // Block 0 emits, block 1 is blank and skipped, block 2 emits at its
        // own offset: the middle chapter number is never used.
        assert_eq!(
            blocks,
            vec![
                (0, vec!["https://a/1.jpg".to_string()]),
                (2, vec!["https://b/1.jpg".to_string()]),
            ]
        );
    }

    #[test]
    fn multi_block_skips_blocks_without_urls() {
        let blocks = parse_multi_chapter_block(
            "not a url at all\n\nhttps://b/1.jpg\nhttps://b/2.jpg",
        )
        .unwrap();
        assert_eq!(
            blocks,
            vec![(
                1,
                vec!["https://b/1.jpg".to_string(), "https://b/2.jpg".to_string()]
            )]
        );
    }

    #[test]
    fn multi_block_accepts_json_blocks() {
        let blocks =
            parse_multi_chapter_block("{\"images\":[\"u1\"]}\n\nhttps://b/1.jpg").unwrap();
        assert_eq!(
            blocks,
            vec![
                (0, vec!["u1".to_string()]),
                (1, vec!["https://b/1.jpg".to_string()]),
            ]
        );
    }

    #[test]
    fn multi_block_empty_input_is_empty() {
        assert!(parse_multi_chapter_block("").unwrap().is_empty());
    }
}
