//! Strict parsing of fetched response bodies into caller-declared shapes.

use serde::de::DeserializeOwned;

use crate::FetchFailure;

const BODY_PREVIEW_LIMIT: usize = 200;

/// Deserialize a response body into `T`, failing with [`FetchFailure::Parse`].
///
/// Malformed JSON and well-formed JSON that does not match `T` are both parse
/// failures. The failure carries up to 200 characters of the body, with
/// whitespace collapsed, to aid debugging truncated or unexpected payloads.
pub fn parse_resource<T: DeserializeOwned>(reference: &str, body: &str) -> Result<T, FetchFailure> {
    serde_json::from_str::<T>(body)
        .map_err(|error| FetchFailure::parse(reference, error.to_string(), truncate_response_preview(body, BODY_PREVIEW_LIMIT)))
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    let mut kept = 0;
    for ch in text.chars() {
        if kept >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                    kept += 1;
                }
            }
            _ => {
                preview.push(ch);
                kept += 1;
            }
        }
    }

    preview.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use holonet_types::Planet;

    #[test]
    fn parse_resource_keeps_projection_only() {
        let planet: Planet = parse_resource("/planets/1", r#"{"name":"Tatooine","climate":"arid"}"#).expect("planet");
        assert_eq!(planet.name, "Tatooine");
    }

    #[test]
    fn parse_resource_reports_malformed_json() {
        let error = parse_resource::<Planet>("/planets/1", "<html>\n\tbad gateway\n</html>").expect_err("must fail");
        match error {
            FetchFailure::Parse {
                reference, body_preview, ..
            } => {
                assert_eq!(reference, "/planets/1");
                assert_eq!(body_preview, "<html> bad gateway </html>");
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn parse_resource_reports_shape_mismatch() {
        let error = parse_resource::<Planet>("/planets/1", r#"{"title":"A New Hope"}"#).expect_err("must fail");
        assert!(matches!(error, FetchFailure::Parse { .. }));
    }

    #[test]
    fn truncate_response_preview_marks_empty_and_long_bodies() {
        assert_eq!(truncate_response_preview("  ", 10), "<empty>");
        assert_eq!(truncate_response_preview("abcdefghijkl", 5), "abcde...");
    }

    #[test]
    fn truncate_response_preview_counts_characters_not_bytes() {
        assert_eq!(truncate_response_preview("ééééé", 5), "ééééé");
        assert_eq!(truncate_response_preview("Ålderaan", 3), "Åld...");
    }
}
