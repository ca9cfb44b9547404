//! Cell value formatting rules.

use crate::model::{BinaryInfo, Value};

use super::tree::CellContent;

/// Binary images at or above this size render as captions, not thumbnails.
pub const THUMBNAIL_MAX_BYTES: u64 = 1024 * 1024;

/// Projects one field value into its cell form. `None` is a missing field.
pub fn format_value(value: Option<&Value>) -> CellContent {
    let Some(value) = value else {
        return CellContent::Empty;
    };
    match value {
        Value::Null => CellContent::Null,
        Value::Number(n) if *n < 0.0 => CellContent::Negative(value.display_string()),
        Value::Binary(info) => format_binary(info),
        Value::Array(items) => CellContent::Expandable {
            summary: format!("Array[{}]", items.len()),
            body: pretty_body(value),
        },
        Value::Object(_) => CellContent::Expandable {
            summary: "Object".to_string(),
            body: pretty_body(value),
        },
        _ => CellContent::Text(value.display_string()),
    }
}

fn format_binary(info: &BinaryInfo) -> CellContent {
    if info.mime_type.starts_with("image/") && info.size < THUMBNAIL_MAX_BYTES {
        CellContent::Thumbnail {
            caption: caption(info, false),
        }
    } else {
        CellContent::Binary {
            caption: caption(info, true),
        }
    }
}

/// Caption text: `File: <name> (<kb>KB[, <mime>])` for named payloads,
/// `Blob (<kb>KB[, <mime>])` for anonymous ones.
fn caption(info: &BinaryInfo, with_mime: bool) -> String {
    let kb = info.size as f64 / 1024.0;
    let mime = if with_mime {
        let mime = if info.mime_type.is_empty() {
            "unknown type"
        } else {
            &info.mime_type
        };
        format!(", {}", mime)
    } else {
        String::new()
    };
    if info.name_hint.is_empty() {
        format!("Blob ({:.1}KB{})", kb, mime)
    } else {
        format!("File: {} ({:.1}KB{})", info.name_hint, kb, mime)
    }
}

fn pretty_body(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.display_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(size: u64, mime: &str, name: &str) -> Value {
        Value::Binary(BinaryInfo {
            size,
            mime_type: mime.to_string(),
            name_hint: name.to_string(),
        })
    }

    #[test]
    fn test_scalars() {
        assert_eq!(format_value(None), CellContent::Empty);
        assert_eq!(format_value(Some(&Value::Null)), CellContent::Null);
        assert_eq!(
            format_value(Some(&Value::Bool(false))),
            CellContent::Text("false".to_string())
        );
        assert_eq!(
            format_value(Some(&Value::String("ok".to_string()))),
            CellContent::Text("ok".to_string())
        );
        assert_eq!(
            format_value(Some(&Value::Number(12.0))),
            CellContent::Text("12".to_string())
        );
    }

    #[test]
    fn test_negative_number_gets_warning_form() {
        assert_eq!(
            format_value(Some(&Value::Number(-3.5))),
            CellContent::Negative("-3.5".to_string())
        );
        // Zero is not negative.
        assert_eq!(
            format_value(Some(&Value::Number(0.0))),
            CellContent::Text("0".to_string())
        );
    }

    #[test]
    fn test_small_image_is_thumbnail() {
        let cell = format_value(Some(&binary(34_520, "image/png", "trench-east.png")));
        assert_eq!(
            cell,
            CellContent::Thumbnail {
                caption: "File: trench-east.png (33.7KB)".to_string()
            }
        );
    }

    #[test]
    fn test_thumbnail_threshold_is_strict() {
        // Exactly 1 MiB falls back to the caption form.
        let at_limit = format_value(Some(&binary(THUMBNAIL_MAX_BYTES, "image/png", "big.png")));
        assert!(matches!(at_limit, CellContent::Binary { .. }));

        let below = format_value(Some(&binary(THUMBNAIL_MAX_BYTES - 1, "image/png", "ok.png")));
        assert!(matches!(below, CellContent::Thumbnail { .. }));
    }

    #[test]
    fn test_non_image_binary_caption_includes_mime() {
        let cell = format_value(Some(&binary(2_480_113, "application/pdf", "as-built.pdf")));
        assert_eq!(
            cell,
            CellContent::Binary {
                caption: "File: as-built.pdf (2422.0KB, application/pdf)".to_string()
            }
        );
    }

    #[test]
    fn test_anonymous_blob_and_unknown_type() {
        let cell = format_value(Some(&binary(1_572_864, "image/jpeg", "")));
        assert_eq!(
            cell,
            CellContent::Binary {
                caption: "Blob (1536.0KB, image/jpeg)".to_string()
            }
        );

        let cell = format_value(Some(&binary(18_204, "", "signature.bin")));
        assert_eq!(
            cell,
            CellContent::Binary {
                caption: "File: signature.bin (17.8KB, unknown type)".to_string()
            }
        );
    }

    #[test]
    fn test_array_and_object_collapse_with_pretty_body() {
        let value = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]);
        let CellContent::Expandable { summary, body } = format_value(Some(&value)) else {
            panic!("expected expandable cell");
        };
        assert_eq!(summary, "Array[2]");
        assert_eq!(body, "[\n  1.0,\n  2.0\n]");

        let value = Value::Object(vec![("done".to_string(), Value::Bool(true))]);
        let CellContent::Expandable { summary, body } = format_value(Some(&value)) else {
            panic!("expected expandable cell");
        };
        assert_eq!(summary, "Object");
        assert!(body.contains("\"done\": true"));
    }
}
