//! Per-icon SVG normalization: optimize, prefix ids, drop intrinsic size.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::warn;

use super::optimize::SvgOptimizer;
use super::prefix::prefix_ids;

/// Normalized markup plus the recoverable problems met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSvg {
    pub content: String,
    pub warnings: Vec<String>,
}

/// Normalize raw exported markup for inlining next to other icons.
///
/// Never fails: an optimizer error keeps the raw markup, and a missing or
/// unreadable root keeps the prefixed markup with its width/height.
pub fn normalize_svg(raw: &str, prefix: &str, optimizer: &dyn SvgOptimizer) -> NormalizedSvg {
    let mut warnings = Vec::new();

    let optimized = match optimizer.optimize(raw) {
        Ok(optimized) => optimized,
        Err(e) => {
            warn!(%prefix, error = %e, "optimizer failed, using unoptimized markup");
            warnings.push(format!("optimizer failed, kept unoptimized markup: {}", e));
            raw.to_string()
        }
    };

    let prefixed = prefix_ids(&optimized, prefix);

    let content = match strip_root_dimensions(&prefixed) {
        Ok(stripped) => stripped,
        Err(reason) => {
            warn!(%prefix, %reason, "could not strip root dimensions");
            warnings.push(format!("kept root width/height: {}", reason));
            prefixed
        }
    };

    NormalizedSvg { content, warnings }
}

/// Remove `width` and `height` from the root `<svg>` element only.
pub fn strip_root_dimensions(svg: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());
    let mut root_seen = false;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;
        let event = match event {
            Event::Eof => break,
            Event::Start(e) if !root_seen => {
                root_seen = true;
                Event::Start(root_without_dimensions(&e)?)
            }
            Event::Empty(e) if !root_seen => {
                root_seen = true;
                Event::Empty(root_without_dimensions(&e)?)
            }
            other => other,
        };
        writer.write_event(event).map_err(|e| e.to_string())?;
    }

    if !root_seen {
        return Err("no root element".to_string());
    }

    String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())
}

fn root_without_dimensions(e: &BytesStart) -> Result<BytesStart<'static>, String> {
    if e.local_name().as_ref() != b"svg" {
        return Err(format!(
            "root element is <{}>, not <svg>",
            String::from_utf8_lossy(e.name().as_ref())
        ));
    }

    let mut root = BytesStart::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes().with_checks(false).flatten() {
        let key = attr.key.as_ref();
        if key == b"width" || key == b"height" {
            continue;
        }
        root.push_attribute(attr);
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SwatchError};
    use crate::svg::optimize::Passthrough;

    struct Failing;

    impl SvgOptimizer for Failing {
        fn optimize(&self, _svg: &str) -> Result<String> {
            Err(SwatchError::Parse {
                message: "boom".to_string(),
                help: None,
            })
        }
    }

    const RAW: &str = r##"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><rect width="4" height="4" fill="url(#paint0)"/><defs><linearGradient id="paint0"><stop stop-color="#f00"/></linearGradient></defs></svg>"##;

    #[test]
    fn test_normalize_strips_root_size_and_prefixes() {
        let normalized = normalize_svg(RAW, "icon-misc-box", &Passthrough);

        assert!(normalized.warnings.is_empty());
        assert_eq!(
            normalized.content,
            r##"<svg viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><rect width="4" height="4" fill="url(#icon-misc-box-paint0)"/><defs><linearGradient id="icon-misc-box-paint0"><stop stop-color="#f00"/></linearGradient></defs></svg>"##
        );
    }

    #[test]
    fn test_optimizer_failure_is_not_fatal() {
        let normalized = normalize_svg(RAW, "p", &Failing);

        assert_eq!(normalized.warnings.len(), 1);
        assert!(normalized.content.contains(r#"id="p-paint0""#));
        assert!(!normalized.content.starts_with(r#"<svg width"#));
    }

    #[test]
    fn test_missing_root_keeps_prefixed_content() {
        let raw = r#"<g width="2"><path id="a"/></g>"#;
        let normalized = normalize_svg(raw, "p", &Passthrough);

        assert_eq!(normalized.content, r#"<g width="2"><path id="p-a"/></g>"#);
        assert_eq!(normalized.warnings.len(), 1);
    }

    #[test]
    fn test_xml_declaration_is_preserved() {
        let svg = r#"<?xml version="1.0"?><svg height="10" viewBox="0 0 10 10"/>"#;
        assert_eq!(
            strip_root_dimensions(svg).unwrap(),
            r#"<?xml version="1.0"?><svg viewBox="0 0 10 10"/>"#
        );
    }

    #[test]
    fn test_empty_document_has_no_root() {
        assert!(strip_root_dimensions("").is_err());
    }
}
