//! Id prefixing so many icons can share one page.
//!
//! Every id and every same-document reference to one is rewritten to
//! `<prefix>-<id>`. Plain `href` values containing a dot point at external
//! files and are left alone.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ID_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\s)id=(["'])([^"']+)(["'])"#).unwrap());

static URL_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*(['"]?)#([^'")\s]+)(['"]?)\s*\)"#).unwrap());

static XLINK_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\s)xlink:href=(["'])#([^"']+)(["'])"#).unwrap());

static HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\s)href=(["'])#([^"']+)(["'])"#).unwrap());

/// Rewrite ids and local references in `svg` with `prefix`.
pub fn prefix_ids(svg: &str, prefix: &str) -> String {
    let svg = ID_ATTR.replace_all(svg, |caps: &Captures| {
        format!("{}id={}{}-{}{}", &caps[1], &caps[2], prefix, &caps[3], &caps[4])
    });

    let svg = URL_REF.replace_all(&svg, |caps: &Captures| {
        format!("url({}#{}-{}{})", &caps[1], prefix, &caps[2], &caps[3])
    });

    let svg = XLINK_HREF.replace_all(&svg, |caps: &Captures| {
        format!("{}xlink:href={}#{}-{}{}", &caps[1], &caps[2], prefix, &caps[3], &caps[4])
    });

    let svg = HREF.replace_all(&svg, |caps: &Captures| {
        if caps[3].contains('.') {
            caps[0].to_string()
        } else {
            format!("{}href={}#{}-{}{}", &caps[1], &caps[2], prefix, &caps[3], &caps[4])
        }
    });

    svg.into_owned()
}

/// Build the per-icon prefix from its path segments.
pub fn icon_prefix(icon_type: &str, category: &str, name: &str) -> String {
    format!("{}-{}-{}", icon_type, category, name)
}
