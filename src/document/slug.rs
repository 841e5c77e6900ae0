//! File-system safe names for icon sets and categories.

/// Legacy prefix some component names still carry.
const LEGACY_PREFIX: &str = "GTP-";

/// Turn a component or label name into a kebab-case slug.
///
/// `GTP-` is removed first, then camelCase boundaries become hyphens,
/// spaces/underscores become hyphens and anything outside `[a-z0-9-]` is
/// dropped. Hyphen runs collapse and edge hyphens are trimmed.
pub fn slugify(name: &str) -> String {
    let name = name.strip_prefix(LEGACY_PREFIX).unwrap_or(name);

    let mut out = String::with_capacity(name.len());
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
                push_hyphen(&mut out);
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        } else if ch == '-' || ch == '_' || ch.is_whitespace() {
            push_hyphen(&mut out);
        }
        prev = Some(ch);
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn push_hyphen(out: &mut String) {
    if !out.is_empty() && !out.ends_with('-') {
        out.push('-');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_to_kebab() {
        assert_eq!(slugify("labelAdd"), "label-add");
        assert_eq!(slugify("LabelAdd"), "label-add");
        assert_eq!(slugify("arrow2Up"), "arrow2-up");
    }

    #[test]
    fn test_spaces_and_underscores() {
        assert_eq!(slugify("Label Add"), "label-add");
        assert_eq!(slugify("label_add"), "label-add");
        assert_eq!(slugify("  label -- add  "), "label-add");
    }

    #[test]
    fn test_invalid_chars_stripped() {
        assert_eq!(slugify("Wallet (Old)!"), "wallet-old");
        assert_eq!(slugify("ETH/BTC"), "ethbtc");
    }

    #[test]
    fn test_legacy_prefix_removed() {
        assert_eq!(slugify("GTP-LabelAdd"), "label-add");
        // Only the exact prefix is removed
        assert_eq!(slugify("gtp-label"), "gtp-label");
    }

    #[test]
    fn test_acronyms_stay_together() {
        assert_eq!(slugify("NFTGallery"), "nftgallery");
    }

    #[test]
    fn test_empty_after_stripping() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("GTP-"), "");
    }
}
