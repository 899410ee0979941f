//! Rewrites rendered pages before they reach the preview file.
//!
//! The renderer emits pages that reference its own static assets and carry
//! working hyperlinks. Served locally, the asset paths dangle and the links
//! navigate the embedding pane away, so both are rewritten here.

use std::sync::LazyLock;

use regex::Regex;

/// Asset path prefix the renderer bakes into its pages.
const RENDERER_ASSET_PREFIX: &str = "/lib/godoc";

/// Local directory the static assets are served from instead.
const LOCAL_ASSET_PREFIX: &str = "./ext";

// Any href that is not a same-page anchor.
static NON_ANCHOR_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a href="[^#].*?""#).expect("non-anchor href pattern"));

/// Rewrite a rendered page for local embedding: point static assets at the
/// local copies and neutralize every href that would navigate the pane away
/// (anything that is not an in-page anchor).
pub fn sanitize_page(page: &str) -> String {
    let page = page.replace(RENDERER_ASSET_PREFIX, LOCAL_ASSET_PREFIX);
    NON_ANCHOR_HREF
        .replace_all(&page, r#"$0 style="pointer-events:none""#)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_paths_rewritten_to_local_copies() {
        let page = r#"<link href="/lib/godoc/style.css"><script src="/lib/godoc/godocs.js">"#;
        let out = sanitize_page(page);
        assert!(out.contains(r#"href="./ext/style.css""#));
        assert!(out.contains(r#"src="./ext/godocs.js""#));
        assert!(!out.contains("/lib/godoc"));
    }

    #[test]
    fn test_external_links_are_neutralized() {
        let page = r#"<a href="https://example.com/pkg">pkg</a>"#;
        let out = sanitize_page(page);
        assert_eq!(
            out,
            r#"<a href="https://example.com/pkg" style="pointer-events:none">pkg</a>"#
        );
    }

    #[test]
    fn test_anchor_links_are_left_clickable() {
        let page = r##"<a href="#section">jump</a>"##;
        assert_eq!(sanitize_page(page), page);
    }

    #[test]
    fn test_mixed_links_only_touch_non_anchors() {
        let page = r##"<a href="#top">top</a> <a href="/pkg/fmt">fmt</a>"##;
        let out = sanitize_page(page);
        assert!(out.contains(r##"<a href="#top">top</a>"##));
        assert!(out.contains(r#"<a href="/pkg/fmt" style="pointer-events:none">fmt</a>"#));
    }
}
