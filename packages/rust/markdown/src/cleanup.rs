//! Excerpt cleanup passes.
//!
//! Each pass is a function `&str -> String` applied in sequence. Excerpts
//! are embedded in a README hosted elsewhere, so root-relative links must
//! become absolute.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Run the full cleanup pipeline on a raw TL;DR excerpt.
pub fn sanitize_excerpt(excerpt: &str, site_url: &Url) -> String {
    let mut result = excerpt.replace("\r\n", "\n");

    result = trim_trailing_whitespace(&result);
    result = trim_blank_edges(&result);
    result = absolutize_links(&result, site_url);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Trailing whitespace
// ---------------------------------------------------------------------------

fn trim_trailing_whitespace(md: &str) -> String {
    md.lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Pass 2: Leading/trailing blank lines
// ---------------------------------------------------------------------------

fn trim_blank_edges(md: &str) -> String {
    md.trim_matches('\n').to_string()
}

// ---------------------------------------------------------------------------
// Pass 3: Root-relative links
// ---------------------------------------------------------------------------

/// Prefix root-relative link targets (`](/path)`) with `site_url`.
///
/// The target text is kept verbatim and any path on `site_url` is preserved.
/// Applies to both links and images. Absolute URLs, anchors, `mailto:`,
/// protocol-relative (`//host`) and document-relative targets are left as-is.
pub fn absolutize_links(md: &str, site_url: &Url) -> String {
    static ROOT_LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\]\((/[^)\s]*)").expect("valid regex"));

    let base = site_url.as_str().trim_end_matches('/');

    ROOT_LINK_RE
        .replace_all(md, |caps: &regex::Captures| {
            let href = &caps[1];
            if href.starts_with("//") {
                return caps[0].to_string();
            }
            format!("]({base}{href}")
        })
        .to_string()
}

// ---------------------------------------------------------------------------
// Indentation
// ---------------------------------------------------------------------------

/// Indent every non-blank line by `width` spaces. Blank lines stay empty so
/// the output carries no trailing whitespace.
pub fn indent(md: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    md.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://www.greatfrontend.com").unwrap()
    }

    #[test]
    fn absolutize_links_rewrites_root_relative() {
        let input = "See [the guide](/questions/quiz/foo) for more.";
        assert_eq!(
            absolutize_links(input, &site()),
            "See [the guide](https://www.greatfrontend.com/questions/quiz/foo) for more."
        );
    }

    #[test]
    fn absolutize_links_keeps_fragment_and_title() {
        let input = r#"[a](/docs/x#part "Title")"#;
        assert_eq!(
            absolutize_links(input, &site()),
            r#"[a](https://www.greatfrontend.com/docs/x#part "Title")"#
        );
    }

    #[test]
    fn absolutize_links_absolute_untouched() {
        let input = "[Link](https://angular.dev/overview) and [mail](mailto:a@b.c)";
        assert_eq!(absolutize_links(input, &site()), input);
    }

    #[test]
    fn absolutize_links_other_relative_forms_untouched() {
        let input = "[anchor](#top) [doc](./sibling) [cdn](//cdn.example.com/x.js)";
        assert_eq!(absolutize_links(input, &site()), input);
    }

    #[test]
    fn absolutize_links_keeps_target_verbatim() {
        let input = "[up](/questions/../b) [tpl](/docs/{id}) [uml](/ü)";
        assert_eq!(
            absolutize_links(input, &site()),
            "[up](https://www.greatfrontend.com/questions/../b) \
             [tpl](https://www.greatfrontend.com/docs/{id}) \
             [uml](https://www.greatfrontend.com/ü)"
        );
    }

    #[test]
    fn absolutize_links_keeps_site_path() {
        let site = Url::parse("https://example.com/angular").unwrap();
        assert_eq!(absolutize_links("[a](/q)", &site), "[a](https://example.com/angular/q)");

        let trailing = Url::parse("https://example.com/angular/").unwrap();
        assert_eq!(absolutize_links("[a](/q)", &trailing), "[a](https://example.com/angular/q)");
    }

    #[test]
    fn absolutize_links_rewrites_images() {
        let input = "![diagram](/img/flow.png)";
        assert_eq!(
            absolutize_links(input, &site()),
            "![diagram](https://www.greatfrontend.com/img/flow.png)"
        );
    }

    #[test]
    fn sanitize_excerpt_trims_and_normalizes() {
        let input = "\r\nFirst line.   \r\n\r\nSecond [x](/y).\r\n\r\n";
        assert_eq!(
            sanitize_excerpt(input, &site()),
            "First line.\n\nSecond [x](https://www.greatfrontend.com/y)."
        );
    }

    #[test]
    fn sanitize_excerpt_keeps_code_indentation() {
        let input = "Example:\n\n```ts\n  const x = 1;\n```";
        assert_eq!(sanitize_excerpt(input, &site()), input);
    }

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent("a\n\n  b", 4), "    a\n\n      b");
        assert_eq!(indent("a\n   \nb", 2), "  a\n\n  b");
    }
}
