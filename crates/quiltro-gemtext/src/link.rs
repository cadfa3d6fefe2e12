//! Link target rewriting for HTML output.
//!
//! Gemtext documents link to each other by their `.gmi` source names and to
//! other gemini capsules by `gemini://` URLs. Neither works in a browser, so
//! local links are pointed at the rendered `.html` page and foreign capsules
//! are routed through an HTTP gateway.

/// Extension of gemtext source documents.
pub(crate) const SOURCE_EXTENSION: &str = ".gmi";

/// Extension of rendered pages.
pub(crate) const HTML_EXTENSION: &str = ".html";

/// Scheme of the gemini protocol.
const GEMINI_SCHEME: &str = "gemini";

/// Default HTTP gateway for `gemini://` links.
pub const DEFAULT_GATEWAY: &str = "http://portal.mozz.us/gemini";

/// Link target after rewriting.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ResolvedLink {
    /// Final URL, not yet HTML-escaped.
    pub href: String,
    /// Whether the final URL carries a scheme.
    pub external: bool,
    /// Whether the final path looks like an image.
    pub image: bool,
}

/// Rewrite a raw link target for the browser and classify it.
pub(crate) fn resolve(url: &str, gateway: &str) -> ResolvedLink {
    let href = match split_scheme(url) {
        (None, rest) => rewrite_local(rest),
        (Some(scheme), rest) if scheme.eq_ignore_ascii_case(GEMINI_SCHEME) => {
            through_gateway(rest, gateway)
        }
        (Some(_), _) => url.to_owned(),
    };

    let (scheme, rest) = split_scheme(&href);
    ResolvedLink {
        external: scheme.is_some(),
        image: is_image(path_of(rest)),
        href,
    }
}

/// `page.gmi` → `page.html`, keeping query and fragment.
fn rewrite_local(url: &str) -> String {
    let (target, suffix) = split_suffix(url);
    match target.strip_suffix(SOURCE_EXTENSION) {
        Some(stem) if path_of(target).ends_with(SOURCE_EXTENSION) => {
            format!("{stem}{HTML_EXTENSION}{suffix}")
        }
        _ => url.to_owned(),
    }
}

/// `//host/path` → `{gateway}/host/path`.
fn through_gateway(rest: &str, gateway: &str) -> String {
    format!(
        "{}/{}",
        gateway.trim_end_matches('/'),
        rest.trim_start_matches('/')
    )
}

/// Split off an RFC 3986 scheme (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`).
fn split_scheme(url: &str) -> (Option<&str>, &str) {
    let Some((scheme, rest)) = url.split_once(':') else {
        return (None, url);
    };
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if valid {
        (Some(scheme), rest)
    } else {
        (None, url)
    }
}

/// Split `path?query#fragment` into the path part and the rest.
fn split_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    }
}

/// Path component of a scheme-less reference, without authority or query.
fn path_of(rest: &str) -> &str {
    let (target, _) = split_suffix(rest);
    match target.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path
            .find('/')
            .map_or("", |pos| &authority_and_path[pos..]),
        None => target,
    }
}

/// Guess whether `path` names an image from its extension.
fn is_image(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    mime_guess::from_ext(ext)
        .first()
        .is_some_and(|mime| mime.type_() == mime_guess::mime::IMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn href(url: &str) -> String {
        resolve(url, DEFAULT_GATEWAY).href
    }

    #[test]
    fn test_local_gmi_rewritten() {
        assert_eq!(href("/x.gmi"), "/x.html");
        assert_eq!(href("posts/hello.gmi"), "posts/hello.html");
        assert_eq!(href("../up.gmi#section"), "../up.html#section");
        assert_eq!(href("a.gmi?q=1"), "a.html?q=1");
    }

    #[test]
    fn test_local_non_gmi_unchanged() {
        assert_eq!(href("/about"), "/about");
        assert_eq!(href("notes.txt"), "notes.txt");
        assert_eq!(href("/dir.gmi/"), "/dir.gmi/");
        assert_eq!(href("#top"), "#top");
        assert_eq!(href("?x=a.gmi"), "?x=a.gmi");
    }

    #[test]
    fn test_authority_only_is_not_an_extension() {
        assert_eq!(href("//example.gmi"), "//example.gmi");
        assert_eq!(href("//host/page.gmi"), "//host/page.html");
    }

    #[test]
    fn test_gemini_through_gateway() {
        assert_eq!(
            href("gemini://example.org/posts/1.gmi"),
            "http://portal.mozz.us/gemini/example.org/posts/1.gmi"
        );
        assert_eq!(
            href("GEMINI://example.org/"),
            "http://portal.mozz.us/gemini/example.org/"
        );
    }

    #[test]
    fn test_custom_gateway_trailing_slash() {
        let link = resolve("gemini://cap.example/", "https://proxy.example/g/");
        assert_eq!(link.href, "https://proxy.example/g/cap.example/");
        assert!(link.external);
    }

    #[test]
    fn test_other_schemes_unchanged() {
        let link = resolve("https://example.com/page.gmi", DEFAULT_GATEWAY);
        assert_eq!(link.href, "https://example.com/page.gmi");
        assert!(link.external);
        assert!(!link.image);

        assert_eq!(href("mailto:someone@example.com"), "mailto:someone@example.com");
    }

    #[test]
    fn test_external_flag() {
        assert!(!resolve("/x.gmi", DEFAULT_GATEWAY).external);
        assert!(resolve("gemini://a/", DEFAULT_GATEWAY).external);
    }

    #[test]
    fn test_image_detection() {
        assert!(resolve("/img/cat.png", DEFAULT_GATEWAY).image);
        assert!(resolve("photo.JPG", DEFAULT_GATEWAY).image);
        assert!(resolve("https://example.com/a.gif?size=2", DEFAULT_GATEWAY).image);
        assert!(resolve("gemini://cap/pic.jpeg", DEFAULT_GATEWAY).image);
        assert!(!resolve("/doc.pdf", DEFAULT_GATEWAY).image);
        assert!(!resolve("/x.gmi", DEFAULT_GATEWAY).image);
        assert!(!resolve("https://example.png", DEFAULT_GATEWAY).image);
        assert!(!resolve("/no-extension", DEFAULT_GATEWAY).image);
    }

    #[test]
    fn test_split_scheme() {
        assert_eq!(split_scheme("http://a"), (Some("http"), "//a"));
        assert_eq!(split_scheme("git+ssh://a"), (Some("git+ssh"), "//a"));
        assert_eq!(split_scheme("/path:with:colons"), (None, "/path:with:colons"));
        assert_eq!(split_scheme("1abc:x"), (None, "1abc:x"));
        assert_eq!(split_scheme(":x"), (None, ":x"));
        assert_eq!(split_scheme("plain"), (None, "plain"));
    }
}
