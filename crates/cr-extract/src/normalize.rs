//! Share-text URL normalization.
//!
//! Share buttons in social apps copy a caption, emoji and the link in one
//! blob, e.g. `"https://v.douyin.com/GMh4jlA6dKs/ jCh:/ i@C.uS 07/31"`.

use regex::Regex;
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL_REGEX should be valid"));

/// Return the first `http(s)://` run of non-whitespace in `raw`, or `raw`
/// unchanged when there is none.
pub fn normalize(raw: &str) -> String {
    match URL_REGEX.find(raw) {
        Some(m) => m.as_str().to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_share_text() {
        let raw = "https://v.douyin.com/GMh4jlA6dKs/ jCh:/ i@C.uS 07/31";
        assert_eq!(normalize(raw), "https://v.douyin.com/GMh4jlA6dKs/");
    }

    #[test]
    fn strips_leading_caption() {
        let raw = "7.94 复制打开抖音，看看【作品】 https://v.douyin.com/iRNBho6u/ 复制此链接";
        assert_eq!(normalize(raw), "https://v.douyin.com/iRNBho6u/");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            normalize("\n\t  http://example.com/v?id=1  \n"),
            "http://example.com/v?id=1"
        );
    }

    #[test]
    fn picks_first_of_several() {
        assert_eq!(
            normalize("see https://a.example/1 and https://b.example/2"),
            "https://a.example/1"
        );
    }

    #[test]
    fn identity_without_url() {
        for raw in ["", "just words", "ftp://files.example/x", "douyin.com/abc"] {
            assert_eq!(normalize(raw), raw);
        }
    }

    #[test]
    fn bare_scheme_is_not_a_url() {
        assert_eq!(normalize("https:// nothing"), "https:// nothing");
    }

    #[test]
    fn clean_url_is_unchanged() {
        let url = "https://www.tiktok.com/@user/video/7234567890123456789";
        assert_eq!(normalize(url), url);
    }
}
