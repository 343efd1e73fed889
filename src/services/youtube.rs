use regex::Regex;
use std::sync::OnceLock;

static VIDEO_ID: OnceLock<Regex> = OnceLock::new();

/// Extracts the canonical 11-character video identifier from a URL
///
/// Recognizes watch links (`v` query parameter), embed and `/v/` links,
/// `youtube-nocookie.com` links, and `youtu.be` short links. Returns `None`
/// for everything else; callers skip non-matches rather than treating them as
/// failures.
pub fn video_id(url: &str) -> Option<String> {
    let re = VIDEO_ID.get_or_init(|| {
        Regex::new(
            r"(?:youtube(?:-nocookie)?\.com/(?:[^/\n\s]+/\S+/|(?:v|e(?:mbed)?)/|\S*?[?&]v=)|youtu\.be/)([a-zA-Z0-9_-]{11})",
        )
        .expect("video id pattern is valid")
    });

    re.captures(url).map(|caps| caps[1].to_string())
}
