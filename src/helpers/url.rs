//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a slug is placed in a URL path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// Percent-encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Expand a permalink pattern such as `/blog/:slug/` for one slug
pub fn permalink(pattern: &str, slug: &str) -> String {
    pattern.replace(":slug", &encode_segment(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permalink_encodes_slug() {
        assert_eq!(permalink("/blog/:slug/", "hello world"), "/blog/hello%20world/");
        assert_eq!(permalink("/projects/:slug", "a/b"), "/projects/a%2Fb");
    }
}
