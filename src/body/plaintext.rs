use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;

/// Number of leading bytes inspected when sniffing a body.
const PREFIX_BYTES: usize = 64;

/// Number of code points decoded from the prefix before giving up looking.
const SAMPLED_CODE_POINTS: usize = 16;

/// Result of sniffing the start of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// The sampled code points are all printable or whitespace.
    Plaintext,

    /// A control character that is not whitespace was found.
    Binary,

    /// The prefix ended inside a multi-byte UTF-8 sequence.
    TruncatedUtf8,
}

impl BodyKind {
    pub fn is_plaintext(&self) -> bool {
        *self == BodyKind::Plaintext
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BodyKind::Plaintext => "plaintext",
            BodyKind::Binary => "binary",
            BodyKind::TruncatedUtf8 => "truncated-utf8",
        };
        f.write_str(name)
    }
}

/// Returns the part of `body` that [`classify`] looks at.
pub fn sample(body: &[u8]) -> &[u8] {
    &body[..body.len().min(PREFIX_BYTES)]
}

/// Classify a body by decoding up to 16 code points from its first 64 bytes.
///
/// Only a borrowed view of the prefix is read, so the caller can still log or
/// forward the whole body afterwards. This is a heuristic: a body whose first
/// characters look like text is reported as text even if binary data follows.
pub fn classify(body: &[u8]) -> BodyKind {
    let mut remaining = sample(body);

    for _ in 0..SAMPLED_CODE_POINTS {
        if remaining.is_empty() {
            break;
        }

        let Some((ch, width)) = decode_code_point(remaining) else {
            return BodyKind::TruncatedUtf8;
        };

        if ch.is_control() && !is_whitespace_control(ch) {
            return BodyKind::Binary;
        }

        remaining = &remaining[width..];
    }

    BodyKind::Plaintext
}

/// Returns `true` when the start of `body` looks like human-readable text.
///
/// A prefix that stops in the middle of a UTF-8 sequence counts as binary.
pub fn is_plaintext(body: &[u8]) -> bool {
    classify(body).is_plaintext()
}

/// Read at most the sniffing prefix of a file, never the whole file.
pub fn read_prefix(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut prefix = Vec::with_capacity(PREFIX_BYTES);
    file.take(PREFIX_BYTES as u64)
        .read_to_end(&mut prefix)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(prefix)
}

pub fn sniff_file(path: impl AsRef<Path>) -> anyhow::Result<BodyKind> {
    let prefix = read_prefix(path)?;
    Ok(classify(&prefix))
}

/// Decode the code point at the start of `bytes`, returning it with its width.
///
/// Malformed sequences decode to U+FFFD. `None` means the lead byte announces
/// more bytes than are left.
fn decode_code_point(bytes: &[u8]) -> Option<(char, usize)> {
    let width = match bytes[0] {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Some((char::REPLACEMENT_CHARACTER, 1)),
    };

    if bytes.len() < width {
        return None;
    }

    match std::str::from_utf8(&bytes[..width]) {
        Ok(s) => s.chars().next().map(|ch| (ch, width)),
        Err(e) => Some((char::REPLACEMENT_CHARACTER, e.error_len().unwrap_or(width))),
    }
}

/// Control characters that still count as whitespace: TAB, LF, VT, FF, CR and
/// the four information separators.
fn is_whitespace_control(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{1C}'..='\u{1F}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn hello_world_is_plaintext() {
        assert!(is_plaintext(b"Hello, world!"));
    }

    #[test]
    fn empty_body_is_plaintext() {
        assert!(is_plaintext(b""));
    }

    #[test]
    fn whitespace_controls_are_plaintext() {
        assert!(is_plaintext(b"line one\r\n\tline two\x0b\x0c"));
        assert!(is_plaintext(b"\x1c\x1d\x1e\x1f"));
    }

    #[test]
    fn leading_control_bytes_are_binary() {
        assert_eq!(classify(&[0x00, 0x01, 0x02, 0x03]), BodyKind::Binary);
        assert!(!is_plaintext(b"abc\x01def"));
        assert!(!is_plaintext(b"\x1b[31mred"));
    }

    #[test]
    fn delete_and_c1_controls_are_binary() {
        assert!(!is_plaintext(b"abc\x7f"));
        // U+0085 NEXT LINE is a C1 control, not whitespace here.
        assert!(!is_plaintext("abc\u{85}".as_bytes()));
    }

    #[test]
    fn multi_byte_text_is_plaintext() {
        assert!(is_plaintext("größe: 5 €, 😀".as_bytes()));
    }

    #[test]
    fn truncated_sequence_within_sample_is_not_plaintext() {
        let body = [b'a', b'b', 0xF0, 0x9F];
        assert_eq!(classify(&body), BodyKind::TruncatedUtf8);
        assert!(!is_plaintext(&body));
    }

    #[test]
    fn truncation_after_sampled_code_points_is_ignored() {
        // 63 ASCII bytes then an emoji cut by the 64 byte prefix: only the
        // first 16 code points are ever decoded.
        let mut body = vec![b'a'; 63];
        body.extend_from_slice("😀".as_bytes());
        assert!(is_plaintext(&body));
    }

    #[test]
    fn control_after_sampled_code_points_is_ignored() {
        let mut body = b"0123456789abcdef".to_vec();
        body.push(0x00);
        assert!(is_plaintext(&body));

        let mut body = b"0123456789abcde".to_vec();
        body.push(0x00);
        assert!(!is_plaintext(&body));
    }

    #[test]
    fn malformed_bytes_decode_as_replacement() {
        assert!(is_plaintext(&[b'a', 0xFF, b'b']));
        assert!(is_plaintext(&[0xC3, b'(', b'x']));
    }

    #[test]
    fn gzip_header_is_binary() {
        assert_eq!(classify(&[0x1f, 0x8b, 0x08, 0x00]), BodyKind::Binary);
    }

    #[test]
    fn classify_leaves_buffer_intact() {
        let body = Bytes::from_static(b"{\"id\": 1}");
        assert!(is_plaintext(&body));
        assert_eq!(&body[..], b"{\"id\": 1}");
    }

    #[test]
    fn sample_caps_prefix() {
        assert_eq!(sample(&[0u8; 100]).len(), 64);
        assert_eq!(sample(b"short"), b"short");
    }
}
