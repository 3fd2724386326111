use std::borrow::Cow;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Characters that must always be percent-escaped in some part of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSet(&'static str);

impl EncodeSet {
    pub const fn new(chars: &'static str) -> Self {
        Self(chars)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.0.contains(ch)
    }
}

/// Escaped when a whole query string is set in raw form.
pub const QUERY_ENCODE_SET: EncodeSet = EncodeSet::new(" \"'<>#");

/// Escaped when an already-encoded name or value enters the query.
pub const QUERY_COMPONENT_REENCODE_SET: EncodeSet = EncodeSet::new(" \"'<>#&=");

/// Escaped when a raw name or value enters the query.
pub const QUERY_COMPONENT_ENCODE_SET: EncodeSet =
    EncodeSet::new(" !\"#$&'(),/:;<=>?@[]\\^`{|}~");

pub const PATH_SEGMENT_ENCODE_SET: EncodeSet = EncodeSet::new(" \"<>^`{}|/\\?#");

pub const FRAGMENT_ENCODE_SET: EncodeSet = EncodeSet::new(" \"<>`");

/// How [`canonicalize`] treats its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canonicalize {
    pub encode_set: EncodeSet,

    /// The input may already contain `%XX` escapes that must be kept.
    pub already_encoded: bool,

    /// With `already_encoded`, only keep `%` when it starts a valid escape.
    pub strict: bool,

    /// `+` means space in this context.
    pub plus_is_space: bool,

    /// Escape every code point at or above 0x80.
    pub ascii_only: bool,
}

impl Canonicalize {
    pub const QUERY: Self = Self::new(QUERY_ENCODE_SET).plus_is_space().ascii_only();
    pub const ENCODED_QUERY: Self = Self::QUERY.already_encoded();
    pub const QUERY_COMPONENT: Self =
        Self::new(QUERY_COMPONENT_ENCODE_SET).plus_is_space().ascii_only();
    pub const ENCODED_QUERY_COMPONENT: Self = Self::new(QUERY_COMPONENT_REENCODE_SET)
        .already_encoded()
        .plus_is_space()
        .ascii_only();
    pub const PATH_SEGMENT: Self = Self::new(PATH_SEGMENT_ENCODE_SET).ascii_only();
    pub const ENCODED_PATH_SEGMENT: Self = Self::PATH_SEGMENT.already_encoded();
    pub const FRAGMENT: Self = Self::new(FRAGMENT_ENCODE_SET).ascii_only();
    pub const ENCODED_FRAGMENT: Self = Self::FRAGMENT.already_encoded();

    pub const fn new(encode_set: EncodeSet) -> Self {
        Self {
            encode_set,
            already_encoded: false,
            strict: false,
            plus_is_space: false,
            ascii_only: false,
        }
    }

    pub const fn already_encoded(mut self) -> Self {
        self.already_encoded = true;
        self
    }

    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub const fn plus_is_space(mut self) -> Self {
        self.plus_is_space = true;
        self
    }

    pub const fn ascii_only(mut self) -> Self {
        self.ascii_only = true;
        self
    }

    fn needs_rewrite(&self, input: &str, pos: usize, ch: char) -> bool {
        (self.plus_is_space && (ch == '+' || (ch == ' ' && !self.already_encoded)))
            || self.must_escape(input, pos, ch)
    }

    fn must_escape(&self, input: &str, pos: usize, ch: char) -> bool {
        (ch as u32) < 0x20
            || ch == '\u{7F}'
            || (self.ascii_only && !ch.is_ascii())
            || self.encode_set.contains(ch)
            || (ch == '%'
                && (!self.already_encoded || (self.strict && !is_percent_encoded(input, pos))))
    }

    fn write_canonical(&self, out: &mut String, input: &str) {
        for (pos, ch) in input.char_indices() {
            if self.already_encoded && matches!(ch, '\t' | '\n' | '\u{0C}' | '\r') {
                // Dropped: whitespace that crept into an encoded string.
            } else if ch == '+' && self.plus_is_space {
                out.push_str(if self.already_encoded { "+" } else { "%2B" });
            } else if ch == ' ' && self.plus_is_space && !self.already_encoded {
                out.push('+');
            } else if self.must_escape(input, pos, ch) {
                push_percent_encoded(out, ch);
            } else {
                out.push(ch);
            }
        }
    }
}

/// Percent-encode `input` for the URL part described by `options`.
///
/// Returns the input unchanged, without allocating, when no character needs
/// rewriting. Escapes are the uppercase UTF-8 bytes of each character.
pub fn canonicalize<'a>(input: &'a str, options: &Canonicalize) -> Cow<'a, str> {
    for (pos, ch) in input.char_indices() {
        if options.needs_rewrite(input, pos, ch) {
            let mut out = String::with_capacity(input.len() + 16);
            out.push_str(&input[..pos]);
            options.write_canonical(&mut out, &input[pos..]);
            return Cow::Owned(out);
        }
    }
    Cow::Borrowed(input)
}

/// Returns `true` if `input[pos..]` starts with `%` and two hex digits.
pub fn is_percent_encoded(input: &str, pos: usize) -> bool {
    let bytes = input.as_bytes();
    bytes.get(pos) == Some(&b'%') && decode_escape(bytes, pos).is_some()
}

/// Decode `%XX` escapes (and `+` when `plus_is_space`).
///
/// A `%` that does not start a valid escape is kept as is. Decoded bytes are
/// reassembled as UTF-8, with invalid sequences replaced by U+FFFD.
pub fn percent_decode(input: &str, plus_is_space: bool) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let Some(start) = bytes
        .iter()
        .position(|&b| b == b'%' || (plus_is_space && b == b'+'))
    else {
        return Cow::Borrowed(input);
    };

    let mut out = Vec::with_capacity(bytes.len());
    out.extend_from_slice(&bytes[..start]);

    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if let Some(byte) = decode_escape(bytes, i) {
                    out.push(byte);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            }
            b'+' if plus_is_space => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }

    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

fn push_percent_encoded(out: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    for &b in ch.encode_utf8(&mut buf).as_bytes() {
        out.push('%');
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0F) as usize] as char);
    }
}

fn decode_escape(bytes: &[u8], pos: usize) -> Option<u8> {
    let hi = hex_value(*bytes.get(pos + 1)?)?;
    let lo = hex_value(*bytes.get(pos + 2)?)?;
    Some((hi << 4) | lo)
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
