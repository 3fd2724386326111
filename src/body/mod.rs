mod plaintext;

pub use plaintext::{classify, is_plaintext, read_prefix, sample, sniff_file, BodyKind};
