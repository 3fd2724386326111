use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// `user_id`
    Snake,
    /// `userId`
    Camel,
    /// `UserId`
    Pascal,
    /// `user-id`
    Kebab,
}

impl FromStr for NameStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "snake" => Ok(NameStyle::Snake),
            "camel" => Ok(NameStyle::Camel),
            "pascal" => Ok(NameStyle::Pascal),
            "kebab" => Ok(NameStyle::Kebab),
            _ => Err(ConfigError::UnknownNameStyle(s.to_string())),
        }
    }
}

impl fmt::Display for NameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NameStyle::Snake => "snake",
            NameStyle::Camel => "camel",
            NameStyle::Pascal => "pascal",
            NameStyle::Kebab => "kebab",
        };
        f.write_str(name)
    }
}

pub fn convert(name: &str, style: NameStyle) -> String {
    match style {
        NameStyle::Snake => to_snake_case(name),
        NameStyle::Camel => to_camel_case(name),
        NameStyle::Pascal => to_pascal_case(name),
        NameStyle::Kebab => to_kebab_case(name),
    }
}

pub fn to_snake_case(name: &str) -> String {
    words(name).join("_")
}

pub fn to_kebab_case(name: &str) -> String {
    words(name).join("-")
}

pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, word) in words(name).iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            push_capitalized(&mut out, word);
        }
    }
    out
}

pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in words(name) {
        push_capitalized(&mut out, &word);
    }
    out
}

fn separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("separator pattern is valid"))
}

/// Split a name into lowercase words on separators and case changes.
///
/// An uppercase run followed by a lowercase letter ends one character early,
/// so `HTTPServer` splits into `http` and `server`.
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();

    for part in separators().split(name).filter(|p| !p.is_empty()) {
        let chars: Vec<char> = part.chars().collect();
        let mut current = String::new();

        for (i, &ch) in chars.iter().enumerate() {
            let boundary = i > 0
                && ch.is_uppercase()
                && (!chars[i - 1].is_uppercase()
                    || chars.get(i + 1).is_some_and(|next| next.is_lowercase()));
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(ch.to_lowercase());
        }

        if !current.is_empty() {
            words.push(current);
        }
    }

    words
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}
