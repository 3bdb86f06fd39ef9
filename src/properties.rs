use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{LaunchError, Result};

/// Flat `key=value` store read from a `.properties` file
///
/// Keys iterate in ascending order, so anything serialized from a
/// `Properties` comes out the same way on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a properties file
    ///
    /// UTF-8 is tried first; anything else is read as ISO-8859-1.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let contents = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => err.into_bytes().iter().map(|&b| char::from(b)).collect(),
        };
        Self::parse(&contents)
    }

    /// Parse properties text
    ///
    /// Supports `#`/`!` comments, `=`, `:` or whitespace separators,
    /// backslash line continuations and the usual escapes including `\uXXXX`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut props = Self::new();
        let mut logical = String::new();
        let mut start_line = 0;
        let mut continuing = false;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_start_matches([' ', '\t', '\u{c}']);

            if !continuing {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                start_line = idx + 1;
            }

            let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
            if trailing % 2 == 1 {
                logical.push_str(&line[..line.len() - 1]);
                continuing = true;
                continue;
            }

            logical.push_str(line);
            continuing = false;
            props.insert_line(&logical, start_line)?;
            logical.clear();
        }

        if continuing && !logical.is_empty() {
            props.insert_line(&logical, start_line)?;
        }

        Ok(props)
    }

    fn insert_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let (raw_key, raw_value) = split_key_value(line);
        let key = unescape(raw_key, line_no)?;
        let value = unescape(raw_value, line_no)?;
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Apply every entry of `other` on top of this set; `other` wins on conflicts
    pub fn merge(&mut self, other: Properties) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

/// Split a logical line at the first unescaped separator
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut sep = None;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                sep = Some((i, true));
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                sep = Some((i, false));
                break;
            }
            _ => {}
        }
    }

    let Some((pos, explicit)) = sep else {
        return (line, "");
    };

    let mut rest = line[pos + 1..].trim_start_matches(is_blank);
    if !explicit {
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = stripped.trim_start_matches(is_blank);
        }
    }

    (&line[..key_end], rest)
}

fn unescape(raw: &str, line_no: usize) -> Result<String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    // UTF-16 units from consecutive `\uXXXX` escapes, decoded together so
    // surrogate pairs combine
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_units(&mut units, &mut out, line_no)?;
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let unit = Some(&hex)
                    .filter(|h| h.len() == 4 && h.chars().all(|c| c.is_ascii_hexdigit()))
                    .and_then(|h| u16::from_str_radix(h, 16).ok())
                    .ok_or_else(|| LaunchError::Parse {
                        line: line_no,
                        message: format!("malformed \\uxxxx encoding '\\u{hex}'"),
                    })?;
                units.push(unit);
                continue;
            }
            Some('t') => '\t',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\u{c}',
            Some(other) => other,
            None => continue,
        };
        flush_units(&mut units, &mut out, line_no)?;
        out.push(escaped);
    }
    flush_units(&mut units, &mut out, line_no)?;

    Ok(out)
}

fn flush_units(units: &mut Vec<u16>, out: &mut String, line_no: usize) -> Result<()> {
    for decoded in char::decode_utf16(units.drain(..)) {
        let c = decoded.map_err(|err| LaunchError::Parse {
            line: line_no,
            message: format!("unpaired surrogate \\u{:04X}", err.unpaired_surrogate()),
        })?;
        out.push(c);
    }
    Ok(())
}
