//! Shareable card links: `?name=..&movie=..&h=..`.

use crate::highlight::HighlightSet;

pub const NAME_PARAM: &str = "name";
pub const TITLE_PARAM: &str = "movie";
pub const HIGHLIGHT_PARAM: &str = "h";

/// Parameters carried by a share link. Name and title are kept verbatim;
/// normalization happens at seed derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLink {
    pub name: Option<String>,
    pub title: Option<String>,
    pub highlights: HighlightSet,
}

impl ShareLink {
    pub fn new(name: &str, title: &str, highlights: HighlightSet) -> Self {
        Self {
            name: Some(name.to_string()),
            title: Some(title.to_string()),
            highlights,
        }
    }

    /// Query string without the leading `?`. `h` is omitted when nothing is marked.
    pub fn query(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(format!("{NAME_PARAM}={}", percent_encode(name)));
        }
        if let Some(title) = &self.title {
            pairs.push(format!("{TITLE_PARAM}={}", percent_encode(title)));
        }
        let token = self.highlights.encode();
        if !token.is_empty() {
            pairs.push(format!("{HIGHLIGHT_PARAM}={token}"));
        }
        pairs.join("&")
    }

    /// `base` with this link's query appended, replacing any query or fragment it had.
    pub fn to_url(&self, base: &str) -> String {
        let base = base.split(['?', '#']).next().unwrap_or(base);
        format!("{base}?{}", self.query())
    }

    /// Reads the parameters from a full URL or a bare query string. Unknown
    /// parameters are ignored; a missing or malformed `h` means no marks.
    pub fn parse(url: &str) -> Self {
        let query = match url.split_once('?') {
            Some((_, q)) => q,
            None if url.contains('=') => url,
            None => "",
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut link = ShareLink::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = percent_decode(value);
            match key {
                NAME_PARAM => link.name = Some(value),
                TITLE_PARAM => link.title = Some(value),
                HIGHLIGHT_PARAM => link.highlights = HighlightSet::decode(&value),
                _ => {}
            }
        }
        link
    }
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

pub fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for b in text.bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Lenient decoding: `+` is a space and broken escapes pass through unchanged.
pub fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => match bytes.get(i + 1..i + 3).and_then(|p| hex_pair(p[0], p[1])) {
                Some(byte) => {
                    out.push(byte);
                    i += 2;
                }
                None => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}
