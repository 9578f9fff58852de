//! URL slugs for "how far is X from Y" routes.
//!
//! One normalization rule for every page: lower-case, collapse runs of
//! non-alphanumeric characters into a single `-`, trim `-` at both ends.
//! Normalization is lossy; decoding never recovers display casing or
//! punctuation, so callers re-resolve display names through the geocoder.

use serde::{Deserialize, Serialize};

use crate::error::{LocateError, Result};

const PREFIX: &str = "how-far-is-";
const SEPARATOR: &str = "-from-";
const SELF_SUFFIX: &str = "-from-me";

/// Result of decoding a route slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedSlug {
    /// Normalized source name; `None` for `-from-me` routes.
    pub source: Option<String>,
    /// Normalized destination name.
    pub dest: String,
    pub is_self_relative: bool,
}

impl DecodedSlug {
    /// Re-encode with the same ordering.
    pub fn encode(&self) -> String {
        match &self.source {
            Some(source) => join(source, &self.dest),
            None => format!("{PREFIX}{}{SELF_SUFFIX}", self.dest),
        }
    }
}

fn is_combining_mark(ch: char) -> bool {
    matches!(ch, '\u{0300}'..='\u{036F}')
}

/// Lower-case and hyphenate a name. Unicode letters and digits survive;
/// combining diacritics are dropped without splitting the word.
///
/// The output is a fixed point: `normalize_name(normalize_name(x)) == normalize_name(x)`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    // Lower-casing can expand a character ('İ' → "i\u{307}"), so decide on
    // the lowered characters.
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else if !is_combining_mark(ch) {
            pending_hyphen = true;
        }
    }
    out
}

fn normalize_required(name: &str) -> Result<String> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return Err(LocateError::EmptyName(name.to_string()));
    }
    Ok(normalized)
}

fn join(source: &str, dest: &str) -> String {
    format!("{PREFIX}{dest}{SEPARATOR}{source}")
}

/// `how-far-is-<dest>-from-<source>`
pub fn encode_pair(source_name: &str, dest_name: &str) -> Result<String> {
    let source = normalize_required(source_name)?;
    let dest = normalize_required(dest_name)?;
    Ok(join(&source, &dest))
}

/// `how-far-is-<dest>-from-me`
pub fn encode_single(dest_name: &str) -> Result<String> {
    let dest = normalize_required(dest_name)?;
    Ok(format!("{PREFIX}{dest}{SELF_SUFFIX}"))
}

/// Parse a route slug.
///
/// A trailing `-from-me` always marks a self-relative route. Otherwise the
/// slug is split at the first `-from-`, so a destination cannot itself
/// contain the word "from"; re-encoding still reproduces the same slug.
pub fn decode(slug: &str) -> Result<DecodedSlug> {
    let lowered = slug.trim().to_lowercase();
    let malformed = || LocateError::MalformedSlug(slug.to_string());

    let rest = lowered.strip_prefix(PREFIX).ok_or_else(malformed)?;

    if let Some(dest) = rest.strip_suffix(SELF_SUFFIX) {
        if dest.is_empty() {
            return Err(malformed());
        }
        return Ok(DecodedSlug {
            source: None,
            dest: normalize_required(dest)?,
            is_self_relative: true,
        });
    }

    let (dest, source) = rest.split_once(SEPARATOR).ok_or_else(malformed)?;
    if dest.is_empty() || source.is_empty() {
        return Err(malformed());
    }

    Ok(DecodedSlug {
        source: Some(normalize_required(source)?),
        dest: normalize_required(dest)?,
        is_self_relative: false,
    })
}

/// Turn a slug segment back into a geocoder query: `new-york` → `new york`.
pub fn segment_to_query(segment: &str) -> String {
    segment
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize the first letter of every whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First comma-separated component of a geocoder display name.
pub fn primary_component(display_name: &str) -> &str {
    display_name.split(',').next().unwrap_or("").trim()
}

/// Last comma-separated component, which geocoders use for the country.
pub fn country_component(display_name: &str) -> Option<&str> {
    let last = display_name.rsplit(',').next()?.trim();
    if last.is_empty() || !display_name.contains(',') {
        None
    } else {
        Some(last)
    }
}

/// Cities every destination page links to.
pub const POPULAR_ROUTE_CITIES: [&str; 4] = ["New York", "London", "Tokyo", "Los Angeles"];

/// A "how far is <other> from <destination>" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedRoute {
    pub label: String,
    pub slug: String,
}

/// Links from each of `others` to the destination, in input order.
///
/// Only the first component of `dest_display` is used. Names that normalize
/// to nothing, or to the destination itself, are skipped, as are repeats.
pub fn related_routes<S: AsRef<str>>(dest_display: &str, others: &[S]) -> Vec<RelatedRoute> {
    let dest = primary_component(dest_display);
    let dest_norm = normalize_name(dest);
    if dest_norm.is_empty() {
        return Vec::new();
    }

    let mut seen = vec![dest_norm];
    let mut routes = Vec::new();
    for other in others {
        let other = other.as_ref().trim();
        let other_norm = normalize_name(other);
        if other_norm.is_empty() || seen.contains(&other_norm) {
            continue;
        }
        if let Ok(slug) = encode_pair(dest, other) {
            routes.push(RelatedRoute {
                label: format!("How far is {other} from {dest}?"),
                slug,
            });
        }
        seen.push(other_norm);
    }
    routes
}

/// Self-relative slug for a listing entry such as "Rockville, Maryland".
pub fn slug_for_display_name(display_name: &str) -> Result<String> {
    encode_single(primary_component(display_name))
}
