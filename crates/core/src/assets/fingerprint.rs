//! Time-bucketed cache-busting tokens.
//!
//! A fingerprint is `HMAC-SHA256(key, now formatted with date_format)` in
//! lowercase hex. The coarser the date pattern, the less often the token
//! rotates: `"YYYY"` changes once a year, `"DD/MM/YYYY HH"` every hour.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Local, TimeZone};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Fingerprint of the current local time.
pub fn build_fingerprint(key: &str, date_format: &str, limit: Option<i64>) -> String {
    fingerprint_at(key, date_format, limit, &Local::now())
}

/// Fingerprint of an explicit instant.
///
/// `limit` keeps only the first `limit` hex characters; a missing,
/// non-positive or oversized limit keeps the whole 64-character digest.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use pagerender_core::fingerprint_at;
///
/// let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
/// let full = fingerprint_at("secret", "YYYY", None, &at);
/// assert_eq!(full.len(), 64);
/// assert_eq!(fingerprint_at("secret", "YYYY", Some(8), &at), &full[..8]);
/// ```
pub fn fingerprint_at<Tz>(
    key: &str,
    date_format: &str,
    limit: Option<i64>,
    at: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let message = format_date(at, date_format);

    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(message.as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());

    match limit
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| *n > 0 && *n < digest.len())
    {
        Some(n) => digest[..n].to_string(),
        None => digest,
    }
}

#[derive(Debug, Clone, Copy)]
enum Piece {
    Strftime(&'static str),
    Ordinal,
    Millis,
}

// Longer tokens come before their prefixes.
const TOKENS: &[(&str, Piece)] = &[
    ("YYYY", Piece::Strftime("%Y")),
    ("YY", Piece::Strftime("%y")),
    ("MMMM", Piece::Strftime("%B")),
    ("MMM", Piece::Strftime("%b")),
    ("MM", Piece::Strftime("%m")),
    ("M", Piece::Strftime("%-m")),
    ("DDDD", Piece::Strftime("%j")),
    ("DDD", Piece::Strftime("%-j")),
    ("DD", Piece::Strftime("%d")),
    ("Do", Piece::Ordinal),
    ("D", Piece::Strftime("%-d")),
    ("dddd", Piece::Strftime("%A")),
    ("ddd", Piece::Strftime("%a")),
    ("d", Piece::Strftime("%w")),
    ("HH", Piece::Strftime("%H")),
    ("H", Piece::Strftime("%-H")),
    ("hh", Piece::Strftime("%I")),
    ("h", Piece::Strftime("%-I")),
    ("mm", Piece::Strftime("%M")),
    ("m", Piece::Strftime("%-M")),
    ("ss", Piece::Strftime("%S")),
    ("s", Piece::Strftime("%-S")),
    ("A", Piece::Strftime("%p")),
    ("a", Piece::Strftime("%P")),
    ("X", Piece::Strftime("%s")),
    ("x", Piece::Millis),
    ("ZZ", Piece::Strftime("%z")),
    ("Z", Piece::Strftime("%:z")),
];

/// Format an instant with a moment-style pattern (`DD/MM/YYYY`, `Do MMMM`, `[week] ss`).
///
/// Text inside square brackets is copied verbatim; any character that is not
/// part of a token is copied as well.
pub fn format_date<Tz>(at: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        match TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
            Some((token, piece)) => {
                match piece {
                    Piece::Strftime(spec) => out.push_str(&at.format(spec).to_string()),
                    Piece::Ordinal => out.push_str(&ordinal(at.day())),
                    Piece::Millis => out.push_str(&at.timestamp_millis().to_string()),
                }
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    out
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}
