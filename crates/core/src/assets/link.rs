//! Final URL construction for a single asset descriptor.
//!
//! Steps, always in this order:
//! 1. drop descriptors without a link (or media, for stylesheets)
//! 2. base64 obfuscation, skipped on query-key collision
//! 3. strip one leading `?`
//! 4. host prefixing
//! 5. fingerprint append
//!
//! The emitted [`CssLink`] / [`ScriptLink`] types have no room for `host`,
//! `fingerprint` or `base64`, so transient settings never reach a template.

use std::fmt::Display;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use thiserror::Error;

use super::fingerprint::fingerprint_at;
use crate::config::{Async, Base64, CssAsset, Defer, Fingerprint, JsAsset};

/// A stylesheet ready for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssLink {
    pub link: String,
    pub media: String,
}

/// A script ready for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptLink {
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer: Option<Defer>,
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub r#async: Option<Async>,
}

/// Non-fatal problems met while building a link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkWarning {
    #[error(
        "Cannot encode resource [{link}] to base64 because the query string [{qs}] already exists. \
         Set the base64 query string to another value"
    )]
    Base64KeyCollision { link: String, qs: String },
}

/// Result of transforming one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome<T> {
    /// The descriptor lacked a required field and is left out of the view.
    Dropped,
    Emitted { asset: T, warnings: Vec<LinkWarning> },
}

impl<T> LinkOutcome<T> {
    pub fn asset(&self) -> Option<&T> {
        match self {
            LinkOutcome::Dropped => None,
            LinkOutcome::Emitted { asset, .. } => Some(asset),
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, LinkOutcome::Dropped)
    }
}

/// Build the final stylesheet link.
pub fn transform_css<Tz>(asset: &CssAsset, at: &DateTime<Tz>) -> LinkOutcome<CssLink>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !asset.is_renderable() {
        return LinkOutcome::Dropped;
    }

    let mut warnings = Vec::new();
    let link = build_link(
        &asset.link,
        asset.host.as_deref(),
        asset.base64.as_ref(),
        asset.fingerprint.as_ref(),
        at,
        &mut warnings,
    );

    LinkOutcome::Emitted {
        asset: CssLink {
            link,
            media: asset.media.clone(),
        },
        warnings,
    }
}

/// Build the final script link.
pub fn transform_js<Tz>(asset: &JsAsset, at: &DateTime<Tz>) -> LinkOutcome<ScriptLink>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !asset.is_renderable() {
        return LinkOutcome::Dropped;
    }

    let mut warnings = Vec::new();
    let link = build_link(
        &asset.link,
        asset.host.as_deref(),
        asset.base64.as_ref(),
        asset.fingerprint.as_ref(),
        at,
        &mut warnings,
    );

    LinkOutcome::Emitted {
        asset: ScriptLink {
            link,
            defer: asset.defer,
            r#async: asset.r#async,
        },
        warnings,
    }
}

fn build_link<Tz>(
    original: &str,
    host: Option<&str>,
    base64: Option<&Base64>,
    fingerprint: Option<&Fingerprint>,
    at: &DateTime<Tz>,
    warnings: &mut Vec<LinkWarning>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut link = original.to_string();

    if let Some(base64) = base64.filter(|b| b.enable) {
        let marker = format!("{}=", base64.qs);
        if link.contains(&marker) {
            warnings.push(LinkWarning::Base64KeyCollision {
                link: link.clone(),
                qs: base64.qs.clone(),
            });
        } else {
            link = format!("{marker}{}", STANDARD.encode(link.as_bytes()));
        }
    }

    if let Some(stripped) = link.strip_prefix('?') {
        link = stripped.to_string();
    }

    if let Some(host) = host.filter(|h| !h.is_empty()) {
        link = prefix_host(host, &link);
    }

    if let Some(fingerprint) = fingerprint.filter(|f| f.enable) {
        let separator = if link.contains('?') { '&' } else { '?' };
        let token = fingerprint_at(
            &fingerprint.key,
            &fingerprint.date_format,
            fingerprint.limit,
            at,
        );
        link = format!("{link}{separator}{}={token}", fingerprint.qs);
    }

    link
}

/// Join a host and a link: `host + "/" + "?" + link`.
///
/// The `/` is left out when the link is already absolute (`/…`, `http…`) or
/// the host already ends with `/` or `?`. The `?` is left out when the link is
/// empty or either side already has one at the boundary.
///
/// # Examples
///
/// ```
/// use pagerender_core::assets::prefix_host;
///
/// assert_eq!(prefix_host("https://cdn.io", "r=YS5jc3M="), "https://cdn.io/?r=YS5jc3M=");
/// assert_eq!(prefix_host("https://cdn.io/", "a.css"), "https://cdn.io/?a.css");
/// assert_eq!(prefix_host("https://cdn.io?", "a.css"), "https://cdn.io?a.css");
/// ```
pub fn prefix_host(host: &str, link: &str) -> String {
    if host.is_empty() {
        return link.to_string();
    }

    let slash = if link.starts_with('/')
        || link.starts_with("http")
        || host.ends_with('/')
        || host.ends_with('?')
    {
        ""
    } else {
        "/"
    };

    let question = if link.is_empty() || host.ends_with('?') || link.starts_with('?') {
        ""
    } else {
        "?"
    };

    format!("{host}{slash}{question}{link}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn emitted<T>(outcome: LinkOutcome<T>) -> (T, Vec<LinkWarning>) {
        match outcome {
            LinkOutcome::Emitted { asset, warnings } => (asset, warnings),
            LinkOutcome::Dropped => panic!("asset was dropped"),
        }
    }

    fn base64(qs: &str) -> Option<Base64> {
        Some(Base64 {
            enable: true,
            qs: qs.to_string(),
        })
    }

    fn fingerprint(
        key: &str,
        date_format: &str,
        qs: &str,
        limit: Option<i64>,
    ) -> Option<Fingerprint> {
        Some(Fingerprint {
            enable: true,
            key: key.to_string(),
            date_format: date_format.to_string(),
            qs: qs.to_string(),
            limit,
        })
    }

    #[test]
    fn test_plain_css_passes_through() {
        let (css, warnings) = emitted(transform_css(&CssAsset::new("a.css", "print"), &now()));
        assert_eq!(
            css,
            CssLink {
                link: "a.css".to_string(),
                media: "print".to_string()
            }
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_invalid_descriptors_are_dropped() {
        assert!(transform_css(&CssAsset::new("", "print"), &now()).is_dropped());
        assert!(transform_css(&CssAsset::new("a.css", ""), &now()).is_dropped());
        let js = JsAsset {
            fingerprint: fingerprint("k", "YYYY", "v", None),
            base64: base64("r"),
            ..JsAsset::new("")
        };
        assert!(transform_js(&js, &now()).is_dropped());
    }

    #[test]
    fn test_base64_replaces_link() {
        let asset = CssAsset {
            base64: base64("r"),
            ..CssAsset::new("a.css", "print")
        };
        let (css, _) = emitted(transform_css(&asset, &now()));
        assert_eq!(css.link, format!("r={}", STANDARD.encode("a.css")));
        assert_eq!(css.link, "r=YS5jc3M=");
        assert_eq!(css.media, "print");
    }

    #[test]
    fn test_base64_key_collision_keeps_link_and_warns() {
        let asset = JsAsset {
            base64: base64("r"),
            ..JsAsset::new("loader.js?r=1")
        };
        let (js, warnings) = emitted(transform_js(&asset, &now()));
        assert_eq!(js.link, "loader.js?r=1");
        assert_eq!(
            warnings,
            vec![LinkWarning::Base64KeyCollision {
                link: "loader.js?r=1".to_string(),
                qs: "r".to_string()
            }]
        );
    }

    #[test]
    fn test_disabled_features_are_ignored() {
        let asset = JsAsset {
            base64: Some(Base64::default()),
            fingerprint: Some(Fingerprint {
                enable: false,
                ..Fingerprint::enabled("k")
            }),
            ..JsAsset::new("a.js")
        };
        let (js, _) = emitted(transform_js(&asset, &now()));
        assert_eq!(js.link, "a.js");
    }

    #[test]
    fn test_fingerprint_uses_ampersand_after_existing_query() {
        let asset = JsAsset {
            fingerprint: fingerprint("k", "YYYY", "v", None),
            ..JsAsset::new("a.js?x=1")
        };
        let (js, _) = emitted(transform_js(&asset, &now()));
        // The message is the formatted year itself.
        let token = fingerprint_at("k", "[2024]", None, &now());
        assert_eq!(js.link, format!("a.js?x=1&v={token}"));
    }

    #[test]
    fn test_fingerprint_uses_question_mark_on_bare_link() {
        let asset = CssAsset {
            fingerprint: fingerprint("1234", "YY/MM/DD", "g", Some(15)),
            ..CssAsset::new("header2.css", "print")
        };
        let (css, _) = emitted(transform_css(&asset, &now()));
        let token = fingerprint_at("1234", "YY/MM/DD", Some(15), &now());
        assert_eq!(token.len(), 15);
        assert_eq!(css.link, format!("header2.css?g={token}"));
    }

    #[test]
    fn test_leading_question_mark_is_stripped() {
        let (js, _) = emitted(transform_js(&JsAsset::new("?a=1"), &now()));
        assert_eq!(js.link, "a=1");
    }

    #[test]
    fn test_host_with_base64_and_fingerprint() {
        let asset = CssAsset {
            host: Some("https://test.io".to_string()),
            base64: base64("r"),
            fingerprint: fingerprint("key", "DD/MM/YYYY", "v", Some(24)),
            ..CssAsset::new("path=assets/css/site.css", "print")
        };
        let (css, _) = emitted(transform_css(&asset, &now()));
        let encoded = STANDARD.encode("path=assets/css/site.css");
        let token = fingerprint_at("key", "DD/MM/YYYY", Some(24), &now());
        assert_eq!(css.link, format!("https://test.io/?r={encoded}&v={token}"));
    }

    #[test]
    fn test_script_markers_survive() {
        let asset = JsAsset {
            defer: Some(Defer::Defer),
            ..JsAsset::new("a.js")
        };
        let (js, _) = emitted(transform_js(&asset, &now()));
        assert_eq!(js.defer, Some(Defer::Defer));
        assert_eq!(js.r#async, None);
    }

    #[test]
    fn test_emitted_assets_have_no_transient_fields() {
        let asset = JsAsset {
            host: Some("https://cdn.io".to_string()),
            base64: base64("r"),
            fingerprint: fingerprint("k", "YYYY", "v", None),
            r#async: Some(Async::Async),
            ..JsAsset::new("a.js")
        };
        let (js, _) = emitted(transform_js(&asset, &now()));
        let json = serde_json::to_value(&js).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["link", "async"]);
    }

    #[test]
    fn test_prefix_host_rules() {
        assert_eq!(prefix_host("", "a.css"), "a.css");
        assert_eq!(prefix_host("https://cdn.io", "a.css"), "https://cdn.io/?a.css");
        assert_eq!(prefix_host("https://cdn.io", "/a.css"), "https://cdn.io?/a.css");
        assert_eq!(
            prefix_host("https://cdn.io", "https://origin.io/a.css"),
            "https://cdn.io?https://origin.io/a.css"
        );
        assert_eq!(prefix_host("https://cdn.io/", "a.css"), "https://cdn.io/?a.css");
        assert_eq!(prefix_host("https://cdn.io?", "a.css"), "https://cdn.io?a.css");
        assert_eq!(prefix_host("https://cdn.io", ""), "https://cdn.io/");
    }
}
