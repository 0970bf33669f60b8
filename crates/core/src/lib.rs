//! Pure page view-model logic - no I/O, no logging, no ambient state.
//!
//! This crate provides:
//! - The page [`Configuration`] model with its built-in defaults
//! - Declarative schema validation that reports every violation at once
//! - Normalisation and deep merge of partial configuration updates
//! - Asset link building (base64 obfuscation, host prefixing, fingerprints)
//! - Header/footer [`ViewData`] assembly for templates
//!
//! The clock is always passed in explicitly, so everything here is
//! deterministic under test.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use pagerender_core::{PageConfig, Region};
//!
//! let mut page = PageConfig::new();
//! page.update(&serde_json::json!({
//!     "app": { "name": "my app" },
//!     "property": {
//!         "assets": {
//!             "header": { "css": [{ "link": "site.css", "media": "screen" }] }
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! let view = page.build(Region::Header, &Utc::now());
//! assert_eq!(view.data.get("appname").unwrap(), "my app");
//! assert_eq!(view.data.get("cssHeader").unwrap()[0]["link"], "site.css");
//! ```

pub mod assets;
pub mod config;
pub mod view;

pub use assets::{
    build_fingerprint, fingerprint_at, format_date, transform_css, transform_js, CssLink,
    LinkOutcome, LinkWarning, ScriptLink,
};
pub use config::{
    validate, AppSection, AssetGroup, Assets, Async, Base64, ConfigPatch, Configuration, CssAsset,
    Defer, Fingerprint, JsAsset, MobileIcon, NameValue, PageConfig, PropertySection, Social,
    SocialLink, SocialTag, ValidationErrors, Violation,
};
pub use view::{build_view_data, BuildRejected, BuiltView, Region, ViewData};
