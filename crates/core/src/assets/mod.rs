//! Asset link building: fingerprints and final URLs for stylesheets and scripts.

mod fingerprint;
mod link;

pub use fingerprint::{build_fingerprint, fingerprint_at, format_date};
pub use link::{
    prefix_host, transform_css, transform_js, CssLink, LinkOutcome, LinkWarning, ScriptLink,
};
