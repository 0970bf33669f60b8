//! Page Renderer - Imperative Shell.
//!
//! This crate drives a response collaborator using the pure view-model
//! logic from `pagerender_core`. It owns the live page configuration,
//! logs every diagnostic the core returns, and dispatches either to a
//! template or to a raw data payload.
//!
//! # Architecture
//!
//! - **Functional Core** (`pagerender_core`): validation, merge, links, view data
//! - **Imperative Shell** (this crate): clock, logging, response headers and bodies
//!
//! # Example
//!
//! ```
//! use pagerender::{MemoryResponse, Renderer};
//! use serde_json::json;
//!
//! let mut renderer = Renderer::new();
//! renderer
//!     .update_config(&json!({ "property": { "title": "Welcome" } }))
//!     .unwrap();
//!
//! let mut res = MemoryResponse::new();
//! renderer.render(&mut res, "index", None, true).unwrap();
//!
//! let (template, data) = res.rendered().unwrap();
//! assert_eq!(template, "index");
//! assert_eq!(data.get("title").unwrap(), "Welcome");
//! assert_eq!(res.header("pragma"), Some("no-cache"));
//! ```

mod error;
mod renderer;
mod response;

// Re-export core types for convenience
pub use pagerender_core::{
    BuildRejected, Configuration, LinkWarning, PageConfig, Region, ValidationErrors, ViewData,
    Violation,
};

// Export shell types
pub use error::{RenderError, ResponseError, Result};
pub use renderer::{RenderMode, Renderer, NO_CACHE_HEADERS};
pub use response::{HeaderWriter, MemoryResponse, Response};
