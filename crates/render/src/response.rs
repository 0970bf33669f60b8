//! The response collaborator a [`Renderer`](crate::Renderer) writes to.

use std::collections::BTreeMap;

use pagerender_core::ViewData;
use serde_json::{Map, Value};

use crate::error::ResponseError;

/// Optional capability: setting response headers.
pub trait HeaderWriter {
    fn set_header(&mut self, name: &str, value: &str);
}

/// An HTTP-like response that can render a named template or send raw data.
pub trait Response {
    /// Render `template` with `data` and finish the response.
    fn render(&mut self, template: &str, data: &ViewData) -> Result<(), ResponseError>;

    /// Write a raw payload. Strings are sent as-is, anything else as JSON.
    fn send(&mut self, payload: Value) -> Result<(), ResponseError>;

    /// Finish the response.
    fn end(&mut self);

    /// `None` when this response cannot set headers.
    fn header_writer(&mut self) -> Option<&mut dyn HeaderWriter>;

    /// Headers set so far.
    fn current_headers(&self) -> Map<String, Value>;
}

/// Buffering response, used by tests and by callers that post-process output.
#[derive(Debug, Clone, Default)]
pub struct MemoryResponse {
    headers: Option<BTreeMap<String, String>>,
    rendered: Option<(String, ViewData)>,
    sent: Option<Value>,
    ended: bool,
}

impl MemoryResponse {
    pub fn new() -> Self {
        Self {
            headers: Some(BTreeMap::new()),
            ..Self::default()
        }
    }

    /// A response without the header-setting capability.
    pub fn without_headers() -> Self {
        Self::default()
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()?
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn rendered(&self) -> Option<(&str, &ViewData)> {
        self.rendered
            .as_ref()
            .map(|(template, data)| (template.as_str(), data))
    }

    pub fn sent(&self) -> Option<&Value> {
        self.sent.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    fn ensure_open(&self) -> Result<(), ResponseError> {
        if self.ended {
            return Err(ResponseError::Finished);
        }
        Ok(())
    }
}

impl HeaderWriter for MemoryResponse {
    fn set_header(&mut self, name: &str, value: &str) {
        if let Some(headers) = self.headers.as_mut() {
            headers.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }
}

impl Response for MemoryResponse {
    fn render(&mut self, template: &str, data: &ViewData) -> Result<(), ResponseError> {
        self.ensure_open()?;
        self.rendered = Some((template.to_string(), data.clone()));
        self.ended = true;
        Ok(())
    }

    fn send(&mut self, payload: Value) -> Result<(), ResponseError> {
        self.ensure_open()?;
        self.sent = Some(payload);
        Ok(())
    }

    fn end(&mut self) {
        self.ended = true;
    }

    fn header_writer(&mut self) -> Option<&mut dyn HeaderWriter> {
        if self.headers.is_some() {
            Some(self as &mut dyn HeaderWriter)
        } else {
            None
        }
    }

    fn current_headers(&self) -> Map<String, Value> {
        self.headers
            .iter()
            .flatten()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect()
    }
}
