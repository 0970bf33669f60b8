//! [`pagerender::Response`] backed by tera templates, converted into an axum response.

use std::error::Error as _;

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{Html, IntoResponse, Json},
};
use pagerender::{HeaderWriter, Response, ResponseError, ViewData};
use serde_json::{Map, Value};
use tera::{Context, Tera};

enum Body {
    Html(String),
    Json(Value),
}

/// Response buffered while a handler runs, then turned into an axum response.
pub struct TeraResponse<'a> {
    templates: &'a Tera,
    headers: HeaderMap,
    body: Option<Body>,
    ended: bool,
}

impl<'a> TeraResponse<'a> {
    pub fn new(templates: &'a Tera) -> Self {
        Self {
            templates,
            headers: HeaderMap::new(),
            body: None,
            ended: false,
        }
    }

    fn ensure_open(&self) -> Result<(), ResponseError> {
        if self.ended {
            return Err(ResponseError::Finished);
        }
        Ok(())
    }
}

/// `index` resolves to `index.html`; names with an extension are kept.
fn template_file(name: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{name}.html")
    }
}

fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HeaderWriter for TeraResponse<'_> {
    fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!(name, value, "Ignoring invalid response header"),
        }
    }
}

impl Response for TeraResponse<'_> {
    fn render(&mut self, template: &str, data: &ViewData) -> Result<(), ResponseError> {
        self.ensure_open()?;

        let name = template_file(template);
        let context = Context::from_serialize(data).map_err(|e| ResponseError::Template {
            name: name.clone(),
            reason: error_chain(&e),
        })?;
        let html = self
            .templates
            .render(&name, &context)
            .map_err(|e| ResponseError::Template {
                name: name.clone(),
                reason: error_chain(&e),
            })?;

        self.body = Some(Body::Html(html));
        self.ended = true;
        Ok(())
    }

    fn send(&mut self, payload: Value) -> Result<(), ResponseError> {
        self.ensure_open()?;
        self.body = Some(match payload {
            Value::String(text) => Body::Html(text),
            other => Body::Json(other),
        });
        Ok(())
    }

    fn end(&mut self) {
        self.ended = true;
    }

    fn header_writer(&mut self) -> Option<&mut dyn HeaderWriter> {
        Some(self as &mut dyn HeaderWriter)
    }

    fn current_headers(&self) -> Map<String, Value> {
        self.headers
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.to_string(), Value::String(value.to_string())))
            })
            .collect()
    }
}

impl IntoResponse for TeraResponse<'_> {
    fn into_response(self) -> axum::response::Response {
        match self.body {
            Some(Body::Html(html)) => (self.headers, Html(html)).into_response(),
            Some(Body::Json(value)) => (self.headers, Json(value)).into_response(),
            None => self.headers.into_response(),
        }
    }
}
