//! Render dispatcher: owns the live page configuration and drives a [`Response`].

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use pagerender_core::{Configuration, LinkWarning, PageConfig, Region, ViewData};
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::response::Response;

/// Headers that stop every cache along the way from keeping a response.
pub const NO_CACHE_HEADERS: [(&str, &str); 3] = [
    ("Cache-Control", "private, no-cache, no-store, must-revalidate"),
    ("Expires", "-1"),
    ("Pragma", "no-cache"),
];

/// What a render call delivers.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderMode<'a> {
    /// Render the named template with the combined header/footer view data.
    Template(&'a str),
    /// Send a raw payload; `None` sends an empty object.
    Data(Option<Value>),
}

/// Page renderer.
///
/// Configuration updates take `&mut self`; callers sharing a renderer
/// across requests serialise updates themselves (e.g. behind a `RwLock`).
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    page: PageConfig,
    debug: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-assembled configuration instead of the defaults.
    pub fn with_config(config: Configuration) -> Self {
        Self {
            page: PageConfig::from_configuration(config),
            debug: false,
        }
    }

    pub fn config(&self) -> &Configuration {
        self.page.current()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// In debug mode data-only payloads also carry the response headers.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Validate and merge a partial configuration.
    ///
    /// Every violation is logged once and returned; on error the live
    /// configuration is unchanged.
    pub fn update_config(&mut self, partial: &Value) -> Result<()> {
        if let Err(errors) = self.page.update(partial) {
            for violation in &errors {
                tracing::warn!(
                    path = %violation.path,
                    message = %violation.message,
                    "Cannot validate given config"
                );
            }
            return Err(errors.into());
        }
        Ok(())
    }

    /// View data of one region, fingerprinted with the current local time.
    pub fn build(&self, region: Region) -> ViewData {
        self.build_at(region, &Local::now())
    }

    /// View data of one region at an explicit instant.
    pub fn build_at<Tz>(&self, region: Region, at: &DateTime<Tz>) -> ViewData
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let built = self.page.build(region, at);
        for warning in &built.warnings {
            match warning {
                LinkWarning::Base64KeyCollision { link, qs } => tracing::warn!(
                    %region,
                    %link,
                    %qs,
                    "Cannot encode resource to base64, query string key already present"
                ),
            }
        }
        built.data
    }

    /// [`build`](Self::build) for a region given by name.
    pub fn build_named(&self, kind: &str) -> Result<ViewData> {
        let region = kind.parse::<Region>().inspect_err(|e| {
            tracing::warn!(kind, "{e}");
        })?;
        Ok(self.build(region))
    }

    /// Set the no-cache headers. Returns `false` when `res` cannot set headers.
    pub fn no_cache_header<R>(&self, res: &mut R) -> bool
    where
        R: Response + ?Sized,
    {
        match res.header_writer() {
            Some(writer) => {
                for (name, value) in NO_CACHE_HEADERS {
                    writer.set_header(name, value);
                }
                true
            }
            None => false,
        }
    }

    /// Dispatch one response.
    ///
    /// Header and footer view data are built on every call, so link warnings
    /// are logged in data mode too. `params` is shallow-merged over the view
    /// data (template mode) or over an object payload (data mode). Non-object
    /// params are ignored.
    pub fn process_render<R>(
        &self,
        res: &mut R,
        mode: RenderMode<'_>,
        params: Option<&Value>,
        no_cache: bool,
    ) -> Result<()>
    where
        R: Response + ?Sized,
    {
        if no_cache && !self.no_cache_header(res) {
            tracing::debug!("Response cannot set headers, no-cache skipped");
        }

        let mut data = self.build(Region::Header);
        data.merge(self.build(Region::Footer));
        if let Some(params) = params {
            data.merge_value(params);
        }

        match mode {
            RenderMode::Template(template) => {
                tracing::debug!(template, "Rendering template");
                res.render(template, &data)?;
            }
            RenderMode::Data(raw) => {
                let payload = self.data_payload(res, raw, params);

                tracing::debug!(%payload, "Rendering only data");
                res.send(payload)?;
                res.end();
            }
        }

        Ok(())
    }

    /// Render `template` with the combined view data and optional extra params.
    pub fn render<R>(
        &self,
        res: &mut R,
        template: &str,
        params: Option<&Value>,
        no_cache: bool,
    ) -> Result<()>
    where
        R: Response + ?Sized,
    {
        self.process_render(res, RenderMode::Template(template), params, no_cache)
    }

    /// Send `data` as-is, without a template or extra params.
    pub fn render_only_data<R>(
        &self,
        res: &mut R,
        data: Option<Value>,
        no_cache: bool,
    ) -> Result<()>
    where
        R: Response + ?Sized,
    {
        self.process_render(res, RenderMode::Data(data), None, no_cache)
    }

    fn data_payload<R>(&self, res: &R, raw: Option<Value>, params: Option<&Value>) -> Value
    where
        R: Response + ?Sized,
    {
        let mut payload = match raw {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };

        if let (Value::Object(target), Some(Value::Object(extra))) = (&mut payload, params) {
            for (key, value) in extra {
                target.insert(key.clone(), value.clone());
            }
        }

        if self.debug {
            if !payload.is_object() {
                payload = json!({ "data": payload });
            }
            if let Value::Object(target) = &mut payload {
                target.insert("header".to_string(), Value::Object(res.current_headers()));
            }
        }

        payload
    }
}
