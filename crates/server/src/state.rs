use std::sync::{Arc, RwLock};

use pagerender::Renderer;
use tera::Tera;

/// Layout compiled into the binary, used when no template directory is given.
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Live renderer; configuration updates take the write lock.
    pub renderer: Arc<RwLock<Renderer>>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(renderer: Renderer, templates: Tera) -> Self {
        Self {
            renderer: Arc::new(RwLock::new(renderer)),
            templates: Arc::new(templates),
        }
    }

    /// Load every template matching `glob` (e.g. `templates/**/*.html`).
    pub fn load_templates(glob: &str) -> tera::Result<Tera> {
        let templates = Tera::new(glob)?;
        tracing::info!(
            glob,
            count = templates.get_template_names().count(),
            "Templates loaded"
        );
        Ok(templates)
    }

    /// Templates compiled into the binary.
    pub fn embedded_templates() -> tera::Result<Tera> {
        let mut templates = Tera::default();
        templates.add_raw_template("index.html", INDEX_TEMPLATE)?;
        Ok(templates)
    }
}

impl Default for AppState {
    fn default() -> Self {
        let templates = Self::embedded_templates().expect("Embedded templates must compile");
        Self::new(Renderer::new(), templates)
    }
}
