use chrono::{DateTime, TimeZone};
use serde_json::Value;
use uuid::Uuid;

use super::error::ValidationErrors;
use super::patch::ConfigPatch;
use super::schema::validate;
use super::types::Configuration;
use crate::view::{build_view_data, BuiltView, Region};

/// Owned page configuration state: the live value, the built-in defaults it
/// started from, and the fingerprint key generated for this instance.
#[derive(Debug, Clone)]
pub struct PageConfig {
    defaults: Configuration,
    current: Configuration,
    process_key: String,
}

impl PageConfig {
    /// Start from the built-in defaults.
    pub fn new() -> Self {
        Self::from_configuration(Configuration::new())
    }

    /// Start from an already-assembled configuration.
    ///
    /// The configuration is trusted as-is; assets missing a link are still
    /// dropped when views are built.
    pub fn from_configuration(current: Configuration) -> Self {
        Self {
            defaults: Configuration::new(),
            current,
            process_key: Uuid::new_v4().to_string(),
        }
    }

    pub fn current(&self) -> &Configuration {
        &self.current
    }

    pub fn defaults(&self) -> &Configuration {
        &self.defaults
    }

    /// Key used by fingerprints that do not configure their own.
    pub fn process_key(&self) -> &str {
        &self.process_key
    }

    /// Validate, normalise and merge a partial update.
    ///
    /// Either the whole update is merged or the live configuration is left
    /// exactly as it was.
    pub fn update(&mut self, partial: &Value) -> Result<(), ValidationErrors> {
        validate(partial)?;

        let patch = ConfigPatch::from_value(partial, &self.process_key)
            .map_err(|e| ValidationErrors::single("", e.to_string()))?;
        self.current.merge(patch);

        Ok(())
    }

    /// Assemble the view data of one region at the given instant.
    pub fn build<Tz>(&self, region: Region, at: &DateTime<Tz>) -> BuiltView
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        build_view_data(&self.current, &self.defaults, region, at)
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_update_merges_valid_partial() {
        let mut page = PageConfig::new();
        page.update(&json!({ "app": { "name": "shop" }, "property": { "title": "Home" } }))
            .unwrap();

        assert_eq!(page.current().app.name, "shop");
        assert_eq!(page.current().property.title, "Home");
        assert_eq!(page.current().property.language, "en");
    }

    #[test]
    fn test_rejected_update_leaves_state_untouched() {
        let mut page = PageConfig::new();
        page.update(&json!({ "property": { "title": "Home" } })).unwrap();
        let before = serde_json::to_string(page.current()).unwrap();

        let result = page.update(&json!({
            "app": { "name": "valid name" },
            "property": { "language": "english" }
        }));

        assert!(result.is_err());
        assert_eq!(serde_json::to_string(page.current()).unwrap(), before);
    }

    #[test]
    fn test_empty_sections_are_noop() {
        let mut page = PageConfig::new();
        page.update(&json!({ "app": { "name": "shop" }, "property": { "title": "Home" } }))
            .unwrap();
        let before = page.current().clone();

        for partial in [
            json!({}),
            json!({ "app": {} }),
            json!({ "property": {} }),
            json!({ "app": {}, "property": {} }),
        ] {
            assert!(page.update(&partial).is_ok(), "{partial} should be accepted");
            assert_eq!(page.current(), &before);
        }
    }

    #[test]
    fn test_short_name_reports_single_violation() {
        let mut page = PageConfig::new();
        let errors = page.update(&json!({ "app": { "name": "ab" } })).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.violations()[0].path, "app.name");
    }

    #[test]
    fn test_fingerprint_key_defaults_to_process_key() {
        let mut page = PageConfig::new();
        page.update(&json!({ "property": { "assets": { "header": { "js": [
            { "link": "a.js", "fingerprint": { "enable": true } }
        ] } } } }))
        .unwrap();

        let fingerprint = page.current().property.assets.header.js[0]
            .fingerprint
            .clone()
            .unwrap();
        assert_eq!(fingerprint.key, page.process_key());
    }

    #[test]
    fn test_instances_are_independent() {
        let mut first = PageConfig::new();
        let second = PageConfig::new();
        first.update(&json!({ "property": { "title": "First" } })).unwrap();

        assert_eq!(first.current().property.title, "First");
        assert!(second.current().property.title.is_empty());
        assert_ne!(first.process_key(), second.process_key());
    }

    #[test]
    fn test_build_uses_current_configuration() {
        let mut page = PageConfig::new();
        page.update(&json!({ "app": { "name": "shop" } })).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();

        let view = page.build(Region::Footer, &at);
        assert_eq!(view.data.get("appname").unwrap(), "shop");
        assert!(view.data.contains_key("cssFooter"));
    }
}
