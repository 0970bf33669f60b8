use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Language used when the configuration leaves `property.language` empty.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Suffix appended to the generated default application name.
pub const DEFAULT_APP_SUFFIX: &str = "new-app";

/// Fingerprint date pattern: one token per day.
pub const DEFAULT_DATE_FORMAT: &str = "DD/MM/YYYY";

/// Query-string key carrying the fingerprint.
pub const DEFAULT_FINGERPRINT_QS: &str = "f";

/// Query-string key carrying a base64-obfuscated link.
pub const DEFAULT_BASE64_QS: &str = "b";

/// Root page configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub property: PropertySection,
}

impl Configuration {
    /// Built-in defaults: a generated application name and the default language.
    pub fn new() -> Self {
        Self {
            app: AppSection {
                name: format!("{}-{}", Uuid::new_v4(), DEFAULT_APP_SUFFIX),
            },
            property: PropertySection {
                language: DEFAULT_LANGUAGE.to_string(),
                ..PropertySection::default()
            },
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSection {
    pub name: String,
}

/// Page-level metadata, assets and social tags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertySection {
    pub title: String,
    pub language: String,
    pub meta: Vec<NameValue>,
    pub http_equiv: Vec<NameValue>,
    pub assets: Assets,
    pub mobile_icons: Vec<MobileIcon>,
    pub social: Social,
}

/// A `<meta>` or `<meta http-equiv>` pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Both halves must be non-empty to be emitted.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assets {
    pub header: AssetGroup,
    pub footer: AssetGroup,
}

/// Stylesheets and scripts for one page region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetGroup {
    pub css: Vec<CssAsset>,
    pub js: Vec<JsAsset>,
}

/// A stylesheet descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub link: String,
    pub media: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<Base64>,
}

impl CssAsset {
    pub fn new(link: impl Into<String>, media: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            media: media.into(),
            ..Self::default()
        }
    }

    /// A stylesheet needs both a link and a media query to be emitted.
    pub fn is_renderable(&self) -> bool {
        !self.link.is_empty() && !self.media.is_empty()
    }
}

/// A script descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defer: Option<Defer>,
    #[serde(default, rename = "async", skip_serializing_if = "Option::is_none")]
    pub r#async: Option<Async>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<Base64>,
}

impl JsAsset {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Self::default()
        }
    }

    pub fn is_renderable(&self) -> bool {
        !self.link.is_empty()
    }
}

/// The literal `defer` script attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Defer {
    #[serde(rename = "defer")]
    Defer,
}

/// The literal `async` script attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Async {
    #[serde(rename = "async")]
    Async,
}

/// Cache-busting fingerprint settings, always fully populated after normalisation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub enable: bool,
    pub key: String,
    pub date_format: String,
    pub qs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl Fingerprint {
    /// An enabled fingerprint with default format and query key.
    pub fn enabled(key: impl Into<String>) -> Self {
        Self {
            enable: true,
            key: key.into(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            qs: DEFAULT_FINGERPRINT_QS.to_string(),
            limit: None,
        }
    }
}

/// Link obfuscation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base64 {
    pub enable: bool,
    pub qs: String,
}

impl Default for Base64 {
    fn default() -> Self {
        Self {
            enable: false,
            qs: DEFAULT_BASE64_QS.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileIcon {
    pub rel: String,
    pub sizes: String,
    pub href: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    pub facebook: Vec<SocialTag>,
    pub twitter: Vec<SocialTag>,
    pub google: Vec<SocialLink>,
}

/// An Open Graph / Twitter card `<meta property content>` tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialTag {
    pub property: String,
    pub content: String,
}

/// A `<link rel href>` tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub rel: String,
    pub href: String,
}
