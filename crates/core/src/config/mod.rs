//! Page configuration: model, schema validation, normalisation and merge.

mod error;
mod page;
mod patch;
mod schema;
mod types;

pub use error::{ValidationErrors, Violation};
pub use page::PageConfig;
pub use patch::{AppPatch, AssetGroupPatch, AssetsPatch, ConfigPatch, PropertyPatch, SocialPatch};
pub use schema::{validate, Field, Rule, TextRule, CONFIG_SCHEMA};
pub use types::{
    AppSection, AssetGroup, Assets, Async, Base64, Configuration, CssAsset, Defer, Fingerprint,
    JsAsset, MobileIcon, NameValue, PropertySection, Social, SocialLink, SocialTag,
    DEFAULT_APP_SUFFIX, DEFAULT_BASE64_QS, DEFAULT_DATE_FORMAT, DEFAULT_FINGERPRINT_QS,
    DEFAULT_LANGUAGE,
};
