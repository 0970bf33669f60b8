//! Normalised partial updates and the deep merge into a live [`Configuration`].
//!
//! A patch mirrors the configuration tree with every node optional. Absent
//! nodes leave the live value untouched and present scalars overwrite.
//! Sequences merge index by index: item `i` of the update merges into item `i`
//! of the live sequence, extra update items are appended and live items past
//! the end of the update are kept.

use serde::Deserialize;
use serde_json::Value;

use super::types::{
    Async, Base64, Configuration, CssAsset, Defer, Fingerprint, JsAsset, MobileIcon, NameValue,
    SocialLink, SocialTag, DEFAULT_BASE64_QS, DEFAULT_DATE_FORMAT, DEFAULT_FINGERPRINT_QS,
};

/// A validated update with every asset default filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub app: Option<AppPatch>,
    pub property: Option<PropertyPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub language: Option<String>,
    pub meta: Option<Vec<NameValue>>,
    pub http_equiv: Option<Vec<NameValue>>,
    pub assets: Option<AssetsPatch>,
    pub mobile_icons: Option<Vec<MobileIcon>>,
    pub social: Option<SocialPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetsPatch {
    pub header: Option<AssetGroupPatch>,
    pub footer: Option<AssetGroupPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetGroupPatch {
    pub css: Option<Vec<CssAsset>>,
    pub js: Option<Vec<JsAsset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialPatch {
    pub facebook: Option<Vec<SocialTag>>,
    pub twitter: Option<Vec<SocialTag>>,
    pub google: Option<Vec<SocialLink>>,
}

impl ConfigPatch {
    /// Normalise an update that already passed [`super::validate`].
    ///
    /// `process_key` becomes the fingerprint key of every asset that does not
    /// name its own.
    pub fn from_value(value: &Value, process_key: &str) -> Result<Self, serde_json::Error> {
        let input = PatchInput::deserialize(value)?;
        Ok(input.normalize(process_key))
    }
}

impl Configuration {
    /// Deep-merge a normalised patch into this configuration.
    pub fn merge(&mut self, patch: ConfigPatch) {
        if let Some(name) = patch.app.and_then(|app| app.name) {
            self.app.name = name;
        }

        let Some(property) = patch.property else {
            return;
        };
        let target = &mut self.property;

        replace(&mut target.title, property.title);
        replace(&mut target.language, property.language);
        merge_sequence(&mut target.meta, property.meta);
        merge_sequence(&mut target.http_equiv, property.http_equiv);
        merge_sequence(&mut target.mobile_icons, property.mobile_icons);

        if let Some(assets) = property.assets {
            for (group, update) in [
                (&mut target.assets.header, assets.header),
                (&mut target.assets.footer, assets.footer),
            ] {
                if let Some(update) = update {
                    merge_sequence(&mut group.css, update.css);
                    merge_sequence(&mut group.js, update.js);
                }
            }
        }

        if let Some(social) = property.social {
            merge_sequence(&mut target.social.facebook, social.facebook);
            merge_sequence(&mut target.social.twitter, social.twitter);
            merge_sequence(&mut target.social.google, social.google);
        }
    }
}

fn replace<T>(slot: &mut T, update: Option<T>) {
    if let Some(value) = update {
        *slot = value;
    }
}

fn merge_sequence<T: DeepMerge>(live: &mut Vec<T>, update: Option<Vec<T>>) {
    let Some(update) = update else {
        return;
    };
    let mut update = update.into_iter();
    for (slot, item) in live.iter_mut().zip(update.by_ref()) {
        slot.deep_merge(item);
    }
    live.extend(update);
}

/// Field-by-field merge of a normalised update item into a live one.
trait DeepMerge {
    fn deep_merge(&mut self, update: Self);
}

// Leaves, and items whose fields are all present after normalisation.
macro_rules! merge_by_overwrite {
    ($($ty:ty),*) => {
        $(impl DeepMerge for $ty {
            fn deep_merge(&mut self, update: Self) {
                *self = update;
            }
        })*
    };
}

merge_by_overwrite!(String, NameValue, MobileIcon, SocialTag, SocialLink, Defer, Async, Base64);

impl<T: DeepMerge> DeepMerge for Option<T> {
    fn deep_merge(&mut self, update: Self) {
        let Some(update) = update else {
            return;
        };
        match self {
            Some(live) => live.deep_merge(update),
            None => *self = Some(update),
        }
    }
}

impl DeepMerge for Fingerprint {
    fn deep_merge(&mut self, update: Self) {
        self.enable = update.enable;
        self.key = update.key;
        self.date_format = update.date_format;
        self.qs = update.qs;
        if update.limit.is_some() {
            self.limit = update.limit;
        }
    }
}

impl DeepMerge for CssAsset {
    fn deep_merge(&mut self, update: Self) {
        self.host.deep_merge(update.host);
        self.link = update.link;
        self.media = update.media;
        self.fingerprint.deep_merge(update.fingerprint);
        self.base64.deep_merge(update.base64);
    }
}

impl DeepMerge for JsAsset {
    fn deep_merge(&mut self, update: Self) {
        self.host.deep_merge(update.host);
        self.link = update.link;
        self.defer.deep_merge(update.defer);
        self.r#async.deep_merge(update.r#async);
        self.fingerprint.deep_merge(update.fingerprint);
        self.base64.deep_merge(update.base64);
    }
}

#[derive(Deserialize)]
struct PatchInput {
    app: Option<AppInput>,
    property: Option<PropertyInput>,
}

#[derive(Deserialize)]
struct AppInput {
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyInput {
    title: Option<String>,
    language: Option<String>,
    meta: Option<Vec<NameValue>>,
    http_equiv: Option<Vec<NameValue>>,
    assets: Option<AssetsInput>,
    mobile_icons: Option<Vec<MobileIcon>>,
    social: Option<SocialInput>,
}

#[derive(Deserialize)]
struct AssetsInput {
    header: Option<AssetGroupInput>,
    footer: Option<AssetGroupInput>,
}

#[derive(Deserialize)]
struct AssetGroupInput {
    css: Option<Vec<CssAssetInput>>,
    js: Option<Vec<JsAssetInput>>,
}

#[derive(Deserialize)]
struct CssAssetInput {
    host: Option<String>,
    link: String,
    media: String,
    fingerprint: Option<FingerprintInput>,
    base64: Option<Base64Input>,
}

#[derive(Deserialize)]
struct JsAssetInput {
    host: Option<String>,
    link: String,
    defer: Option<Defer>,
    #[serde(rename = "async")]
    r#async: Option<Async>,
    fingerprint: Option<FingerprintInput>,
    base64: Option<Base64Input>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FingerprintInput {
    #[serde(default)]
    enable: bool,
    key: Option<String>,
    date_format: Option<String>,
    qs: Option<String>,
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct Base64Input {
    #[serde(default)]
    enable: bool,
    qs: Option<String>,
}

#[derive(Deserialize)]
struct SocialInput {
    facebook: Option<Vec<SocialTag>>,
    twitter: Option<Vec<SocialTag>>,
    google: Option<Vec<SocialLink>>,
}

impl PatchInput {
    fn normalize(self, key: &str) -> ConfigPatch {
        ConfigPatch {
            app: self.app.map(|app| AppPatch { name: app.name }),
            property: self.property.map(|property| PropertyPatch {
                title: property.title,
                language: property.language,
                meta: property.meta,
                http_equiv: property.http_equiv,
                assets: property.assets.map(|assets| AssetsPatch {
                    header: assets.header.map(|group| group.normalize(key)),
                    footer: assets.footer.map(|group| group.normalize(key)),
                }),
                mobile_icons: property.mobile_icons,
                social: property.social.map(|social| SocialPatch {
                    facebook: social.facebook,
                    twitter: social.twitter,
                    google: social.google,
                }),
            }),
        }
    }
}

impl AssetGroupInput {
    fn normalize(self, key: &str) -> AssetGroupPatch {
        AssetGroupPatch {
            css: self.css.map(|assets| {
                assets
                    .into_iter()
                    .map(|asset| CssAsset {
                        host: asset.host,
                        link: asset.link,
                        media: asset.media,
                        fingerprint: asset.fingerprint.map(|f| f.normalize(key)),
                        base64: asset.base64.map(Base64Input::normalize),
                    })
                    .collect()
            }),
            js: self.js.map(|assets| {
                assets
                    .into_iter()
                    .map(|asset| JsAsset {
                        host: asset.host,
                        link: asset.link,
                        defer: asset.defer,
                        r#async: asset.r#async,
                        fingerprint: asset.fingerprint.map(|f| f.normalize(key)),
                        base64: asset.base64.map(Base64Input::normalize),
                    })
                    .collect()
            }),
        }
    }
}

impl FingerprintInput {
    fn normalize(self, key: &str) -> Fingerprint {
        Fingerprint {
            enable: self.enable,
            key: self.key.unwrap_or_else(|| key.to_string()),
            date_format: self
                .date_format
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            qs: self
                .qs
                .unwrap_or_else(|| DEFAULT_FINGERPRINT_QS.to_string()),
            limit: self.limit,
        }
    }
}

impl Base64Input {
    fn normalize(self) -> Base64 {
        Base64 {
            enable: self.enable,
            qs: self.qs.unwrap_or_else(|| DEFAULT_BASE64_QS.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fingerprint_defaults_are_filled() {
        let patch = ConfigPatch::from_value(
            &json!({ "property": { "assets": { "header": { "css": [
                { "link": "a.css", "media": "print", "fingerprint": {} }
            ] } } } }),
            "process-key",
        )
        .unwrap();

        let css = patch.property.unwrap().assets.unwrap().header.unwrap().css.unwrap();
        let fingerprint = css[0].fingerprint.clone().unwrap();
        assert!(!fingerprint.enable);
        assert_eq!(fingerprint.key, "process-key");
        assert_eq!(fingerprint.date_format, "DD/MM/YYYY");
        assert_eq!(fingerprint.qs, "f");
        assert_eq!(fingerprint.limit, None);
    }

    #[test]
    fn test_base64_defaults_are_filled() {
        let patch = ConfigPatch::from_value(
            &json!({ "property": { "assets": { "footer": { "js": [
                { "link": "a.js", "base64": { "enable": true } }
            ] } } } }),
            "k",
        )
        .unwrap();

        let js = patch.property.unwrap().assets.unwrap().footer.unwrap().js.unwrap();
        assert_eq!(
            js[0].base64,
            Some(Base64 {
                enable: true,
                qs: "b".to_string()
            })
        );
    }

    #[test]
    fn test_explicit_values_win_over_defaults() {
        let patch = ConfigPatch::from_value(
            &json!({ "property": { "assets": { "header": { "js": [{
                "link": "a.js",
                "defer": "defer",
                "fingerprint": {
                    "enable": true, "key": "k", "dateFormat": "YYYY", "qs": "v", "limit": 8
                }
            }] } } } }),
            "unused",
        )
        .unwrap();

        let js = patch.property.unwrap().assets.unwrap().header.unwrap().js.unwrap();
        assert_eq!(js[0].defer, Some(Defer::Defer));
        assert_eq!(
            js[0].fingerprint,
            Some(Fingerprint {
                enable: true,
                key: "k".to_string(),
                date_format: "YYYY".to_string(),
                qs: "v".to_string(),
                limit: Some(8),
            })
        );
    }

    #[test]
    fn test_merge_leaves_absent_fields_untouched() {
        let mut config = Configuration::new();
        config.property.title = "Original".to_string();
        config.property.meta = vec![NameValue::new("keywords", "a")];
        let name = config.app.name.clone();

        let patch =
            ConfigPatch::from_value(&json!({ "property": { "language": "fr" } }), "k").unwrap();
        config.merge(patch);

        assert_eq!(config.app.name, name);
        assert_eq!(config.property.title, "Original");
        assert_eq!(config.property.language, "fr");
        assert_eq!(config.property.meta.len(), 1);
    }

    #[test]
    fn test_merge_sequences_index_by_index() {
        let mut config = Configuration::new();
        config.property.meta = vec![NameValue::new("a", "1"), NameValue::new("b", "2")];

        let patch = ConfigPatch::from_value(
            &json!({ "property": { "meta": [{ "name": "c", "value": "3" }] } }),
            "k",
        )
        .unwrap();
        config.merge(patch);

        assert_eq!(
            config.property.meta,
            vec![NameValue::new("c", "3"), NameValue::new("b", "2")]
        );
    }

    #[test]
    fn test_merge_appends_items_past_live_length() {
        let mut config = Configuration::new();
        config.property.social.twitter = vec![SocialTag {
            property: "twitter:card".to_string(),
            content: "summary".to_string(),
        }];

        let patch = ConfigPatch::from_value(
            &json!({ "property": { "social": { "twitter": [
                { "property": "twitter:site", "content": "@shop" },
                { "property": "twitter:title", "content": "Shop" }
            ] } } }),
            "k",
        )
        .unwrap();
        config.merge(patch);

        let properties: Vec<&str> = config
            .property
            .social
            .twitter
            .iter()
            .map(|tag| tag.property.as_str())
            .collect();
        assert_eq!(properties, vec!["twitter:site", "twitter:title"]);
    }

    #[test]
    fn test_merge_assets_field_by_field() {
        let mut config = Configuration::new();
        config.property.assets.header.css = vec![
            CssAsset {
                host: Some("https://cdn.example.com".to_string()),
                fingerprint: Some(Fingerprint {
                    limit: Some(10),
                    ..Fingerprint::enabled("live-key")
                }),
                ..CssAsset::new("one.css", "print")
            },
            CssAsset::new("two.css", "print"),
        ];
        config.property.assets.header.js = vec![JsAsset {
            defer: Some(Defer::Defer),
            ..JsAsset::new("keep.js")
        }];
        config.property.assets.footer.js = vec![JsAsset::new("footer.js")];

        let patch = ConfigPatch::from_value(
            &json!({ "property": { "assets": { "header": {
                "css": [{
                    "link": "three.css",
                    "media": "screen",
                    "fingerprint": { "enable": true, "key": "new-key" }
                }],
                "js": [{ "link": "new.js" }]
            } } } }),
            "k",
        )
        .unwrap();
        config.merge(patch);

        let header = &config.property.assets.header;
        assert_eq!(header.css.len(), 2);
        assert_eq!(header.css[0].link, "three.css");
        assert_eq!(header.css[0].media, "screen");
        assert_eq!(header.css[0].host.as_deref(), Some("https://cdn.example.com"));
        let fingerprint = header.css[0].fingerprint.clone().unwrap();
        assert_eq!(fingerprint.key, "new-key");
        assert_eq!(fingerprint.limit, Some(10));
        assert_eq!(header.css[1], CssAsset::new("two.css", "print"));

        assert_eq!(header.js[0].link, "new.js");
        assert_eq!(header.js[0].defer, Some(Defer::Defer));
        assert_eq!(
            config.property.assets.footer.js,
            vec![JsAsset::new("footer.js")]
        );
    }

    #[test]
    fn test_merge_social_only_touches_given_lists() {
        let mut config = Configuration::new();
        config.property.social.twitter = vec![SocialTag {
            property: "twitter:card".to_string(),
            content: "summary".to_string(),
        }];

        let patch = ConfigPatch::from_value(
            &json!({ "property": { "social": { "facebook": [
                { "property": "og:title", "content": "Title" }
            ] } } }),
            "k",
        )
        .unwrap();
        config.merge(patch);

        assert_eq!(config.property.social.facebook.len(), 1);
        assert_eq!(config.property.social.twitter.len(), 1);
        assert!(config.property.social.google.is_empty());
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut config = Configuration::new();
        let before = config.clone();
        config.merge(ConfigPatch::from_value(&json!({}), "k").unwrap());
        assert_eq!(config, before);
    }
}
