use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use serde_json::Value;

use super::{Region, ViewData};
use crate::assets::{transform_css, transform_js, LinkOutcome, LinkWarning};
use crate::config::{Configuration, NameValue};

/// View data of one region plus the non-fatal warnings raised while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltView {
    pub data: ViewData,
    pub warnings: Vec<LinkWarning>,
}

/// Assemble the template fields of a region.
///
/// Every region carries `appname`, `title`, `language` and its own
/// `css{Region}` / `js{Region}` lists. The header also carries `metas`,
/// `httpEquiv`, `mobileIcons`, `facebook`, `twitter` and `google`.
pub fn build_view_data<Tz>(
    config: &Configuration,
    defaults: &Configuration,
    region: Region,
    at: &DateTime<Tz>,
) -> BuiltView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let property = &config.property;
    let mut data = ViewData::new();
    let mut warnings = Vec::new();

    let language = if property.language.is_empty() {
        &defaults.property.language
    } else {
        &property.language
    };

    data.insert("appname", config.app.name.as_str());
    data.insert("title", property.title.as_str());
    data.insert("language", language.as_str());

    let group = match region {
        Region::Header => &property.assets.header,
        Region::Footer => &property.assets.footer,
    };

    let css = collect(
        group.css.iter().map(|asset| transform_css(asset, at)),
        &mut warnings,
    );
    let js = collect(
        group.js.iter().map(|asset| transform_js(asset, at)),
        &mut warnings,
    );
    data.insert(format!("css{}", region.suffix()), css);
    data.insert(format!("js{}", region.suffix()), js);

    if region == Region::Header {
        data.insert("metas", complete_pairs(&property.meta));
        data.insert("httpEquiv", complete_pairs(&property.http_equiv));
        data.insert("mobileIcons", to_value(&property.mobile_icons));
        data.insert("facebook", to_value(&property.social.facebook));
        data.insert("twitter", to_value(&property.social.twitter));
        data.insert("google", to_value(&property.social.google));
    }

    BuiltView { data, warnings }
}

fn collect<T: Serialize>(
    outcomes: impl Iterator<Item = LinkOutcome<T>>,
    warnings: &mut Vec<LinkWarning>,
) -> Value {
    let mut links = Vec::new();
    for outcome in outcomes {
        if let LinkOutcome::Emitted {
            asset,
            warnings: raised,
        } = outcome
        {
            warnings.extend(raised);
            links.push(to_value(&asset));
        }
    }
    Value::Array(links)
}

fn complete_pairs(pairs: &[NameValue]) -> Value {
    let kept: Vec<&NameValue> = pairs.iter().filter(|pair| pair.is_complete()).collect();
    to_value(&kept)
}

// Plain data structs with string keys always serialize.
fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
