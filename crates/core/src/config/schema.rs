//! Declarative rule table for configuration updates.
//!
//! The schema is plain data: a tree of [`Rule`]s walked against a
//! `serde_json::Value`. Checking never stops at the first failure; every
//! broken rule becomes one [`Violation`]. A node with the wrong type yields a
//! single violation and its children are not inspected.

use serde_json::{Map, Value};
use url::Url;

use super::error::{ValidationErrors, Violation};

/// One node of the schema tree.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// A JSON object with a closed set of keys.
    ///
    /// With `accept_empty`, `{}` passes without checking `min_keys` or
    /// required fields.
    Object {
        min_keys: usize,
        accept_empty: bool,
        fields: &'static [Field],
    },
    /// A JSON array whose items all follow `items`.
    Array {
        min_len: usize,
        items: &'static Rule,
    },
    Text(TextRule),
    Boolean,
    Integer {
        min: i64,
    },
}

/// Constraints on a string. Empty strings are always rejected.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub min_len: usize,
    pub exact_len: Option<usize>,
    pub literal: Option<&'static str>,
    pub http_uri: bool,
}

impl TextRule {
    pub const ANY: Self = Self {
        min_len: 0,
        exact_len: None,
        literal: None,
        http_uri: false,
    };

    pub const fn min_len(min_len: usize) -> Self {
        Self { min_len, ..Self::ANY }
    }

    pub const fn exact_len(len: usize) -> Self {
        Self {
            exact_len: Some(len),
            ..Self::ANY
        }
    }

    pub const fn literal(literal: &'static str) -> Self {
        Self {
            literal: Some(literal),
            ..Self::ANY
        }
    }

    pub const fn http_uri() -> Self {
        Self {
            http_uri: true,
            ..Self::ANY
        }
    }
}

/// A named key of an object rule.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub rule: Rule,
}

impl Field {
    pub const fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            required: true,
            rule,
        }
    }

    pub const fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            required: false,
            rule,
        }
    }
}

const TEXT: Rule = Rule::Text(TextRule::ANY);

const NAME_VALUE: Rule = Rule::Object {
    min_keys: 0,
    accept_empty: false,
    fields: &[
        Field::required("name", TEXT),
        Field::required("value", TEXT),
    ],
};

const FINGERPRINT: Rule = Rule::Object {
    min_keys: 0,
    accept_empty: false,
    fields: &[
        Field::optional("enable", Rule::Boolean),
        Field::optional("key", TEXT),
        Field::optional("dateFormat", TEXT),
        Field::optional("qs", TEXT),
        Field::optional("limit", Rule::Integer { min: 1 }),
    ],
};

const BASE64: Rule = Rule::Object {
    min_keys: 0,
    accept_empty: false,
    fields: &[
        Field::optional("enable", Rule::Boolean),
        Field::optional("qs", TEXT),
    ],
};

const HOST: Rule = Rule::Text(TextRule::http_uri());

const CSS_ASSET: Rule = Rule::Object {
    min_keys: 0,
    accept_empty: false,
    fields: &[
        Field::optional("host", HOST),
        Field::required("link", TEXT),
        Field::required("media", TEXT),
        Field::optional("fingerprint", FINGERPRINT),
        Field::optional("base64", BASE64),
    ],
};

const JS_ASSET: Rule = Rule::Object {
    min_keys: 0,
    accept_empty: false,
    fields: &[
        Field::optional("host", HOST),
        Field::required("link", TEXT),
        Field::optional("defer", Rule::Text(TextRule::literal("defer"))),
        Field::optional("async", Rule::Text(TextRule::literal("async"))),
        Field::optional("fingerprint", FINGERPRINT),
        Field::optional("base64", BASE64),
    ],
};

const ASSET_GROUP: Rule = Rule::Object {
    min_keys: 1,
    accept_empty: false,
    fields: &[
        Field::optional(
            "css",
            Rule::Array {
                min_len: 1,
                items: &CSS_ASSET,
            },
        ),
        Field::optional(
            "js",
            Rule::Array {
                min_len: 1,
                items: &JS_ASSET,
            },
        ),
    ],
};

const ASSETS: Rule = Rule::Object {
    min_keys: 1,
    accept_empty: false,
    fields: &[
        Field::optional("header", ASSET_GROUP),
        Field::optional("footer", ASSET_GROUP),
    ],
};

const MOBILE_ICON: Rule = Rule::Object {
    min_keys: 0,
    accept_empty: false,
    fields: &[
        Field::required("rel", TEXT),
        Field::required("sizes", TEXT),
        Field::required("href", TEXT),
    ],
};

const SOCIAL_TAG: Rule = Rule::Object {
    min_keys: 0,
    accept_empty: false,
    fields: &[
        Field::required("property", TEXT),
        Field::required("content", TEXT),
    ],
};

const SOCIAL_LINK: Rule = Rule::Object {
    min_keys: 0,
    accept_empty: false,
    fields: &[
        Field::required("rel", TEXT),
        Field::required("href", TEXT),
    ],
};

const SOCIAL: Rule = Rule::Object {
    min_keys: 1,
    accept_empty: false,
    fields: &[
        Field::optional(
            "facebook",
            Rule::Array {
                min_len: 0,
                items: &SOCIAL_TAG,
            },
        ),
        Field::optional(
            "twitter",
            Rule::Array {
                min_len: 0,
                items: &SOCIAL_TAG,
            },
        ),
        Field::optional(
            "google",
            Rule::Array {
                min_len: 0,
                items: &SOCIAL_LINK,
            },
        ),
    ],
};

const APP: Rule = Rule::Object {
    min_keys: 1,
    accept_empty: true,
    fields: &[Field::required("name", Rule::Text(TextRule::min_len(3)))],
};

const PROPERTY: Rule = Rule::Object {
    min_keys: 1,
    accept_empty: true,
    fields: &[
        Field::optional("title", Rule::Text(TextRule::min_len(3))),
        Field::optional("language", Rule::Text(TextRule::exact_len(2))),
        Field::optional(
            "meta",
            Rule::Array {
                min_len: 1,
                items: &NAME_VALUE,
            },
        ),
        Field::optional(
            "httpEquiv",
            Rule::Array {
                min_len: 1,
                items: &NAME_VALUE,
            },
        ),
        Field::optional("assets", ASSETS),
        Field::optional(
            "mobileIcons",
            Rule::Array {
                min_len: 1,
                items: &MOBILE_ICON,
            },
        ),
        Field::optional("social", SOCIAL),
    ],
};

/// Schema of a partial configuration update.
pub static CONFIG_SCHEMA: Rule = Rule::Object {
    min_keys: 0,
    accept_empty: false,
    fields: &[Field::optional("app", APP), Field::optional("property", PROPERTY)],
};

/// Check a partial update against [`CONFIG_SCHEMA`], collecting every violation.
pub fn validate(value: &Value) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();
    CONFIG_SCHEMA.check(value, "", &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(violations))
    }
}

impl Rule {
    /// Append one violation per broken constraint under `path` to `out`.
    pub fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        match self {
            Rule::Object {
                min_keys,
                accept_empty,
                fields,
            } => match value.as_object() {
                Some(map) if map.is_empty() && *accept_empty => {}
                Some(map) => check_object(map, *min_keys, fields, path, out),
                None => out.push(Violation::new(path, "must be an object")),
            },
            Rule::Array { min_len, items } => match value.as_array() {
                Some(values) => {
                    if values.len() < *min_len {
                        out.push(Violation::new(
                            path,
                            format!("must contain at least {min_len} item(s)"),
                        ));
                    }
                    for (index, item) in values.iter().enumerate() {
                        items.check(item, &child_path(path, &index.to_string()), out);
                    }
                }
                None => out.push(Violation::new(path, "must be an array")),
            },
            Rule::Text(rule) => match value.as_str() {
                Some(text) => check_text(text, rule, path, out),
                None => out.push(Violation::new(path, "must be a string")),
            },
            Rule::Boolean => {
                if !value.is_boolean() {
                    out.push(Violation::new(path, "must be a boolean"));
                }
            }
            Rule::Integer { min } => match value.as_i64() {
                Some(number) if number < *min => out.push(Violation::new(
                    path,
                    format!("must be greater than or equal to {min}"),
                )),
                Some(_) => {}
                None => out.push(Violation::new(path, "must be an integer")),
            },
        }
    }
}

fn check_object(
    map: &Map<String, Value>,
    min_keys: usize,
    fields: &[Field],
    path: &str,
    out: &mut Vec<Violation>,
) {
    if map.len() < min_keys {
        out.push(Violation::new(
            path,
            format!("must have at least {min_keys} key(s)"),
        ));
    }

    for field in fields {
        let field_path = child_path(path, field.name);
        match map.get(field.name) {
            Some(value) => field.rule.check(value, &field_path, out),
            None if field.required => out.push(Violation::new(field_path, "is required")),
            None => {}
        }
    }

    for key in map.keys() {
        if !fields.iter().any(|field| field.name == key) {
            out.push(Violation::new(child_path(path, key), "is not allowed"));
        }
    }
}

fn check_text(text: &str, rule: &TextRule, path: &str, out: &mut Vec<Violation>) {
    if text.is_empty() {
        out.push(Violation::new(path, "must not be empty"));
        return;
    }

    let len = text.chars().count();
    if len < rule.min_len {
        out.push(Violation::new(
            path,
            format!("must be at least {} characters long", rule.min_len),
        ));
    }
    if let Some(exact) = rule.exact_len {
        if len != exact {
            out.push(Violation::new(
                path,
                format!("must be exactly {exact} characters long"),
            ));
        }
    }
    if let Some(literal) = rule.literal {
        if text != literal {
            out.push(Violation::new(path, format!("must be \"{literal}\"")));
        }
    }
    if rule.http_uri && !is_http_uri(text) {
        out.push(Violation::new(path, "must be a valid http or https URI"));
    }
}

fn is_http_uri(text: &str) -> bool {
    Url::parse(text)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
