use std::{fmt, str::FromStr};

use thiserror::Error;

/// Page region a view bundle is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Header,
    Footer,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Header => "header",
            Region::Footer => "footer",
        }
    }

    /// Capitalised name appended to region-specific keys (`cssHeader`, `jsFooter`).
    pub fn suffix(&self) -> &'static str {
        match self {
            Region::Header => "Header",
            Region::Footer => "Footer",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A build was requested for something other than `header` or `footer`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot build data for region [{kind}], expected header or footer")]
pub struct BuildRejected {
    pub kind: String,
}

impl FromStr for Region {
    type Err = BuildRejected;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Region::Header),
            "footer" => Ok(Region::Footer),
            other => Err(BuildRejected {
                kind: other.to_string(),
            }),
        }
    }
}
