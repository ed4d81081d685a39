use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which fields of a (sub-)object the server should return.
///
/// Encoded as `"extend"`, `"count"` or an array of field names.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SelectQuery {
    Mode(SelectMode),
    Fields(Vec<String>),
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    Extend,
    Count,
}

impl SelectQuery {
    pub const EXTEND: Self = Self::Mode(SelectMode::Extend);
    pub const COUNT: Self = Self::Mode(SelectMode::Count);

    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(fields.into_iter().map(Into::into).collect())
    }
}

impl FromStr for SelectQuery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "extend" => return Ok(Self::EXTEND),
            "count" => return Ok(Self::COUNT),
            "" => return Err("empty select query".to_string()),
            _ => {}
        }
        let fields: Vec<String> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(ToString::to_string)
            .collect();
        if fields.is_empty() {
            return Err(format!("no field names in select query: {s}"));
        }
        Ok(Self::Fields(fields))
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}
