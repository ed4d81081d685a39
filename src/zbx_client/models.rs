use serde::{Deserialize, Serialize};

use crate::error::{FieldParseError, ZbxError};

/// A Zabbix application, with its numeric identifiers decoded.
///
/// See: <https://www.zabbix.com/documentation/4.0/manual/api/reference/application/object>
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Application {
    pub host_id: u64,
    pub application_id: u64,
    pub name: String,
    /// Origin of the application (`0` plain, `4` discovered), as sent by the server.
    pub flags: String,
    /// Parent template applications this one is inherited from.
    pub template_ids: Vec<String>,
    /// Items attached to the application; an empty list unless `selectItems` was requested.
    pub items: Items,
}

/// The `items` member, whose shape follows the `selectItems` mode of the request.
///
/// Field selections and `extend` yield a list of items. `count` yields the
/// number of items as a decimal string.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Items {
    List(Vec<Item>),
    Count(String),
}

impl Items {
    /// Items carried inline; empty for [`Items::Count`].
    #[must_use]
    pub fn list(&self) -> &[Item] {
        match self {
            Self::List(items) => items,
            Self::Count(_) => &[],
        }
    }

    /// The count reported by the server, or the length of the inline list.
    #[must_use]
    pub fn count(&self) -> Option<u64> {
        match self {
            Self::List(items) => u64::try_from(items.len()).ok(),
            Self::Count(raw) => raw.trim().parse().ok(),
        }
    }

    fn is_empty_list(&self) -> bool {
        matches!(self, Self::List(items) if items.is_empty())
    }
}

impl Default for Items {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<Vec<Item>> for Items {
    fn from(items: Vec<Item>) -> Self {
        Self::List(items)
    }
}

/// An item as returned by `selectItems`, carried without conversion.
///
/// Which members are present depends on the select query sent with the request.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Item {
    #[serde(rename = "itemid", default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(rename = "hostid", default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "key_", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "lastvalue", default, skip_serializing_if = "Option::is_none")]
    pub last_value: Option<String>,
    #[serde(rename = "lastclock", default, skip_serializing_if = "Option::is_none")]
    pub last_clock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `application.get` row exactly as transmitted.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct WireApplication {
    #[serde(rename = "hostid", default)]
    pub host_id: String,
    #[serde(rename = "applicationid")]
    pub application_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "flag", alias = "flags", default)]
    pub flag: String,
    #[serde(rename = "templateids", default)]
    pub template_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Items::is_empty_list")]
    pub items: Items,
}

impl TryFrom<WireApplication> for Application {
    type Error = FieldParseError;

    fn try_from(value: WireApplication) -> std::result::Result<Self, FieldParseError> {
        let host_id = parse_id("hostid", &value.host_id)?;
        let application_id = parse_id("applicationid", &value.application_id)?;
        Ok(Self {
            host_id,
            application_id,
            name: value.name,
            flags: value.flag,
            template_ids: value.template_ids,
            items: value.items,
        })
    }
}

impl From<&Application> for WireApplication {
    fn from(value: &Application) -> Self {
        Self {
            host_id: value.host_id.to_string(),
            application_id: value.application_id.to_string(),
            name: value.name.clone(),
            flag: value.flags.clone(),
            template_ids: value.template_ids.clone(),
            items: value.items.clone(),
        }
    }
}

/// Map every row of a response, failing on the first row that does not convert.
///
/// # Errors
///
/// Returns [`ZbxError::FieldParse`] carrying the position of the offending row.
pub fn convert_all(rows: Vec<WireApplication>) -> std::result::Result<Vec<Application>, ZbxError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            Application::try_from(row).map_err(|source| ZbxError::FieldParse { index, source })
        })
        .collect()
}

fn parse_id(field: &'static str, raw: &str) -> std::result::Result<u64, FieldParseError> {
    raw.parse::<u64>().map_err(|source| FieldParseError {
        field,
        value: raw.to_string(),
        source,
    })
}
