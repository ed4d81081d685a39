use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::types::{SelectQuery, SortOrder};

/// Parameters shared by every `*.get` method.
///
/// Unset members are left out of the request so the server default applies.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GetParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<SelectQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "sortfield", skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<Vec<String>>,
    #[serde(rename = "sortorder", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// Substring match on the given fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<BTreeMap<String, Value>>,
    /// Exact match on the given fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<BTreeMap<String, Value>>,
    #[serde(rename = "searchByAny", skip_serializing_if = "Option::is_none")]
    pub search_by_any: Option<bool>,
    #[serde(
        rename = "searchWildcardsEnabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub search_wildcards_enabled: Option<bool>,
    #[serde(rename = "startSearch", skip_serializing_if = "Option::is_none")]
    pub start_search: Option<bool>,
    #[serde(rename = "excludeSearch", skip_serializing_if = "Option::is_none")]
    pub exclude_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
}

/// Filters for `application.get`.
///
/// The server ANDs every member that is present. `webApplication`, `monitored` and
/// `with_triggers` are flags: the server honours them whenever they appear, so they
/// are only sent when `true`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ApplicationQuery {
    #[serde(flatten)]
    pub get: GetParameters,

    #[serde(rename = "itemids", skip_serializing_if = "Option::is_none")]
    pub item_ids: Option<Vec<String>>,
    #[serde(rename = "groupids", skip_serializing_if = "Option::is_none")]
    pub group_ids: Option<Vec<String>>,
    #[serde(rename = "templateids", skip_serializing_if = "Option::is_none")]
    pub template_ids: Option<Vec<String>>,
    #[serde(rename = "hostids", skip_serializing_if = "Option::is_none")]
    pub host_ids: Option<Vec<String>>,
    #[serde(rename = "proxyids", skip_serializing_if = "Option::is_none")]
    pub proxy_ids: Option<Vec<String>>,
    #[serde(rename = "interfaceids", skip_serializing_if = "Option::is_none")]
    pub interface_ids: Option<Vec<String>>,
    #[serde(rename = "graphids", skip_serializing_if = "Option::is_none")]
    pub graph_ids: Option<Vec<String>>,
    #[serde(rename = "triggerids", skip_serializing_if = "Option::is_none")]
    pub trigger_ids: Option<Vec<String>>,
    #[serde(rename = "applicationids", skip_serializing_if = "Option::is_none")]
    pub application_ids: Option<Vec<String>>,

    #[serde(rename = "webApplication", skip_serializing_if = "is_unset")]
    pub web_application: bool,
    /// `true` for inherited applications only, `false` for non-inherited only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited: Option<bool>,
    /// `true` for template applications only, `false` for host applications only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
    #[serde(skip_serializing_if = "is_unset")]
    pub monitored: bool,

    /// Name of a host group the application's host belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Technical name of the application's host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,

    #[serde(rename = "with_triggers", skip_serializing_if = "is_unset")]
    pub with_triggers: bool,

    #[serde(rename = "selectItems", skip_serializing_if = "Option::is_none")]
    pub select_items: Option<SelectQuery>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_unset(flag: &bool) -> bool {
    !*flag
}

fn ids<I, S>(values: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Some(values.into_iter().map(Into::into).collect())
}

impl ApplicationQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn host_ids<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.host_ids = ids(values);
        self
    }

    #[must_use]
    pub fn group_ids<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_ids = ids(values);
        self
    }

    #[must_use]
    pub fn template_ids<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.template_ids = ids(values);
        self
    }

    #[must_use]
    pub fn item_ids<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_ids = ids(values);
        self
    }

    #[must_use]
    pub fn application_ids<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.application_ids = ids(values);
        self
    }

    #[must_use]
    pub fn select_items(mut self, select: SelectQuery) -> Self {
        self.select_items = Some(select);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.get.limit = Some(limit);
        self
    }
}
