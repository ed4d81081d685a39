use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use zbx_apps::types::{SelectQuery, SortOrder};
use zbx_apps::zbx_client::{ApplicationQuery, GetParameters};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(author, version, about = "List Zabbix applications", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: ./config.toml if present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Allow plain HTTP API URLs.
    #[arg(long, action = ArgAction::SetTrue)]
    pub insecure: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Emit logs as JSON (requires `--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "zbx_apps=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    #[command(flatten)]
    pub filters: Filters,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(clap::Args, Debug, Default)]
pub struct Filters {
    /// Only applications holding these items.
    #[arg(long = "item-id", value_name = "ID", value_delimiter = ',')]
    pub item_ids: Vec<String>,

    /// Only applications of hosts in these host groups.
    #[arg(long = "group-id", value_name = "ID", value_delimiter = ',')]
    pub group_ids: Vec<String>,

    /// Only applications of these templates.
    #[arg(long = "template-id", value_name = "ID", value_delimiter = ',')]
    pub template_ids: Vec<String>,

    /// Only applications of these hosts.
    #[arg(long = "host-id", value_name = "ID", value_delimiter = ',')]
    pub host_ids: Vec<String>,

    /// Only applications of hosts monitored by these proxies.
    #[arg(long = "proxy-id", value_name = "ID", value_delimiter = ',')]
    pub proxy_ids: Vec<String>,

    /// Only applications of hosts using these interfaces.
    #[arg(long = "interface-id", value_name = "ID", value_delimiter = ',')]
    pub interface_ids: Vec<String>,

    /// Only applications used in these graphs.
    #[arg(long = "graph-id", value_name = "ID", value_delimiter = ',')]
    pub graph_ids: Vec<String>,

    /// Only applications used in these triggers.
    #[arg(long = "trigger-id", value_name = "ID", value_delimiter = ',')]
    pub trigger_ids: Vec<String>,

    /// Only these applications.
    #[arg(long = "application-id", value_name = "ID", value_delimiter = ',')]
    pub application_ids: Vec<String>,

    /// Include web applications.
    #[arg(long, action = ArgAction::SetTrue)]
    pub web_application: bool,

    /// true: inherited applications only; false: own applications only.
    #[arg(long, value_name = "BOOL")]
    pub inherited: Option<bool>,

    /// true: template applications only; false: host applications only.
    #[arg(long, value_name = "BOOL")]
    pub templated: Option<bool>,

    /// Only enabled applications of monitored hosts.
    #[arg(long, action = ArgAction::SetTrue)]
    pub monitored: bool,

    /// Host group name.
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Technical host name.
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,

    /// Application name.
    #[arg(long, value_name = "NAME")]
    pub application: Option<String>,

    /// Only applications used in triggers.
    #[arg(long, action = ArgAction::SetTrue)]
    pub with_triggers: bool,

    /// Fetch items: "extend", "count" or a comma separated field list.
    #[arg(long, value_name = "SELECT", value_parser = parse_select)]
    pub select_items: Option<SelectQuery>,

    /// Substring match on the application name.
    #[arg(long, value_name = "TEXT")]
    pub search_name: Option<String>,

    /// Maximum number of applications returned.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Sort by this field (e.g. "name").
    #[arg(long, value_name = "FIELD")]
    pub sort_field: Option<String>,

    /// Sort order: asc or desc.
    #[arg(long, value_name = "ORDER", value_parser = parse_sort_order)]
    pub sort_order: Option<SortOrder>,
}

fn parse_select(raw: &str) -> Result<SelectQuery, String> {
    raw.parse()
}

fn parse_sort_order(raw: &str) -> Result<SortOrder, String> {
    raw.parse()
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Filters {
    pub fn into_query(self) -> ApplicationQuery {
        let search = self.search_name.map(|name| {
            std::iter::once(("name".to_string(), serde_json::Value::String(name))).collect()
        });
        ApplicationQuery {
            get: GetParameters {
                limit: self.limit,
                sort_field: self.sort_field.map(|field| vec![field]),
                sort_order: self.sort_order,
                search,
                ..GetParameters::default()
            },
            item_ids: non_empty(self.item_ids),
            group_ids: non_empty(self.group_ids),
            template_ids: non_empty(self.template_ids),
            host_ids: non_empty(self.host_ids),
            proxy_ids: non_empty(self.proxy_ids),
            interface_ids: non_empty(self.interface_ids),
            graph_ids: non_empty(self.graph_ids),
            trigger_ids: non_empty(self.trigger_ids),
            application_ids: non_empty(self.application_ids),
            web_application: self.web_application,
            inherited: self.inherited,
            templated: self.templated,
            monitored: self.monitored,
            group: self.group,
            host: self.host,
            application: self.application,
            with_triggers: self.with_triggers,
            select_items: self.select_items,
        }
    }
}
