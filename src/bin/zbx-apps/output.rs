use std::fmt::Write as FmtWrite;

use zbx_apps::Result;
use zbx_apps::error::ZbxError;
use zbx_apps::zbx_client::{Application, Items};

use super::cli::Format;

pub fn render(applications: &[Application], format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut out = serde_json::to_string_pretty(applications).map_err(|err| {
                ZbxError::Json {
                    message: format!("failed to encode applications: {err}"),
                }
            })?;
            out.push('\n');
            Ok(out)
        }
        Format::Text => Ok(render_text(applications)),
    }
}

fn render_text(applications: &[Application]) -> String {
    let name_width = applications
        .iter()
        .map(|app| app.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>14}  {:>10}  {:<name_width$}  {:>5}  {:>5}  TEMPLATES",
        "APPLICATIONID", "HOSTID", "NAME", "FLAGS", "ITEMS"
    );
    for app in applications {
        let items = match &app.items {
            Items::List(items) => items.len().to_string(),
            Items::Count(count) => count.clone(),
        };
        let templates = if app.template_ids.is_empty() {
            "-".to_string()
        } else {
            app.template_ids.join(",")
        };
        let _ = writeln!(
            out,
            "{:>14}  {:>10}  {:<name_width$}  {:>5}  {:>5}  {}",
            app.application_id,
            app.host_id,
            app.name,
            app.flags,
            items,
            templates
        );
    }
    out
}
