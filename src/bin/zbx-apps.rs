#[path = "zbx-apps/app.rs"]
mod app;
#[path = "zbx-apps/cli.rs"]
mod cli;
#[path = "zbx-apps/output.rs"]
mod output;

use std::error::Error as StdError;

use zbx_apps::error::Error;

const EXIT_NOT_FOUND: u8 = 2;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = cli::Cli::parse_args();
    match app::run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) if err.is_not_found() => {
            eprintln!("{err}");
            std::process::ExitCode::from(EXIT_NOT_FOUND)
        }
        Err(err) => {
            report_error(&err);
            std::process::ExitCode::from(1)
        }
    }
}

fn report_error(err: &Error) {
    eprintln!("Error: {err}");
    let mut source: Option<&dyn StdError> = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
