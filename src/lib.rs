mod address;
mod blockchair;
mod cli;
mod env;
mod export;
pub mod log;
mod paginate;
mod report;
mod sink;

use std::process::ExitCode;

use anyhow::Result;
use tracing::error;

pub use cli::Cli;

use self::blockchair::BlockchairClient;
use self::env::APP_CONFIG;
use self::export::{export_addresses, ExportRequest};
use self::paginate::PageSettings;

pub async fn run(cli: Cli) -> Result<ExitCode> {
    log::init();

    let client = BlockchairClient::new(&APP_CONFIG);
    let sink = cli.format.sink();
    let request = ExportRequest {
        addresses: cli.addresses,
        name: cli.name,
        output_dir: cli.output_dir,
    };

    let summary = export_addresses(
        &client,
        sink.as_ref(),
        &request,
        PageSettings::from(&*APP_CONFIG),
    )
    .await?;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        error!(
            "{} of {} addresses exported",
            summary.written.len(),
            request.addresses.len()
        );
        Ok(ExitCode::FAILURE)
    }
}
