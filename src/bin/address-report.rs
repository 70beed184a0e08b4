use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
pub async fn main() -> Result<ExitCode> {
    address_report::run(address_report::Cli::parse()).await
}
