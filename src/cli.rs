use std::path::PathBuf;

use clap::Parser;

use crate::sink::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "address-report")]
#[command(version, long_about = None)]
#[command(about = "Export bitcoin and ethereum address activity from Blockchair to a spreadsheet")]
pub struct Cli {
    /// Addresses to export, bitcoin (1…, 3…, bc1…) or ethereum (0x…)
    #[arg(required = true, num_args = 1..)]
    pub addresses: Vec<String>,

    #[arg(short, long, help = "Output file name, prefixed with btc_ or eth_")]
    pub name: String,

    #[arg(short, long, default_value = ".", help = "Directory to write into")]
    pub output_dir: PathBuf,

    #[arg(short, long, default_value_t = OutputFormat::Xlsx, help = "Output format: xlsx or csv")]
    pub format: OutputFormat,
}
