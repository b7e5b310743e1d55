pub mod convert;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ledgerlift",
    about = "Extract general-ledger detail PDFs into Excel workbooks."
)]
pub struct Cli {
    /// PDF file, or directory scanned for PDF files
    pub source: String,

    /// Directory for the generated .xlsx files (default: output)
    pub output: Option<String>,
}
