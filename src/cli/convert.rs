use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::Table;

use crate::error::{LedgerliftError, Result};
use crate::extract::extract_pages;
use crate::models::ParseStats;
use crate::parser::parse_pages;
use crate::workbook::write_workbook;

struct FileReport {
    transactions: usize,
    accounts: usize,
    stats: ParseStats,
    output: PathBuf,
}

fn is_pdf(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// A file argument is taken as-is; a directory is scanned (non-recursively)
/// for .pdf files, in name order.
fn collect_sources(source: &Path) -> Result<Vec<PathBuf>> {
    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = fs::read_dir(source)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_pdf(path))
        .collect();
    files.sort();
    Ok(files)
}

fn convert_file(file: &Path, output_dir: &Path) -> Result<FileReport> {
    let pages = extract_pages(file)?;
    let outcome = parse_pages(pages);
    let base = file.file_stem().and_then(|n| n.to_str()).unwrap_or("ledger");
    let output = output_dir.join(format!("{base}.xlsx"));
    write_workbook(&outcome.transactions, &outcome.summaries, &output)?;
    Ok(FileReport {
        transactions: outcome.transactions.len(),
        accounts: outcome.summaries.len(),
        stats: outcome.stats,
        output,
    })
}

pub fn run(source: &str, output: Option<&str>) -> Result<()> {
    let source = Path::new(source);
    let files = collect_sources(source)?;
    if files.is_empty() {
        println!("No PDF files found in {}", source.display());
        return Ok(());
    }

    let output_dir = Path::new(output.unwrap_or("output"));
    fs::create_dir_all(output_dir)?;

    let mut table = Table::new();
    table.set_header(vec!["File", "Transactions", "Accounts", "Output"]);
    let mut failures = 0usize;

    for file in &files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("?")
            .to_string();
        match convert_file(file, output_dir) {
            Ok(report) => {
                println!(
                    "{} {} -> {}",
                    "Processed".green(),
                    file.display(),
                    report.output.display()
                );
                let stats = report.stats;
                if stats.pages_skipped > 0 || stats.lines_ignored > 0 || stats.orphan_rows > 0 {
                    println!(
                        "  {} pages skipped: {}, lines ignored: {}, orphan rows: {}",
                        "note".yellow(),
                        stats.pages_skipped,
                        stats.lines_ignored,
                        stats.orphan_rows
                    );
                }
                table.add_row(vec![
                    name,
                    report.transactions.to_string(),
                    report.accounts.to_string(),
                    report.output.display().to_string(),
                ]);
            }
            Err(e) => {
                eprintln!("{} {}: {e}", "Failed".red(), file.display());
                failures += 1;
            }
        }
    }

    println!("{table}");
    if failures > 0 {
        return Err(LedgerliftError::Failed(failures));
    }
    Ok(())
}
