use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::{LedgerliftError, Result};
use crate::models::{AccountSummary, Transaction};

// Column order matches the record field order; downstream consumers key on
// these names.
const DETAIL_COLUMNS: &[&str] = &[
    "account_id",
    "account_desc",
    "trans_id",
    "src",
    "date",
    "memo",
    "debit",
    "credit",
    "job_no",
    "net_activity",
    "ending_balance",
];

const SUMMARY_COLUMNS: &[&str] = &[
    "account_id",
    "account_desc",
    "beginning_balance",
    "total_debit",
    "total_credit",
    "total_net_activity",
    "total_ending_balance",
];

/// Write both record streams to one workbook: a `Details` sheet of
/// transactions and a `Summary` sheet of account totals, row order as
/// received. Empty input is a caller error, not a valid empty report.
pub fn write_workbook(
    transactions: &[Transaction],
    summaries: &[AccountSummary],
    path: &Path,
) -> Result<()> {
    if transactions.is_empty() {
        return Err(LedgerliftError::EmptyReport("transactions"));
    }
    if summaries.is_empty() {
        return Err(LedgerliftError::EmptyReport("account summaries"));
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let details = workbook.add_worksheet();
    details.set_name("Details")?;
    write_header_row(details, DETAIL_COLUMNS, &header)?;
    for (i, txn) in transactions.iter().enumerate() {
        let row = (i + 1) as u32;
        let values = [
            &txn.account_id,
            &txn.account_desc,
            &txn.trans_id,
            &txn.src,
            &txn.date,
            &txn.memo,
            &txn.debit,
            &txn.credit,
            &txn.job_no,
            &txn.net_activity,
            &txn.ending_balance,
        ];
        for (col, value) in values.iter().enumerate() {
            details.write_string(row, col as u16, value.as_str())?;
        }
    }

    let summary = workbook.add_worksheet();
    summary.set_name("Summary")?;
    write_header_row(summary, SUMMARY_COLUMNS, &header)?;
    for (i, account) in summaries.iter().enumerate() {
        let row = (i + 1) as u32;
        let values = [
            &account.account_id,
            &account.account_desc,
            &account.beginning_balance,
            &account.total_debit,
            &account.total_credit,
            &account.total_net_activity,
            &account.total_ending_balance,
        ];
        for (col, value) in values.iter().enumerate() {
            summary.write_string(row, col as u16, value.as_str())?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_header_row(sheet: &mut Worksheet, columns: &[&str], format: &Format) -> Result<()> {
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, format)?;
    }
    Ok(())
}
