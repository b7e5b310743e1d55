use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{AccountSummary, ParseStats, Transaction};

// ---------------------------------------------------------------------------
// Line shapes
// ---------------------------------------------------------------------------

/// Header marker substrings repeated in the page banner. Only the first
/// occurrence of a banner line carries information; repeats are noise.
const BANNER_MARKERS: &[&str] = &["Created:", "General Ledger [Detail]", "ABN:", "Email:"];

fn account_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,3}-\d{4})\s+(.+)$").expect("account header regex"))
}

fn beginning_balance_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Beginning Balance:\s*(.*)$").expect("beginning balance regex"))
}

fn transaction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(\S+)\s+([A-Z]{2})\s+(\d{1,2}/\d{1,2}/\d{4})\s+(.*?)\s+\$?([-\d,.]+)?\s+\$?([-\d,.]+)?\s+(\S*)\s+\$?([-\d,.]+)?\s+\$?([-\d,.]+)?$",
        )
        .expect("transaction regex")
    })
}

fn totals_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^Total:\s*\$?([-\d,.]+)\s+\$?([-\d,.]+)\s+\$?([-\d,.]+)\s+\$?([-\d,.]+)\s*$")
            .expect("totals regex")
    })
}

fn page_footer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Page\s+\d+\s+of\s+\d+$").expect("page footer regex"))
}

fn report_period_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]+\s+\d{4}\s+[Tt]o\s+[A-Za-z]+\s+\d{4}$").expect("period regex")
    })
}

fn is_footer(line: &str) -> bool {
    line.contains("Year End Adjustment") || page_footer_re().is_match(line)
}

fn is_banner_marker(line: &str) -> bool {
    BANNER_MARKERS.iter().any(|m| line.contains(m)) || report_period_re().is_match(line)
}

/// The grey column-title row of the transaction table, redrawn at the top
/// of every page.
fn is_column_titles(line: &str) -> bool {
    line.starts_with("ID No") && line.contains("Ending Balance")
}

/// Strip the leading currency marker and any sign from an amount string.
/// Grouping commas are kept; a trailing credit marker is tolerated.
fn clean_amount(raw: &str) -> String {
    let s = raw.trim();
    let s = s.strip_prefix('$').unwrap_or(s);
    let s = s.strip_prefix('-').unwrap_or(s);
    let s = s.strip_suffix("CR").or_else(|| s.strip_suffix('-')).unwrap_or(s);
    s.trim().to_string()
}

fn clean_opt(capture: Option<regex::Match<'_>>) -> String {
    capture.map(|m| clean_amount(m.as_str())).unwrap_or_default()
}

/// Structured captures from one classified line.
#[derive(Debug, Clone, PartialEq)]
enum LineClass {
    Footer,
    Banner,
    ColumnTitles,
    AccountHeader { id: String, desc: String },
    BeginningBalance(String),
    Transaction(TxnRow),
    Totals(TotalsRow),
    NoMatch,
}

#[derive(Debug, Clone, PartialEq)]
struct TxnRow {
    trans_id: String,
    src: String,
    date: String,
    memo: String,
    debit: String,
    credit: String,
    job_no: String,
    net_activity: String,
    ending_balance: String,
}

#[derive(Debug, Clone, PartialEq)]
struct TotalsRow {
    debit: String,
    credit: String,
    net_activity: String,
    ending_balance: String,
}

/// Classify one line. Checks run in a fixed precedence order and the first
/// match wins; the totals shape is tried only after the transaction shape
/// fails, so a row whose memo mentions "Total:" is still a transaction.
/// The banner shapes apply only while `banner_open`, i.e. between the top
/// of a page and its column-title row.
fn classify(line: &str, banner_open: bool) -> LineClass {
    if is_footer(line) {
        return LineClass::Footer;
    }
    if banner_open {
        if is_column_titles(line) {
            return LineClass::ColumnTitles;
        }
        if is_banner_marker(line) {
            return LineClass::Banner;
        }
    }
    if let Some(caps) = account_header_re().captures(line) {
        return LineClass::AccountHeader {
            id: caps[1].to_string(),
            desc: caps[2].trim().to_string(),
        };
    }
    if let Some(caps) = beginning_balance_re().captures(line) {
        return LineClass::BeginningBalance(clean_amount(&caps[1]));
    }
    if let Some(caps) = transaction_re().captures(line) {
        return LineClass::Transaction(TxnRow {
            trans_id: caps[1].to_string(),
            src: caps[2].to_string(),
            date: caps[3].to_string(),
            memo: caps[4].trim().to_string(),
            debit: clean_opt(caps.get(5)),
            credit: clean_opt(caps.get(6)),
            job_no: caps[7].to_string(),
            net_activity: clean_opt(caps.get(8)),
            ending_balance: clean_opt(caps.get(9)),
        });
    }
    if line.contains("Total:") {
        if let Some(caps) = totals_re().captures(line) {
            return LineClass::Totals(TotalsRow {
                debit: clean_amount(&caps[1]),
                credit: clean_amount(&caps[2]),
                net_activity: clean_amount(&caps[3]),
                ending_balance: clean_amount(&caps[4]),
            });
        }
    }
    LineClass::NoMatch
}

// ---------------------------------------------------------------------------
// Fold over lines
// ---------------------------------------------------------------------------

pub struct ParseOutcome {
    pub transactions: Vec<Transaction>,
    pub summaries: Vec<AccountSummary>,
    pub stats: ParseStats,
}

/// Single pass over ordered pages. `None` pages (no extractable text) are
/// skipped and counted. Malformed lines never error; they are dropped.
pub fn parse_pages<I>(pages: I) -> ParseOutcome
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut parser = LedgerParser::default();
    for page in pages {
        match page {
            Some(text) => parser.feed_page(&text),
            None => parser.stats.pages_skipped += 1,
        }
    }
    parser.finish()
}

/// Running context for the fold. At most one account block is open at a
/// time; every opened block produces exactly one summary.
#[derive(Default)]
struct LedgerParser {
    transactions: Vec<Transaction>,
    summaries: Vec<AccountSummary>,
    stats: ParseStats,
    current_account_id: Option<String>,
    current_account_desc: Option<String>,
    current_beginning_balance: Option<String>,
    seen_header_lines: HashSet<String>,
    header_region_closed: bool,
}

impl LedgerParser {
    fn feed_page(&mut self, text: &str) {
        // Banner state persists across pages; the column-title flag does not.
        self.header_region_closed = false;
        for line in text.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                continue;
            }
            self.feed_line(line);
        }
    }

    fn feed_line(&mut self, line: &str) {
        match classify(line, !self.header_region_closed) {
            LineClass::Footer => {}
            LineClass::ColumnTitles => self.header_region_closed = true,
            LineClass::Banner => {
                if !self.seen_header_lines.insert(line.to_string()) {
                    log::debug!("repeated banner line dropped: {line}");
                }
            }
            LineClass::AccountHeader { id, desc } => {
                // A header on an open block means the previous block's totals
                // row was lost to a page break or extraction glitch.
                if self.current_account_id.is_some() {
                    self.flush(None);
                }
                self.current_account_id = Some(id);
                self.current_account_desc = Some(desc);
            }
            LineClass::BeginningBalance(amount) => {
                if self.current_account_id.is_some() {
                    self.current_beginning_balance = Some(amount);
                }
            }
            LineClass::Transaction(row) => match (&self.current_account_id, &self.current_account_desc) {
                (Some(id), Some(desc)) => {
                    self.transactions.push(Transaction {
                        account_id: id.clone(),
                        account_desc: desc.clone(),
                        trans_id: row.trans_id,
                        src: row.src,
                        date: row.date,
                        memo: row.memo,
                        debit: row.debit,
                        credit: row.credit,
                        job_no: row.job_no,
                        net_activity: row.net_activity,
                        ending_balance: row.ending_balance,
                    });
                }
                _ => {
                    self.stats.orphan_rows += 1;
                    log::debug!("transaction row outside any account block dropped: {line}");
                }
            },
            LineClass::Totals(totals) => {
                if self.current_account_id.is_some() {
                    self.flush(Some(totals));
                } else {
                    log::debug!("totals row outside any account block dropped: {line}");
                }
            }
            LineClass::NoMatch => {
                self.stats.lines_ignored += 1;
                log::debug!("unrecognized line dropped: {line}");
            }
        }
    }

    /// Emit a summary for the open account and clear the context. Without an
    /// explicit totals row the block closes with zero activity and ending
    /// balance = beginning balance.
    fn flush(&mut self, totals: Option<TotalsRow>) {
        let Some(account_id) = self.current_account_id.take() else {
            return;
        };
        let account_desc = self.current_account_desc.take().unwrap_or_default();
        let beginning = self
            .current_beginning_balance
            .take()
            .unwrap_or_else(|| "0.00".to_string());
        let (total_debit, total_credit, total_net_activity, total_ending_balance) = match totals {
            Some(t) => (t.debit, t.credit, t.net_activity, t.ending_balance),
            None => (
                "0.00".to_string(),
                "0.00".to_string(),
                "0.00".to_string(),
                beginning.clone(),
            ),
        };
        self.summaries.push(AccountSummary {
            account_id,
            account_desc,
            beginning_balance: beginning,
            total_debit,
            total_credit,
            total_net_activity,
            total_ending_balance,
        });
    }

    fn finish(mut self) -> ParseOutcome {
        if self.current_account_id.is_some() {
            self.flush(None);
        }
        ParseOutcome {
            transactions: self.transactions,
            summaries: self.summaries,
            stats: self.stats,
        }
    }
}
