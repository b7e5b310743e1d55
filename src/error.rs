use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerliftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Nothing to write: no {0} were extracted")]
    EmptyReport(&'static str),

    #[error("{0} file(s) failed to convert")]
    Failed(usize),
}

pub type Result<T> = std::result::Result<T, LedgerliftError>;
