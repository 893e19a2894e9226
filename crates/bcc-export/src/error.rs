use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("workbook read error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("{} has no worksheets", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column \"{column}\" not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("sheet has {0} rows, more than a worksheet can hold")]
    TooManyRows(usize),
}
