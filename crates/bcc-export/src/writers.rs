//! Persisting sheets to disk and reading code lists back.
//!
//! Writers overwrite whatever is at `path`; callers pick unique filenames.

use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

use crate::error::ExportError;
use crate::sheet::{Cell, Sheet};

/// Writes `sheet` as a single-worksheet XLSX workbook with a bold header row.
///
/// # Errors
///
/// Returns [`ExportError::Xlsx`] if the workbook cannot be built or saved, or
/// [`ExportError::TooManyRows`] if the sheet exceeds the worksheet limits.
pub fn write_xlsx(sheet: &Sheet, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.name)?;

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, header, &header_format)?;
    }

    for (index, row) in sheet.rows.iter().enumerate() {
        let row_num = u32::try_from(index + 1).map_err(|_| ExportError::TooManyRows(index + 1))?;
        for (col, cell) in row.iter().enumerate() {
            let col = column_index(col)?;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                Cell::Integer(n) => {
                    // i64 beyond 2^53 loses precision as an XLSX number.
                    #[allow(clippy::cast_precision_loss)]
                    worksheet.write_number(row_num, col, *n as f64)?;
                }
                Cell::Decimal(d) => match d.to_f64() {
                    Some(n) => {
                        worksheet.write_number(row_num, col, n)?;
                    }
                    None => {
                        worksheet.write_string(row_num, col, d.to_string())?;
                    }
                },
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                Cell::Empty => {}
            }
        }
    }

    worksheet.autofit();
    workbook.save(path)?;

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet.name,
        rows = sheet.rows.len(),
        "wrote xlsx"
    );
    Ok(())
}

fn column_index(col: usize) -> Result<u16, ExportError> {
    u16::try_from(col).map_err(|_| ExportError::TooManyRows(col))
}

/// Writes `sheet` as CSV with a header row. The sheet name is not stored.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] on any write failure.
pub fn write_csv(sheet: &Sheet, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), rows = sheet.rows.len(), "wrote csv");
    Ok(())
}

/// Reads the non-blank, trimmed values of `column` from a CSV file or the
/// first worksheet of a workbook (`.xlsx`, `.xlsm`, `.xls`, `.ods`). The first
/// row holds the headers.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] or [`ExportError::Workbook`] if the file cannot
/// be read or parsed, [`ExportError::EmptyWorkbook`] if a workbook has no
/// sheets, or [`ExportError::MissingColumn`] if no header matches `column`.
pub fn read_codes(path: &Path, column: &str) -> Result<Vec<String>, ExportError> {
    let codes = if is_workbook(path) {
        read_workbook_codes(path, column)?
    } else {
        read_csv_codes(path, column)?
    };

    tracing::debug!(path = %path.display(), column, count = codes.len(), "read coupon codes");
    Ok(codes)
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["xlsx", "xlsm", "xls", "ods"]
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn missing_column(column: &str, path: &Path) -> ExportError {
    ExportError::MissingColumn {
        column: column.to_owned(),
        path: path.to_path_buf(),
    }
}

fn read_csv_codes(path: &Path, column: &str) -> Result<Vec<String>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let index = reader
        .headers()?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| missing_column(column, path))?;

    let mut codes = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(code) = record.get(index).map(str::trim).filter(|c| !c.is_empty()) {
            codes.push(code.to_owned());
        }
    }
    Ok(codes)
}

fn read_workbook_codes(path: &Path, column: &str) -> Result<Vec<String>, ExportError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExportError::EmptyWorkbook(path.to_path_buf()))??;

    let mut rows = range.rows();
    let index = rows
        .next()
        .and_then(|headers| {
            headers
                .iter()
                .position(|h| h.to_string().trim() == column)
        })
        .ok_or_else(|| missing_column(column, path))?;

    Ok(rows
        .filter_map(|row| row.get(index))
        .map(|cell| cell.to_string().trim().to_owned())
        .filter(|code| !code.is_empty())
        .collect())
}
