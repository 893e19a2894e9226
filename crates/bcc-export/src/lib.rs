//! Spreadsheet and CSV output for coupon data.
//!
//! Every export is a pure transformation into a [`Sheet`] followed by a writer
//! call. There is no merging with existing files.

pub mod error;
pub mod filenames;
pub mod report;
pub mod sheet;
pub mod sheets;
pub mod writers;

pub use error::ExportError;
pub use filenames::{coupon_export_filename, coupon_report_filename, generation_filename};
pub use report::{coupon_report_sheet, ReportEntry, ReportStatus};
pub use sheet::{Cell, Sheet};
pub use sheets::{coupon_export_sheet, generation_sheet};
pub use writers::{read_codes, write_csv, write_xlsx};
