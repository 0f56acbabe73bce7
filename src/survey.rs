use log::{debug, info, warn};

use answer_sheet::*;
use snafu::{prelude::*, Snafu};

use std::path::Path;

mod io_common;
mod io_excel;
mod pdf_writer;
mod schema_reader;

pub use crate::survey::io_excel::{format_timestamp, read_table};
pub use crate::survey::pdf_writer::{write_pdf, FontSource};
pub use crate::survey::schema_reader::read_questions;

/// The header of the column holding the submission time of each response.
pub const TIMESTAMP_COLUMN: &str = "Zaman damgası";

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Missing header row in {path}"))]
    MissingHeader { path: String },
    #[snafu(display("Cannot find the column '{label}' in the header"))]
    MissingTimestampColumn { label: String },
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the questions in {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Question {number} ({text:?}) is a rating but has no [min, max] range"))]
    MissingRange { number: usize, text: String },
    #[snafu(display("Error loading font {name}: {source}"))]
    LoadingFont {
        source: printpdf::Error,
        name: String,
    },
    #[snafu(display("Error creating file {path}: {source}"))]
    CreatingPdf {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}: {source}"))]
    WritingPdf {
        source: printpdf::Error,
        path: String,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Where to read the responses and the questions, and where to write the sheets.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunConfig {
    pub input: String,
    pub questions: String,
    pub out_dir: String,
    pub font: String,
    pub excel_worksheet_name: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            input: "data.xlsx".to_string(),
            questions: "questions.json".to_string(),
            out_dir: ".".to_string(),
            font: "DejaVuSans.ttf".to_string(),
            excel_worksheet_name: None,
        }
    }
}

/// Renders and writes the answer sheet of every row of the table.
///
/// Returns the number of files written. A sheet that cannot be written is skipped
/// with a warning; the other respondents are still processed.
pub fn write_sheets(
    table: &Table,
    questions: &[Question],
    out_dir: &Path,
    font: &FontSource,
) -> SurveyResult<usize> {
    if table.rows.is_empty() {
        info!("No responses in the table, nothing to write");
        return Ok(0);
    }
    let ts_idx = table
        .column_by_label(TIMESTAMP_COLUMN)
        .context(MissingTimestampColumnSnafu {
            label: TIMESTAMP_COLUMN,
        })?;
    debug!("write_sheets: timestamp column: {}", ts_idx);

    let column_count = table.column_count();
    let settings = PageSettings::A4;
    let mut written = 0;
    for (idx, row) in table.rows.iter().enumerate() {
        let person_number = idx + 1;
        let timestamp = row.get(ts_idx).map(format_timestamp).unwrap_or_default();
        let sheet = render_respondent(
            person_number,
            &timestamp,
            row,
            column_count,
            questions,
            &settings,
        );

        let path = io_common::output_path(out_dir, person_number);
        let title = io_common::document_title(person_number);
        match write_pdf(&sheet, &title, font, &path) {
            Ok(()) => {
                debug!("write_sheets: wrote {:?}", path);
                written += 1;
            }
            Err(e) => {
                warn!("Skipping respondent {}: {}", person_number, e);
            }
        }
    }
    Ok(written)
}

pub fn run(config: &RunConfig) -> SurveyResult<usize> {
    let questions = read_questions(&config.questions)?;
    info!(
        "Read {} questions from {:?}",
        questions.len(),
        config.questions
    );
    let table = read_table(&config.input, config.excel_worksheet_name.as_deref())?;
    info!(
        "Read {} responses in {} columns from {:?}",
        table.rows.len(),
        table.column_count(),
        config.input
    );
    let font = FontSource::load(&config.font);
    let written = write_sheets(&table, &questions, Path::new(&config.out_dir), &font)?;
    info!(
        "Wrote {} answer sheets out of {} in {:?}",
        written,
        table.rows.len(),
        config.out_dir
    );
    Ok(written)
}
