use calamine::{open_workbook, DataType, Reader, Xlsx};
use chrono::NaiveDateTime;

use crate::survey::*;

/// Layouts accepted for timestamps stored as text.
const TEXT_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Reads the responses of a workbook.
///
/// The first non-empty row is the header, every following row is a respondent.
/// If no worksheet name is given, the first worksheet is used.
pub fn read_table(path: &str, worksheet_name: Option<&str>) -> SurveyResult<Table> {
    let wrange = get_range(path, worksheet_name)?;
    let table = read_range(&wrange).context(MissingHeaderSnafu { path })?;
    Ok(table)
}

/// Converts a worksheet range, keeping every cell at its column in the sheet.
///
/// The range only covers the used cells: when the leading columns are blank it does
/// not start at column A, so the rows are padded back. Blank rows above the header
/// are not part of the range, blank rows between responses are dropped.
fn read_range(wrange: &calamine::Range<DataType>) -> Option<Table> {
    let (start_row, start_col) = wrange.start()?;
    debug!(
        "read_range: used cells start at row {} column {}",
        start_row, start_col
    );
    let pad = |row: &[DataType]| -> Vec<Cell> {
        std::iter::repeat(Cell::Empty)
            .take(start_col as usize)
            .chain(row.iter().map(read_cell))
            .collect()
    };

    let mut iter = wrange.rows();
    let header = iter.next()?;
    debug!("read_range: header: {:?}", header);
    let header: Vec<String> = pad(header).iter().map(cell_text).collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        debug!("read_range: idx: {:?} row: {:?}", idx, row);
        if row.iter().all(|dt| *dt == DataType::Empty) {
            debug!("read_range: idx: {:?}: blank row skipped", idx);
            continue;
        }
        rows.push(pad(row));
    }
    Some(Table { header, rows })
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> SurveyResult<calamine::Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let wrange = match worksheet_name {
        // A worksheet name was provided, use it.
        Some(name) => workbook
            .worksheet_range(name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

#[allow(unreachable_patterns)]
fn read_cell(dt: &DataType) -> Cell {
    match dt {
        DataType::Empty => Cell::Empty,
        DataType::String(s) => Cell::String(s.clone()),
        DataType::Int(i) => Cell::Int(*i),
        DataType::Float(f) => Cell::Float(*f),
        DataType::Bool(b) => Cell::Bool(*b),
        DataType::DateTime(serial) => Cell::DateTime(*serial),
        DataType::Error(e) => Cell::Error(format!("{:?}", e)),
        // Kinds added by later versions of the reader.
        x => Cell::String(x.to_string()),
    }
}

/// The submission time of a response, as printed at the top of its answer sheet.
///
/// Dates stored as numbers are converted from the spreadsheet epoch. Text that does
/// not look like a date is kept as-is.
pub fn format_timestamp(cell: &Cell) -> String {
    let dt: Option<NaiveDateTime> = match cell {
        Cell::DateTime(serial) | Cell::Float(serial) => serial_to_datetime(*serial),
        Cell::Int(days) => serial_to_datetime(*days as f64),
        Cell::String(s) => TEXT_TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok()),
        _ => None,
    };
    match dt {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => cell_text(cell),
    }
}
