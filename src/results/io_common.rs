// Primitives for reading the result tables.

use std::path::Path;
use std::str::FromStr;

use crate::results::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}

/// A non-empty line of a table. The cells are trimmed.
#[derive(PartialEq, Debug, Clone)]
pub struct Row {
    /// 1-based, as reported by the CSV reader.
    pub lineno: usize,
    pub cells: Vec<String>,
}

impl Row {
    pub fn cell(&self, path: &str, column: usize) -> BResult<&str> {
        let c = self.cells.get(column).context(CsvLineTooShortSnafu {
            path,
            lineno: self.lineno,
            column,
        })?;
        Ok(c.as_str())
    }

    /// The content of a cell that must be present and parse.
    pub fn parse<T: FromStr>(&self, path: &str, column: usize, field: &str) -> BResult<T> {
        let content = self.cell(path, column)?;
        match content.parse::<T>() {
            Ok(x) => Ok(x),
            Err(_) => Err(Box::new(ResultsError::RequiredField {
                path: path.to_string(),
                lineno: self.lineno,
                field: field.to_string(),
                content: content.to_string(),
            })),
        }
    }

    /// The last non-empty cell.
    pub fn last(&self) -> Option<&str> {
        self.cells
            .iter()
            .rev()
            .find(|c| !c.is_empty())
            .map(|c| c.as_str())
    }
}

/// Reads all the lines of a table.
///
/// With a space delimiter, repeated spaces count as one separator. Otherwise
/// empty cells are kept so that the columns keep their position.
pub fn read_table(path: &str, delimiter: u8, drop_last_row: bool) -> BResult<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let collapse = delimiter == b' ';

    let mut rows: Vec<Row> = vec![];
    for (idx, record_r) in rdr.records().enumerate() {
        let record = record_r.context(CsvLineParseSnafu {
            path,
            lineno: idx + 1,
        })?;
        let lineno = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);
        let cells: Vec<String> = record
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !collapse || !c.is_empty())
            .collect();
        if cells.iter().all(|c| c.is_empty()) {
            debug!("read_table: {}: skipping empty line {}", path, lineno);
            continue;
        }
        rows.push(Row { lineno, cells });
    }
    if drop_last_row {
        if let Some(last) = rows.pop() {
            debug!("read_table: {}: dropping last row {:?}", path, last.cells);
        }
    }
    info!("read_table: {}: {} rows", path, rows.len());
    Ok(rows)
}

/// Scores are integers. Anything else (`-`, `n/a`, ...) is a missing score.
pub fn parse_score_if_possible(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

pub fn parse_float_if_possible(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}
