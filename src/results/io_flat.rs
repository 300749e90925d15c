// The tables with one row per (track, planner, problem), IPC 2008.

use crate::results::io_common::{parse_float_if_possible, parse_score_if_possible, read_table};
use crate::results::*;

const TRACK: usize = 0;
const PLANNER: usize = 1;
const DOMAIN: usize = 2;
const PROBLEM: usize = 3;
const STATUS: usize = 4;
const SCORE: usize = 5;
const BEST_SCORE: usize = 6;
const QUALITY: usize = 7;

/// Reads the rows of one domain and one track. Both are matched as substrings
/// of their columns.
pub fn read_flat_rows(
    path: &str,
    delimiter: u8,
    drop_last_row: bool,
    domain_filter: &str,
    track: &str,
) -> BResult<Vec<FlatRow>> {
    let rows = read_table(path, delimiter, drop_last_row)?;
    let mut res: Vec<FlatRow> = vec![];
    for row in rows.iter() {
        if !row.cell(path, DOMAIN)?.contains(domain_filter) || !row.cell(path, TRACK)?.contains(track)
        {
            continue;
        }
        let flat_row = FlatRow {
            problem: row.cell(path, PROBLEM)?.to_string(),
            planner: row.cell(path, PLANNER)?.to_string(),
            status: row.cell(path, STATUS)?.to_string(),
            score: parse_score_if_possible(row.cell(path, SCORE)?),
            best_score: parse_score_if_possible(row.cell(path, BEST_SCORE)?),
            quality: parse_float_if_possible(row.cell(path, QUALITY)?),
        };
        debug!("read_flat_rows: lineno: {} {:?}", row.lineno, flat_row);
        res.push(flat_row);
    }
    info!(
        "read_flat_rows: {}: {} rows for domain {} track {}",
        path,
        res.len(),
        domain_filter,
        track
    );
    Ok(res)
}
