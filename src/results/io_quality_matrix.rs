// The tables with one row per problem and one column per planner, IPC 2014.

use std::collections::HashMap;

use crate::results::io_common::{parse_float_if_possible, parse_score_if_possible, read_table, Row};
use crate::results::*;

/// Reads the finished flags and, if provided, the quality ratios of every
/// planner.
///
/// Without quality file the finished flag is the quality and the last column
/// of the finished file is the best score.
pub fn read_quality_matrix(
    path: &str,
    score_path: Option<&str>,
    delimiter: u8,
    drop_last_row: bool,
) -> BResult<Vec<QualityMatrixRow>> {
    let finished = read_table(path, delimiter, drop_last_row)?;
    let (header, body) = finished
        .split_first()
        .context(MissingHeaderSnafu { path })?;
    let mut planners: Vec<String> = header.cells.iter().skip(1).cloned().collect();
    if score_path.is_none() {
        // The best column
        planners.pop();
    }
    debug!("read_quality_matrix: planners: {:?}", planners);

    let mut res: Vec<QualityMatrixRow> = vec![];
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in body.iter() {
        let problem = row.cell(path, 0)?.to_string();
        let best_score = match score_path {
            Some(_) => None,
            None => row
                .cells
                .get(planners.len() + 1)
                .and_then(|c| parse_score_if_possible(c)),
        };
        let entries = read_entries(row, &planners, score_path.is_none());
        positions.insert(problem.clone(), res.len());
        res.push(QualityMatrixRow {
            problem,
            best_score,
            entries,
        });
    }

    if let Some(score_path) = score_path {
        let scores = read_table(score_path, delimiter, drop_last_row)?;
        // The first row is the header, with the same planners.
        for row in scores.iter().skip(1) {
            let problem = row.cell(score_path, 0)?;
            let matrix_row = match positions.get(problem) {
                Some(pos) => &mut res[*pos],
                None => {
                    warn!(
                        "read_quality_matrix: {}: line {}: problem {} is not in {}, skipping",
                        score_path, row.lineno, problem, path
                    );
                    continue;
                }
            };
            matrix_row.best_score = row.last().and_then(parse_score_if_possible);
            for (idx, entry) in matrix_row.entries.iter_mut().enumerate() {
                entry.quality = row.cells.get(idx + 1).and_then(|c| parse_float_if_possible(c));
            }
            debug!("read_quality_matrix: qualities: {:?}", matrix_row);
        }
    }
    info!(
        "read_quality_matrix: {}: {} problems, {} planners",
        path,
        res.len(),
        planners.len()
    );
    Ok(res)
}

// An empty or absent flag is a planner without attempt on the problem.
fn read_entries(row: &Row, planners: &[String], flag_is_quality: bool) -> Vec<QualityEntry> {
    planners
        .iter()
        .enumerate()
        .map(|(idx, planner)| {
            let status = row.cells.get(idx + 1).filter(|c| !c.is_empty()).cloned();
            if status.is_none() {
                debug!(
                    "read_entries: line {}: no attempt for planner {}",
                    row.lineno, planner
                );
            }
            QualityEntry {
                planner: planner.clone(),
                quality: match &status {
                    Some(flag) if flag_is_quality => parse_float_if_possible(flag),
                    _ => None,
                },
                status,
            }
        })
        .collect()
}
