// The tables with all the solutions found over time, IPC 2011.

use std::collections::{BTreeSet, HashMap};

use crate::results::io_common::{read_table, Row};
use crate::results::*;

const PLANNER: usize = 0;
const PROBLEM: usize = 2;
const TIMES: usize = 3;
const VALUES: usize = 4;

/// The best solution of a planner on a problem.
#[derive(PartialEq, Debug, Clone, Copy)]
struct BestSolution {
    score: i64,
    time_ms: i64,
}

/// Reads the status of every (planner, problem) pair and their best solution.
///
/// The entries are sorted by problem, then by planner in the order of the
/// finished file. A pair missing from the finished file has no status.
pub fn read_solution_series(
    path: &str,
    score_path: Option<&str>,
    delimiter: u8,
    drop_last_row: bool,
) -> BResult<Vec<SolutionEntry>> {
    let finished = read_table(path, delimiter, drop_last_row)?;
    let mut planners: Vec<String> = vec![];
    let mut problems: BTreeSet<u32> = BTreeSet::new();
    let mut statuses: HashMap<(u32, String), String> = HashMap::new();
    for row in finished.iter().skip(1) {
        let planner = row.cell(path, PLANNER)?.to_string();
        let problem: u32 = row.parse(path, PROBLEM, "problem index")?;
        // The two flags add up to the status code.
        let solved: i64 = row.parse(path, 3, "solved flag")?;
        let validated: i64 = row.parse(path, 4, "validated flag")?;
        if !planners.contains(&planner) {
            planners.push(planner.clone());
        }
        problems.insert(problem);
        statuses.insert((problem, planner), (solved + validated).to_string());
    }

    let mut solutions: HashMap<(u32, String), BestSolution> = HashMap::new();
    if let Some(score_path) = score_path {
        let scores = read_table(score_path, delimiter, drop_last_row)?;
        for row in scores.iter().skip(1) {
            let planner = row.cell(score_path, PLANNER)?.to_string();
            let problem: u32 = row.parse(score_path, PROBLEM, "problem index")?;
            if let Some(best) = best_solution(score_path, row)? {
                debug!(
                    "read_solution_series: {} p{}: best solution {:?}",
                    planner, problem, best
                );
                solutions.insert((problem, planner), best);
            }
        }
    } else {
        warn!("read_solution_series: {}: no score file, no run will have a score", path);
    }

    let mut res: Vec<SolutionEntry> = vec![];
    for problem in problems.iter() {
        for planner in planners.iter() {
            let key = (*problem, planner.clone());
            let solution = solutions.get(&key);
            res.push(SolutionEntry {
                problem: problem_name_padded(*problem),
                planner: planner.clone(),
                status: statuses.get(&key).cloned(),
                score: solution.map(|s| s.score),
                time_ms: solution.map(|s| s.time_ms),
            });
        }
    }
    info!(
        "read_solution_series: {}: {} problems, {} planners, {} solutions",
        path,
        problems.len(),
        planners.len(),
        solutions.len()
    );
    Ok(res)
}

// The solution with the lowest value, and the time (seconds) at which it was found.
fn best_solution(path: &str, row: &Row) -> BResult<Option<BestSolution>> {
    let (times_s, values_s) = match (row.cells.get(TIMES), row.cells.get(VALUES)) {
        (Some(t), Some(v)) if !t.is_empty() && !v.is_empty() => (t, v),
        _ => return Ok(None),
    };
    let required = |field: &str, content: &str| {
        Box::new(ResultsError::RequiredField {
            path: path.to_string(),
            lineno: row.lineno,
            field: field.to_string(),
            content: content.to_string(),
        })
    };
    let mut times: Vec<f64> = vec![];
    for t in times_s.split(',') {
        times.push(t.trim().parse().map_err(|_| required("solution time", t))?);
    }
    let mut best: Option<(usize, f64)> = None;
    for (idx, v) in values_s.split(',').enumerate() {
        let value: f64 = v.trim().parse().map_err(|_| required("solution value", v))?;
        if best.map(|(_, b)| value < b).unwrap_or(true) {
            best = Some((idx, value));
        }
    }
    match best {
        Some((idx, value)) => {
            let time = times
                .get(idx)
                .ok_or_else(|| required("solution times", times_s.as_str()))?;
            Ok(Some(BestSolution {
                score: value.round() as i64,
                time_ms: (time * 1000.0).round() as i64,
            }))
        }
        None => Ok(None),
    }
}
