mod config;
use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::config::*;

pub mod aggregate;
pub mod gantt;
pub mod manual;

/// Below this quality ratio, the score of a planner cannot be reconstructed.
pub const MIN_DERIVABLE_QUALITY: f64 = 0.01;

/// The normalized quality of a solution: `best_score / score`.
///
/// 1.0 is the best known solution. 0.0 means that there is nothing to compare:
/// one of the scores is missing or not positive.
pub fn quality(best_score: Option<i64>, score: Option<i64>) -> f64 {
    match (best_score, score) {
        (Some(best), Some(s)) if best > 0 && s > 0 => best as f64 / s as f64,
        _ => 0.0,
    }
}

/// Reconstructs the score of a planner from the best score and its quality
/// ratio (`quality = best / score`).
pub fn score_from_quality(best_score: Option<i64>, quality: f64) -> Option<i64> {
    match best_score {
        Some(best) if best > 0 && quality >= MIN_DERIVABLE_QUALITY => {
            Some((best as f64 / quality).round() as i64).filter(|s| *s > 0)
        }
        _ => None,
    }
}

/// Problem names as used in the run records: `p` followed by the index.
pub fn problem_name(index: &str) -> String {
    let index = index.trim();
    if index.starts_with('p') {
        index.to_string()
    } else {
        format!("p{}", index)
    }
}

/// Problem names for zero-based indices, zero-padded to two digits (p01, p02, ...).
pub fn problem_name_padded(zero_based_index: u32) -> String {
    format!("p{:02}", u64::from(zero_based_index) + 1)
}

/// Run records grouped by problem, in the order in which the problems were
/// first seen.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RunsByProblem {
    problems: Vec<(String, Vec<RunRecord>)>,
    positions: HashMap<String, usize>,
}

impl RunsByProblem {
    pub fn push(&mut self, record: RunRecord) {
        match self.positions.get(&record.problem) {
            Some(pos) => self.problems[*pos].1.push(record),
            None => {
                self.positions
                    .insert(record.problem.clone(), self.problems.len());
                self.problems.push((record.problem.clone(), vec![record]));
            }
        }
    }

    pub fn get(&self, problem: &str) -> Option<&[RunRecord]> {
        self.positions
            .get(problem)
            .map(|pos| self.problems[*pos].1.as_slice())
    }

    pub fn problems(&self) -> impl Iterator<Item = &str> {
        self.problems.iter().map(|(p, _)| p.as_str())
    }

    /// The number of records.
    pub fn len(&self) -> usize {
        self.problems.iter().map(|(_, runs)| runs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn into_document(self) -> RunDocument {
        RunDocument {
            runs: self
                .problems
                .into_iter()
                .flat_map(|(_, runs)| runs)
                .collect(),
        }
    }
}

fn lookup_status(
    rules: &ConversionRules,
    code: &str,
    problem: &str,
    planner: &str,
) -> Result<ExitStatus, NormalizeError> {
    rules
        .status_table
        .get(code)
        .ok_or_else(|| NormalizeError::UnmappedStatus {
            code: code.to_string(),
            problem: problem.to_string(),
            planner: planner.to_string(),
        })
}

/// Normalizes a table where scores, best scores and qualities are all given.
///
/// The values are copied through. The only correction is for a positive
/// quality without positive scores to back it, which is reset to 0.0.
pub fn normalize_flat(
    rules: &ConversionRules,
    rows: &[FlatRow],
) -> Result<RunsByProblem, NormalizeError> {
    info!(
        "normalize_flat: domain {}: processing {} rows",
        rules.domain,
        rows.len()
    );
    let mut res = RunsByProblem::default();
    for row in rows.iter() {
        if rules.excluded_planners.contains(&row.planner) {
            debug!("normalize_flat: skipping excluded planner {}", row.planner);
            continue;
        }
        let problem = problem_name(&row.problem);
        let exit_status = lookup_status(rules, &row.status, &problem, &row.planner)?;
        let mut quality = row.quality.unwrap_or(0.0);
        if quality > 0.0 && crate::quality(row.best_score, row.score) == 0.0 {
            warn!(
                "normalize_flat: problem {} planner {}: quality {} without scores (score {:?}, best {:?}), resetting it",
                problem, row.planner, quality, row.score, row.best_score
            );
            quality = 0.0;
        }
        let results = RunResults {
            quality,
            ..RunResults::new(row.score, row.best_score, exit_status)
        };
        res.push(RunRecord::new(&rules.domain, &problem, &row.planner, results));
    }
    Ok(res)
}

/// Normalizes a table that only gives the best score of each problem and the
/// quality ratio of each planner. The scores are derived from them.
pub fn normalize_quality_matrix(
    rules: &ConversionRules,
    rows: &[QualityMatrixRow],
) -> Result<RunsByProblem, NormalizeError> {
    info!(
        "normalize_quality_matrix: domain {}: processing {} problems",
        rules.domain,
        rows.len()
    );
    let mut res = RunsByProblem::default();
    for row in rows.iter() {
        let problem = problem_name(&row.problem);
        for entry in row.entries.iter() {
            if rules.excluded_planners.contains(&entry.planner) {
                continue;
            }
            let exit_status = match &entry.status {
                Some(code) => lookup_status(rules, code, &problem, &entry.planner)?,
                None => ExitStatus::Unsolved,
            };
            let score = score_from_quality(row.best_score, entry.quality.unwrap_or(0.0));
            debug!(
                "normalize_quality_matrix: {} {}: quality {:?} best {:?} -> score {:?}",
                problem, entry.planner, entry.quality, row.best_score, score
            );
            let results = RunResults {
                // Not recomputed from the rounded score, to keep the published value.
                quality: if score.is_some() {
                    entry.quality.unwrap_or(0.0)
                } else {
                    0.0
                },
                ..RunResults::new(score, row.best_score, exit_status)
            };
            res.push(RunRecord::new(&rules.domain, &problem, &entry.planner, results));
        }
    }
    Ok(res)
}

/// Normalizes raw scores. The best score of a problem is the minimum positive
/// score over all the planners, including the excluded ones.
pub fn normalize_solution_series(
    rules: &ConversionRules,
    entries: &[SolutionEntry],
) -> Result<RunsByProblem, NormalizeError> {
    info!(
        "normalize_solution_series: domain {}: processing {} entries",
        rules.domain,
        entries.len()
    );
    let mut best_scores: HashMap<&str, i64> = HashMap::new();
    for e in entries.iter() {
        if let Some(s) = e.score.filter(|s| *s > 0) {
            best_scores
                .entry(e.problem.as_str())
                .and_modify(|b| *b = (*b).min(s))
                .or_insert(s);
        }
    }
    debug!("normalize_solution_series: best scores: {:?}", best_scores);

    let mut res = RunsByProblem::default();
    for e in entries.iter() {
        if rules.excluded_planners.contains(&e.planner) {
            continue;
        }
        let problem = problem_name(&e.problem);
        let exit_status = match &e.status {
            Some(code) => lookup_status(rules, code, &problem, &e.planner)?,
            None => ExitStatus::Unsolved,
        };
        let best = best_scores.get(e.problem.as_str()).cloned();
        let score = e.score.filter(|s| *s > 0);
        let results = RunResults::new(score, best, exit_status)
            .with_solve_time(if score.is_some() { e.time_ms.unwrap_or(0) } else { 0 });
        res.push(RunRecord::new(&rules.domain, &problem, &e.planner, results));
    }
    Ok(res)
}
