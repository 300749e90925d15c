//! Operations over already normalized run documents.

use log::{debug, info};
use std::collections::HashMap;

use crate::{quality, RunDocument, RunRecord};

/// The best score of each problem. `None` when no planner has a positive
/// score on it.
pub type BestScores = HashMap<String, Option<i64>>;

/// Concatenates the runs of all the documents, in order.
///
/// Duplicated (domain, problem, planner) entries are kept.
pub fn merge(documents: Vec<RunDocument>) -> RunDocument {
    let runs: Vec<RunRecord> = documents.into_iter().flat_map(|d| d.runs).collect();
    info!("merge: {} runs", runs.len());
    RunDocument { runs }
}

/// The minimum of all the positive scores and best scores seen for each problem.
pub fn best_scores<'a, I>(runs: I) -> BestScores
where
    I: IntoIterator<Item = &'a RunRecord>,
{
    let mut res: BestScores = HashMap::new();
    for run in runs {
        let candidates = [run.results.score, run.results.best_score];
        let run_best = candidates.iter().flatten().filter(|s| **s > 0).min().cloned();
        let cur = res.entry(run.problem.clone()).or_insert(None);
        *cur = match (*cur, run_best) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
    debug!("best_scores: {:?}", res);
    res
}

/// Overwrites the best score of every run whose problem is known, and
/// recomputes its quality.
///
/// Returns the number of runs that were updated.
pub fn update_best_scores(target: &mut RunDocument, best: &BestScores) -> usize {
    let mut updated = 0;
    for run in target.runs.iter_mut() {
        if let Some(b) = best.get(&run.problem) {
            run.results.best_score = *b;
            run.results.quality = quality(*b, run.results.score);
            updated += 1;
        } else {
            debug!(
                "update_best_scores: no best score for problem {}",
                run.problem
            );
        }
    }
    info!(
        "update_best_scores: updated {} of {} runs",
        updated,
        target.runs.len()
    );
    updated
}

#[derive(PartialEq, Debug, Clone)]
pub struct PlannerSummary {
    pub planner: String,
    pub mean_quality: f64,
    pub num_runs: usize,
}

/// The mean quality of each planner, in the order in which the planners
/// first appear. The quality is recomputed from the scores.
pub fn summarize<'a, I>(runs: I) -> Vec<PlannerSummary>
where
    I: IntoIterator<Item = &'a RunRecord>,
{
    let mut order: Vec<String> = vec![];
    let mut qualities: HashMap<String, Vec<f64>> = HashMap::new();
    for run in runs {
        let q = quality(run.results.best_score, run.results.score);
        match qualities.get_mut(&run.planner) {
            Some(l) => l.push(q),
            None => {
                order.push(run.planner.clone());
                qualities.insert(run.planner.clone(), vec![q]);
            }
        }
    }
    order
        .into_iter()
        .map(|planner| {
            let l = &qualities[&planner];
            PlannerSummary {
                mean_quality: l.iter().sum::<f64>() / l.len() as f64,
                num_runs: l.len(),
                planner,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExitStatus, RunResults};

    fn run(problem: &str, planner: &str, score: Option<i64>, best: Option<i64>) -> RunRecord {
        RunRecord::new(
            "transport-strips",
            problem,
            planner,
            RunResults::new(score, best, ExitStatus::Valid),
        )
    }

    fn doc(runs: Vec<RunRecord>) -> RunDocument {
        RunDocument { runs }
    }

    #[test]
    fn merge_keeps_order_and_duplicates() {
        let a = doc(vec![run("p01", "x", Some(3), None)]);
        let b = doc(vec![run("p01", "x", Some(3), None), run("p02", "y", None, None)]);
        let c = doc(vec![run("p03", "z", Some(1), Some(1))]);

        let left = merge(vec![merge(vec![a.clone(), b.clone()]), c.clone()]);
        let right = merge(vec![a.clone(), merge(vec![b.clone(), c.clone()])]);
        let flat = merge(vec![a, b, c]);
        assert_eq!(left, flat);
        assert_eq!(right, flat);
        assert_eq!(flat.runs.len(), 4);
        assert_eq!(flat.runs[0], flat.runs[1]);
    }

    #[test]
    fn merge_nothing() {
        assert!(merge(vec![]).runs.is_empty());
    }

    #[test]
    fn best_scores_over_scores_and_best_scores() {
        let runs = vec![
            run("p01", "x", Some(30), Some(25)),
            run("p01", "y", Some(22), None),
            run("p02", "x", None, None),
            run("p02", "y", Some(0), None),
            run("p03", "x", None, Some(12)),
        ];
        let best = best_scores(runs.iter());
        assert_eq!(best.get("p01"), Some(&Some(22)));
        assert_eq!(best.get("p02"), Some(&None));
        assert_eq!(best.get("p03"), Some(&Some(12)));
        assert_eq!(best.get("p04"), None);
    }

    #[test]
    fn update_sets_the_same_best_score_for_a_problem() {
        let corpus = vec![
            doc(vec![run("p01", "x", Some(30), None), run("p02", "x", None, None)]),
            doc(vec![run("p01", "y", Some(18), Some(20))]),
        ];
        let best = best_scores(corpus.iter().flat_map(|d| d.runs.iter()));
        let mut target = doc(vec![
            run("p01", "a", Some(36), Some(30)),
            run("p01", "b", None, Some(30)),
            run("p02", "a", Some(5), Some(5)),
            run("p09", "a", Some(5), Some(4)),
        ]);
        let updated = update_best_scores(&mut target, &best);
        assert_eq!(updated, 3);
        assert_eq!(target.runs[0].results.best_score, Some(18));
        assert_eq!(target.runs[1].results.best_score, Some(18));
        assert_eq!(target.runs[0].results.quality, 0.5);
        assert_eq!(target.runs[1].results.quality, 0.0);
        // No positive score anywhere for this problem.
        assert_eq!(target.runs[2].results.best_score, None);
        assert_eq!(target.runs[2].results.quality, 0.0);
        // Unknown problem: untouched.
        assert_eq!(target.runs[3].results.best_score, Some(4));
    }

    #[test]
    fn summary_over_several_files() {
        let f1 = doc(vec![run("p01", "x", Some(10), Some(10))]);
        let f2 = doc(vec![run("p02", "x", None, Some(10))]);
        let summary = summarize(f1.runs.iter().chain(f2.runs.iter()));
        assert_eq!(
            summary,
            vec![PlannerSummary {
                planner: "x".to_string(),
                mean_quality: 0.5,
                num_runs: 2
            }]
        );
    }

    #[test]
    fn summary_keeps_the_planner_order() {
        let runs = vec![
            run("p01", "z", Some(20), Some(10)),
            run("p01", "a", Some(10), Some(10)),
            run("p02", "z", Some(10), Some(10)),
        ];
        let summary = summarize(runs.iter());
        let names: Vec<&str> = summary.iter().map(|s| s.planner.as_str()).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(summary[0].mean_quality, 0.75);
        assert_eq!(summary[1].mean_quality, 1.0);
    }
}
