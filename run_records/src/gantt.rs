//! Gantt charts of temporal plans.
//!
//! A temporal plan is stored in the run records as the lines written by the
//! planner, one action per line:
//!
//! ```text
//! 0.000: (drive truck-1 city-loc-3 city-loc-1) [22.000]
//! 22.001: (pick-up truck-1 city-loc-1 package-2 capacity-0 capacity-1) [1.000]
//! ```
//!
//! ```
//! use run_records::gantt::GanttChart;
//! use run_records::{ExitStatus, RunRecord, RunResults};
//!
//! let mut run = RunRecord::new("transport", "p01", "tfd",
//!     RunResults::new(Some(23), Some(23), ExitStatus::Valid));
//! run.temporal_plan_actions = vec!["0.000: (drive truck-1 l1 l2) [22.000]".to_string()];
//! let chart = GanttChart::from_run(&run)?.unwrap();
//! assert_eq!(chart.title, "tfd: p01 (23.00)");
//! # Ok::<(), run_records::gantt::GanttError>(())
//! ```

use log::debug;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::Display;

use crate::RunRecord;

/// The labels of the known actions. Other actions keep their name.
pub const ACTION_LABELS: [(&str, &str); 4] = [
    ("refuel", "Refuel"),
    ("drop", "Drop"),
    ("pick-up", "PickUp"),
    ("drive", "Drive"),
];

#[derive(PartialEq, Debug, Clone)]
pub struct TemporalAction {
    pub start: f64,
    pub duration: f64,
    pub name: String,
    pub args: Vec<String>,
}

impl TemporalAction {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn label(&self) -> String {
        ACTION_LABELS
            .iter()
            .find(|(name, _)| *name == self.name)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum GanttError {
    MalformedAction { line: String },
}

impl Error for GanttError {}

impl Display for GanttError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GanttError::MalformedAction { line } => {
                write!(f, "cannot parse temporal action {:?}", line)
            }
        }
    }
}

/// Parses one line of a temporal plan.
///
/// Comments (starting with `;`) and blank lines return `None`.
pub fn parse_temporal_action(line: &str) -> Result<Option<TemporalAction>, GanttError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(';') {
        return Ok(None);
    }
    let malformed = || GanttError::MalformedAction {
        line: line.to_string(),
    };
    let (start_s, rest) = line.split_once(':').ok_or_else(malformed)?;
    let open = rest.find('(').ok_or_else(malformed)?;
    let close = rest.rfind(')').ok_or_else(malformed)?;
    if close < open {
        return Err(malformed());
    }
    let duration_s = rest[close + 1..]
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(malformed)?;
    let mut tokens = rest[open + 1..close].split_whitespace();
    let name = tokens.next().ok_or_else(malformed)?.to_lowercase();
    let args: Vec<String> = tokens.map(|s| s.to_string()).collect();
    let start: f64 = start_s.trim().parse().map_err(|_| malformed())?;
    let duration: f64 = duration_s.trim().parse().map_err(|_| malformed())?;
    if !start.is_finite() || !duration.is_finite() {
        return Err(malformed());
    }
    Ok(Some(TemporalAction {
        start,
        duration,
        name,
        args,
    }))
}

#[derive(PartialEq, Debug, Clone)]
pub struct GanttBar {
    pub object: String,
    pub label: String,
    pub start: f64,
    pub end: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct GanttChart {
    pub name: String,
    pub title: String,
    /// The objects (rows of the chart), in display order.
    pub objects: Vec<String>,
    pub bars: Vec<GanttBar>,
    pub time_min: f64,
    pub time_max: f64,
}

impl GanttChart {
    /// Builds the chart of a run. Runs without a temporal plan have no chart.
    pub fn from_run(run: &RunRecord) -> Result<Option<GanttChart>, GanttError> {
        let mut bars: Vec<GanttBar> = vec![];
        for line in run.temporal_plan_actions.iter() {
            let action = match parse_temporal_action(line)? {
                Some(a) => a,
                None => continue,
            };
            let label = action.label();
            let mut objects: Vec<&String> = action.args.first().into_iter().collect();
            // The package is the third argument of these actions.
            if label == "PickUp" || label == "Drop" {
                objects.extend(action.args.get(2));
            }
            for object in objects {
                bars.push(GanttBar {
                    object: object.clone(),
                    label: label.clone(),
                    start: action.start,
                    end: action.end(),
                });
            }
        }
        if bars.is_empty() {
            debug!(
                "GanttChart: no action for planner {} problem {}",
                run.planner, run.problem
            );
            return Ok(None);
        }

        let mut objects: Vec<String> = vec![];
        for b in bars.iter() {
            if !objects.contains(&b.object) {
                objects.push(b.object.clone());
            }
        }
        objects.sort_by(|a, b| compare_objects(a, b));

        let time_min = bars.iter().map(|b| b.start).fold(f64::INFINITY, f64::min);
        let time_max = bars.iter().map(|b| b.end).fold(f64::NEG_INFINITY, f64::max);
        let score = match run.results.score {
            Some(s) => format!("{:.2}", s as f64),
            None => "N/A".to_string(),
        };
        Ok(Some(GanttChart {
            name: format!("gantt_{}_{}", run.planner, run.problem),
            title: format!("{}: {} ({})", run.planner, run.problem, score),
            objects,
            bars,
            time_min,
            time_max,
        }))
    }
}

// Trucks, then the c- objects, then the packages.
fn object_kind(name: &str) -> u32 {
    match name.chars().next() {
        Some('t') => 1,
        Some('c') => 2,
        Some('p') => 3,
        _ => 4,
    }
}

// The last number first, then the others from left to right.
fn numeric_key(name: &str) -> (Option<u64>, Vec<u64>) {
    let mut numbers: Vec<u64> = name.split('-').filter_map(|s| s.parse::<u64>().ok()).collect();
    let last = numbers.pop();
    (last, numbers)
}

fn compare_objects(a: &str, b: &str) -> Ordering {
    object_kind(a)
        .cmp(&object_kind(b))
        .then_with(|| numeric_key(a).cmp(&numeric_key(b)))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExitStatus, RunResults};

    fn run(lines: &[&str], score: Option<i64>) -> RunRecord {
        let mut r = RunRecord::new(
            "transport-numeric",
            "p03",
            "tfd",
            RunResults::new(score, Some(40), ExitStatus::Valid),
        );
        r.temporal_plan_actions = lines.iter().map(|s| s.to_string()).collect();
        r
    }

    #[test]
    fn parse_action() {
        let a = parse_temporal_action("  12.5: (pick-up truck-1 city-loc-2 package-3) [1.000] ")
            .unwrap()
            .unwrap();
        assert_eq!(a.start, 12.5);
        assert_eq!(a.duration, 1.0);
        assert_eq!(a.end(), 13.5);
        assert_eq!(a.name, "pick-up");
        assert_eq!(a.label(), "PickUp");
        assert_eq!(a.args, vec!["truck-1", "city-loc-2", "package-3"]);
    }

    #[test]
    fn parse_comments_and_errors() {
        assert_eq!(parse_temporal_action("; Cost: 54.000"), Ok(None));
        assert_eq!(parse_temporal_action(""), Ok(None));
        assert!(parse_temporal_action("0.000 (drive t l1 l2) [2.0]").is_err());
        assert!(parse_temporal_action("0.000: (drive t l1 l2)").is_err());
        assert!(parse_temporal_action("x: (drive t l1 l2) [2.0]").is_err());
        assert!(parse_temporal_action("0.000: () [2.0]").is_err());
    }

    #[test]
    fn non_finite_times_are_malformed() {
        for line in [
            "nan: (drive t l1 l2) [1]",
            "0: (drive t l1 l2) [inf]",
            "-inf: (drive t l1 l2) [1]",
            "0: (drive t l1 l2) [NaN]",
        ] {
            assert!(
                matches!(
                    parse_temporal_action(line),
                    Err(GanttError::MalformedAction { .. })
                ),
                "{}",
                line
            );
        }
    }

    #[test]
    fn objects_by_kind_then_last_number() {
        let mut objects = vec![
            "package-2-1",
            "truck-10",
            "package-1-2",
            "city-loc-3",
            "truck-1",
            "depot",
            "city-loc-1",
            "capacity-0",
        ];
        objects.sort_by(|a, b| compare_objects(a, b));
        assert_eq!(
            objects,
            vec![
                "truck-1",
                "truck-10",
                "capacity-0",
                "city-loc-1",
                "city-loc-3",
                "package-2-1",
                "package-1-2",
                "depot",
            ]
        );
    }

    #[test]
    fn unknown_actions_keep_their_name() {
        let a = parse_temporal_action("1: (unload t1 l2) [1]").unwrap().unwrap();
        assert_eq!(a.label(), "unload");
    }

    #[test]
    fn chart_from_run() {
        let r = run(
            &[
                "; Makespan: 24.003",
                "0.000: (drive truck-2 city-loc-3 city-loc-1) [22.000]",
                "0.000: (drive truck-1 city-loc-3 city-loc-1) [20.000]",
                "22.001: (pick-up truck-2 city-loc-1 package-10 capacity-0 capacity-1) [1.000]",
                "23.002: (drop truck-2 city-loc-1 package-2 capacity-0 capacity-1) [1.001]",
            ],
            Some(54),
        );
        let chart = GanttChart::from_run(&r).unwrap().unwrap();
        assert_eq!(chart.name, "gantt_tfd_p03");
        assert_eq!(chart.title, "tfd: p03 (54.00)");
        assert_eq!(
            chart.objects,
            vec!["truck-1", "truck-2", "package-2", "package-10"]
        );
        assert_eq!(chart.bars.len(), 6);
        let package_bars: Vec<&GanttBar> =
            chart.bars.iter().filter(|b| b.object == "package-10").collect();
        assert_eq!(package_bars.len(), 1);
        assert_eq!(package_bars[0].label, "PickUp");
        assert_eq!(chart.time_min, 0.0);
        assert!((chart.time_max - 24.003).abs() < 1e-9);
    }

    #[test]
    fn no_chart_without_actions() {
        assert_eq!(GanttChart::from_run(&run(&[], None)), Ok(None));
        assert_eq!(GanttChart::from_run(&run(&["; nothing"], None)), Ok(None));
    }

    #[test]
    fn title_without_score() {
        let chart = GanttChart::from_run(&run(&["0: (refuel truck-1 l1) [3]"], None))
            .unwrap()
            .unwrap();
        assert_eq!(chart.title, "tfd: p03 (N/A)");
        assert_eq!(chart.bars[0].label, "Refuel");
    }
}
