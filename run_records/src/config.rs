// ********* Run records ***********

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JSValue;

/// The canonical outcome of a planner on a problem.
///
/// Every competition year uses its own codes for these, see [`StatusTable`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ExitStatus {
    /// A valid plan was produced.
    #[serde(rename = "VALID")]
    Valid,
    /// A plan was produced but failed to validate.
    #[serde(rename = "INVALID")]
    Invalid,
    /// No plan was produced.
    #[serde(rename = "UNSOLVED")]
    Unsolved,
    /// A valid plan, known not to be optimal.
    #[serde(rename = "SUBOPT")]
    Subopt,
    /// A plan was produced but nobody validated it.
    /// Only found in documents written by the benchmark runner, never by the converters.
    #[serde(rename = "NOTVALIDATED")]
    NotValidated,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RunResults {
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<i64>,
    #[serde(rename = "bestScore", default, deserialize_with = "lenient_score")]
    pub best_score: Option<i64>,
    #[serde(rename = "exitStatus")]
    pub exit_status: ExitStatus,
    #[serde(rename = "startTimeMs", default)]
    pub start_time_ms: i64,
    #[serde(rename = "endTimeMs", default)]
    pub end_time_ms: i64,
    #[serde(rename = "durationMs", default = "no_duration")]
    pub duration_ms: i64,
    #[serde(default)]
    pub quality: f64,
}

impl RunResults {
    /// Results without timing information. The quality is derived from the scores.
    pub fn new(score: Option<i64>, best_score: Option<i64>, exit_status: ExitStatus) -> RunResults {
        RunResults {
            score,
            best_score,
            exit_status,
            start_time_ms: 0,
            end_time_ms: 0,
            duration_ms: -1,
            quality: crate::quality(best_score, score),
        }
    }

    /// Records the time (in milliseconds) at which the solution was found.
    /// A zero time means that it was not measured.
    pub fn with_solve_time(self, time_ms: i64) -> RunResults {
        RunResults {
            end_time_ms: time_ms,
            duration_ms: if time_ms == 0 { -1 } else { time_ms },
            ..self
        }
    }
}

/// One planner's outcome on one problem instance.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub domain: String,
    pub problem: String,
    pub planner: String,
    #[serde(
        rename = "temporalPlanActions",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub temporal_plan_actions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub actions: Vec<JSValue>,
    pub results: RunResults,
}

impl RunRecord {
    pub fn new(domain: &str, problem: &str, planner: &str, results: RunResults) -> RunRecord {
        RunRecord {
            domain: domain.to_string(),
            problem: problem.to_string(),
            planner: planner.to_string(),
            temporal_plan_actions: vec![],
            actions: vec![],
            results,
        }
    }
}

/// The content of a result file: `{"runs": [...]}`.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunDocument {
    pub runs: Vec<RunRecord>,
}

fn no_duration() -> i64 {
    -1
}

// The benchmark runner writes the scores as doubles.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let x: Option<f64> = Option::deserialize(deserializer)?;
    Ok(x.map(|f| f.round() as i64))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let x: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(x.unwrap_or_default())
}

// ********* Conversion rules **********

/// Maps the raw status codes of a competition year to the canonical statuses.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct StatusTable {
    codes: HashMap<String, ExitStatus>,
}

impl StatusTable {
    pub fn new(codes: &[(&str, ExitStatus)]) -> StatusTable {
        StatusTable {
            codes: codes
                .iter()
                .map(|(code, status)| (code.to_string(), *status))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<ExitStatus> {
        self.codes.get(code.trim()).cloned()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl FromIterator<(String, ExitStatus)> for StatusTable {
    fn from_iter<I: IntoIterator<Item = (String, ExitStatus)>>(iter: I) -> Self {
        StatusTable {
            codes: iter.into_iter().collect(),
        }
    }
}

/// Planners left out of a competition year (reference entries, failed or
/// low performing entries).
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Denylist {
    planners: HashSet<String>,
}

impl Denylist {
    pub fn new(planners: &[&str]) -> Denylist {
        Denylist {
            planners: planners.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn contains(&self, planner: &str) -> bool {
        self.planners.contains(planner)
    }
}

impl FromIterator<String> for Denylist {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Denylist {
            planners: iter.into_iter().collect(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConversionRules {
    /// The domain name written in every record.
    pub domain: String,
    pub status_table: StatusTable,
    pub excluded_planners: Denylist,
}

// ********* Input rows **********

/// A row of a table in which every column is already present (IPC 2008).
#[derive(PartialEq, Debug, Clone)]
pub struct FlatRow {
    pub problem: String,
    pub planner: String,
    pub status: String,
    pub score: Option<i64>,
    pub best_score: Option<i64>,
    pub quality: Option<f64>,
}

/// The quality of one planner on the problem of a [`QualityMatrixRow`].
///
/// The status is missing when the planner has no recorded attempt.
#[derive(PartialEq, Debug, Clone)]
pub struct QualityEntry {
    pub planner: String,
    pub status: Option<String>,
    pub quality: Option<f64>,
}

/// A problem with its best score and the quality ratio of each planner (IPC 2014).
#[derive(PartialEq, Debug, Clone)]
pub struct QualityMatrixRow {
    pub problem: String,
    pub best_score: Option<i64>,
    pub entries: Vec<QualityEntry>,
}

/// The raw outcome of a planner on a problem (IPC 2011).
///
/// The status is missing when the planner has no recorded attempt.
#[derive(PartialEq, Debug, Clone)]
pub struct SolutionEntry {
    pub problem: String,
    pub planner: String,
    pub status: Option<String>,
    pub score: Option<i64>,
    pub time_ms: Option<i64>,
}

// ********* Errors **********

/// Errors that abort a conversion.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NormalizeError {
    UnmappedStatus {
        code: String,
        problem: String,
        planner: String,
    },
}

impl Error for NormalizeError {}

impl Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::UnmappedStatus {
                code,
                problem,
                planner,
            } => write!(
                f,
                "unmapped status code {:?} (problem {}, planner {})",
                code, problem, planner
            ),
        }
    }
}
