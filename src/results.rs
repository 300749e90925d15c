use log::{debug, info, warn};

use run_records::aggregate::{best_scores, merge, summarize, update_best_scores, PlannerSummary};
use run_records::gantt::{GanttChart, GanttError};
use run_records::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::results::config_reader::*;
use crate::results::io_json::{read_runs, to_pretty_json, write_atomically, write_runs};

pub mod config_reader;
mod io_common;
mod io_flat;
pub mod io_json;
mod io_quality_matrix;
mod io_solution_series;
mod plot_gantt;
mod plot_roads;

#[derive(Debug, Snafu)]
pub enum ResultsError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error in the built-in competition {name}"))]
    ParsingPreset {
        source: serde_json::Error,
        name: String,
    },
    #[snafu(display("No built-in competition named {name:?} (available: ipc08, ipc11, ipc14)"))]
    UnknownPreset { name: String },
    #[snafu(display("Error serializing the runs"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error reading file {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening the CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Line {lineno} of {path} is too short: missing column {column}"))]
    CsvLineTooShort {
        path: String,
        lineno: usize,
        column: usize,
    },
    #[snafu(display("Line {lineno} of {path}: cannot read the {field} from {content:?}"))]
    RequiredField {
        path: String,
        lineno: usize,
        field: String,
        content: String,
    },
    #[snafu(display("The file {path} has no header"))]
    MissingHeader { path: String },
    #[snafu(display("Invalid delimiter {delimiter:?}: expected a single ASCII character"))]
    InvalidDelimiter { delimiter: String },
    #[snafu(display(
        "Provider {provider:?} not implemented (flat, qualityMatrix or solutionSeries)"
    ))]
    UnknownProvider { provider: String },
    #[snafu(display("Error converting {path}"))]
    Normalizing {
        source: NormalizeError,
        path: String,
    },
    #[snafu(display("Cannot draw the plan of {planner} on {problem}"))]
    Plotting {
        source: GanttError,
        planner: String,
        problem: String,
    },
    #[snafu(display("Error rendering {name}"))]
    Rendering {
        source: std::fmt::Error,
        name: String,
    },
    #[snafu(display("Line {lineno} of {path}: cannot read the road {content:?}"))]
    ParsingRoad {
        path: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Missing arguments: expected {expected}"))]
    MissingArguments { expected: String },
    #[snafu(display("Difference detected between {path} and the reference {reference}"))]
    ReferenceMismatch { path: String, reference: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ResultsResult<T> = Result<T, ResultsError>;
pub type BResult<T> = Result<T, Box<ResultsError>>;

fn path_string(p: &Path) -> String {
    p.display().to_string()
}

fn read_conversion(
    root: &Path,
    config: &CompetitionConfig,
    conversion: &Conversion,
) -> BResult<RunsByProblem> {
    let path = path_string(&root.join(&conversion.file_path));
    let score_path = conversion
        .score_file_path
        .as_ref()
        .map(|p| path_string(&root.join(p)));
    info!(
        "Converting {} {} from {:?} (scores: {:?})",
        conversion.domain, conversion.track, path, score_path
    );
    let delimiter = config.delimiter()?;
    let drop_last_row = config.drop_last_row();
    let rules = config.rules(&conversion.domain);
    let runs = match config.provider()? {
        Provider::Flat => {
            let rows = io_flat::read_flat_rows(
                &path,
                delimiter,
                drop_last_row,
                conversion.domain_filter(),
                &conversion.track,
            )?;
            normalize_flat(&rules, &rows)
        }
        Provider::QualityMatrix => {
            let rows = io_quality_matrix::read_quality_matrix(
                &path,
                score_path.as_deref(),
                delimiter,
                drop_last_row,
            )?;
            normalize_quality_matrix(&rules, &rows)
        }
        Provider::SolutionSeries => {
            let entries = io_solution_series::read_solution_series(
                &path,
                score_path.as_deref(),
                delimiter,
                drop_last_row,
            )?;
            normalize_solution_series(&rules, &entries)
        }
    }
    .context(NormalizingSnafu { path })?;
    Ok(runs)
}

fn check_reference(output_path: &str, content: &str, reference_path: &str) -> BResult<()> {
    let reference = fs::read_to_string(reference_path).context(ReadingFileSnafu {
        path: reference_path,
    })?;
    if reference != content {
        warn!(
            "Found differences between {} and the reference {}",
            output_path, reference_path
        );
        print_diff(reference.as_str(), content, "\n");
        return Err(Box::new(ResultsError::ReferenceMismatch {
            path: output_path.to_string(),
            reference: reference_path.to_string(),
        }));
    }
    debug!("{} matches the reference {}", output_path, reference_path);
    Ok(())
}

/// Runs all the conversions of a competition year and returns the paths of
/// the files written.
///
/// Nothing is written unless all the conversions succeed.
pub fn run_conversion(
    config_path: Option<String>,
    preset: Option<String>,
    input_dir: Option<String>,
    out_dir: Option<String>,
    reference_dir: Option<String>,
) -> BResult<Vec<String>> {
    let (config, root) = load_competition(config_path, preset, input_dir)?;
    info!("config: {:?}", config);

    let out_root: PathBuf = out_dir.map(PathBuf::from).unwrap_or_else(|| root.clone());
    let mut outputs: Vec<(String, String)> = vec![];
    for conversion in config.conversions.iter() {
        let runs = read_conversion(&root, &config, conversion)?;
        info!(
            "{} {}: {} runs over {} problems",
            conversion.domain,
            conversion.track,
            runs.len(),
            runs.problems().count()
        );
        let js = to_pretty_json(&runs.into_document())?;
        let out_path = path_string(&out_root.join(&conversion.output_file));
        outputs.push((out_path, js));
    }

    // The reference outputs, if provided for comparison
    if let Some(ref_dir) = reference_dir {
        for (conversion, (out_path, js)) in config.conversions.iter().zip(outputs.iter()) {
            let reference_path = path_string(&Path::new(&ref_dir).join(&conversion.output_file));
            check_reference(out_path, js, &reference_path)?;
        }
    }

    let mut written = vec![];
    for (out_path, js) in outputs {
        info!("Writing {}", out_path);
        write_atomically(&out_path, &js)?;
        written.push(out_path);
    }
    Ok(written)
}

fn split_inputs_and_target(paths: &[String]) -> BResult<(&[String], &String)> {
    match paths.split_last() {
        Some((target, inputs)) if !inputs.is_empty() => Ok((inputs, target)),
        _ => Err(Box::new(ResultsError::MissingArguments {
            expected: "[JsonResult]+ [TargetJson]".to_string(),
        })),
    }
}

fn read_all(paths: &[String]) -> BResult<Vec<RunDocument>> {
    paths.iter().map(|p| read_runs(p)).collect()
}

/// Merges all the files but the last one into the last one. Returns the number of runs written.
pub fn run_merge(paths: &[String]) -> BResult<usize> {
    let (inputs, target) = split_inputs_and_target(paths)?;
    let merged = merge(read_all(inputs)?);
    write_runs(target, &merged)?;
    Ok(merged.runs.len())
}

/// Recomputes the best scores from all the files but the last one, and
/// updates the last one in place. Returns the number of updated runs.
pub fn run_update_best_scores(paths: &[String]) -> BResult<usize> {
    let (inputs, target) = split_inputs_and_target(paths)?;
    let corpus = read_all(inputs)?;
    let best = best_scores(corpus.iter().flat_map(|d| d.runs.iter()));
    let mut target_doc = read_runs(target)?;
    let updated = update_best_scores(&mut target_doc, &best);
    write_runs(target, &target_doc)?;
    Ok(updated)
}

pub fn format_summary(summary: &PlannerSummary) -> String {
    // Debug formatting keeps the decimal point of round numbers (1.0).
    format!("{} {:?}", summary.planner, summary.mean_quality)
}

/// Prints the mean quality of every planner found in the files.
pub fn run_summarize(inputs: &[String]) -> BResult<Vec<PlannerSummary>> {
    if inputs.is_empty() {
        return Err(Box::new(ResultsError::MissingArguments {
            expected: "[JsonResult]+".to_string(),
        }));
    }
    let docs = read_all(inputs)?;
    let summaries = summarize(docs.iter().flat_map(|d| d.runs.iter()));
    for s in summaries.iter() {
        debug!("{} runs for planner {}", s.num_runs, s.planner);
        println!("{}", format_summary(s));
    }
    Ok(summaries)
}

/// Draws the Gantt chart of every run that has a temporal plan. Returns the
/// paths of the charts written.
pub fn run_gantt(input: &str, out_dir: Option<String>) -> BResult<Vec<String>> {
    let doc = read_runs(input)?;
    let out_root = PathBuf::from(out_dir.unwrap_or_else(|| ".".to_string()));
    let mut written = vec![];
    for run in doc.runs.iter() {
        let chart = GanttChart::from_run(run).context(PlottingSnafu {
            planner: &run.planner,
            problem: &run.problem,
        })?;
        let chart = match chart {
            Some(c) => c,
            None => {
                info!("Skipping {} {}: no temporal plan", run.planner, run.problem);
                continue;
            }
        };
        info!("Plotting: {}", chart.name);
        let svg = plot_gantt::render_svg(&chart).context(RenderingSnafu { name: &chart.name })?;
        let path = path_string(&out_root.join(format!("{}.svg", chart.name)));
        write_atomically(&path, &svg)?;
        written.push(path);
    }
    Ok(written)
}

/// Writes the road network of a problem file in the DOT format. Returns the path written.
pub fn run_roads(input: &str, out: Option<String>) -> BResult<String> {
    let content = fs::read_to_string(input).context(ReadingFileSnafu { path: input })?;
    let graph = plot_roads::parse_roads(input, &content)?;
    info!(
        "{}: {} locations, {} roads",
        input,
        graph.graph.node_count(),
        graph.graph.edge_count()
    );
    let name = io_common::simplify_file_name(input);
    let dot = plot_roads::render_dot(&graph);
    let out_path = out.unwrap_or_else(|| format!("{}.dot", name));
    write_atomically(&out_path, &dot)?;
    Ok(out_path)
}
