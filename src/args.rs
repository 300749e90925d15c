use clap::{Parser, Subcommand};

/// Conversion and analysis of planning competition results.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Converts the result tables of a competition year into run records.
    Convert {
        /// (file path, optional) The JSON description of the competition year.
        /// For more information about the file format, read the manual of run_records.
        #[clap(short, long, value_parser)]
        config: Option<String>,

        /// (ipc08, ipc11 or ipc14) Use a built-in competition description instead of --config.
        #[clap(short, long, value_parser)]
        preset: Option<String>,

        /// (directory, default: the directory of the config, or the current directory)
        /// Where the result tables are read from.
        #[clap(short, long, value_parser)]
        input_dir: Option<String>,

        /// (directory, default: the input directory) Where the run records are written.
        #[clap(short, long, value_parser)]
        out: Option<String>,

        /// (directory) If provided, every output is compared to the file with the same name
        /// in this directory, and differences are reported as errors.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },

    /// Concatenates the runs of several files: <input.json>... <output.json>
    Merge {
        #[clap(value_parser, required = true, min_values = 2)]
        paths: Vec<String>,
    },

    /// Recomputes the best scores from some files and writes them into the last file:
    /// <input.json>... <target.json>
    UpdateBestScores {
        #[clap(value_parser, required = true, min_values = 2)]
        paths: Vec<String>,
    },

    /// Prints the mean quality of each planner.
    Summarize {
        #[clap(value_parser, required = true, min_values = 1)]
        inputs: Vec<String>,
    },

    /// Draws a Gantt chart (SVG) for every run with a temporal plan.
    Gantt {
        #[clap(value_parser)]
        input: String,

        /// (directory, default: current directory)
        #[clap(short, long, value_parser)]
        out_dir: Option<String>,
    },

    /// Writes the road network of a problem file as a Graphviz graph.
    Roads {
        #[clap(value_parser)]
        input: String,

        /// (file path, default: <input file name>.dot in the current directory)
        #[clap(short, long, value_parser)]
        out: Option<String>,
    },
}
