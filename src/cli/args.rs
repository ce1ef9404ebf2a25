use crate::filter::{FilterPatch, SortKey};
use crate::model::{Maturity, Modality, Stage, Task};
use crate::viz::{ColorMode, YAxis};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "methodscope")]
#[command(about = "Explore, filter and compare a catalog of multimodal pipeline methods", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Dataset file (overrides the config file)
    #[arg(long, global = true, env = "METHODSCOPE_DATA")]
    pub data: Option<PathBuf>,

    /// Use this config file instead of searching for .methodscope.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List methods, filtered and sorted
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Sort key (defaults to the configured key)
        #[arg(long, value_enum)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: ListFormat,

        /// Show at most N methods
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one method in detail
    Show {
        /// Method id
        id: String,

        /// Print the method record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two or three methods side by side
    Compare {
        /// Method ids (at most three are used)
        #[arg(required_unless_present = "link")]
        ids: Vec<String>,

        /// Compare deep link, e.g. https://host/compare?methods=a,b
        #[arg(long, conflicts_with = "ids")]
        link: Option<String>,

        /// Also write the radar chart as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Render a chart to SVG
    Render {
        #[arg(value_enum)]
        chart: ChartKind,

        /// Output file, `-` for stdout
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Methods for the radar chart (comma-separated)
        #[arg(long, value_delimiter = ',')]
        methods: Vec<String>,

        /// Landscape vertical axis
        #[arg(long, value_enum)]
        y_axis: Option<YAxis>,

        /// Landscape point coloring
        #[arg(long, value_enum)]
        color_mode: Option<ColorMode>,

        /// Surface width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Surface height in pixels
        #[arg(long)]
        height: Option<f64>,
    },

    /// Export static HTML pages
    Export {
        /// Output directory
        dir: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Also write compare.html for these ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        compare: Vec<String>,
    },

    /// Validate the dataset; exits with status 1 on warnings
    Validate {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ValidateFormat,
    },

    /// Interactive terminal explorer
    Explore,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,

        /// Write to the user config directory instead of the current directory
        #[arg(long)]
        user: bool,
    },
}

/// Filter flags shared by list, render and export.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Fuzzy search over name, descriptions, tags and paper title
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Pipeline stage id (collect, preprocess, ...)
    #[arg(long)]
    pub stage: Option<Stage>,

    /// Modalities, any of (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub modality: Vec<Modality>,

    /// Tasks, any of (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub task: Vec<Task>,

    /// Evidence types, any of (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub evidence: Vec<String>,

    /// Maturity levels, any of (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub maturity: Vec<Maturity>,

    /// Earliest publication year
    #[arg(long)]
    pub year_min: Option<i32>,

    /// Latest publication year
    #[arg(long)]
    pub year_max: Option<i32>,
}

impl FilterArgs {
    pub fn to_patch(&self) -> FilterPatch {
        let mut patch = FilterPatch::new()
            .modalities(self.modality.iter().copied())
            .tasks(self.task.iter().copied())
            .evidence_types(self.evidence.iter().cloned())
            .maturity(self.maturity.iter().copied())
            .year_range(self.year_min, self.year_max)
            .search_query(self.search.clone().unwrap_or_default());
        if self.stage.is_some() {
            patch = patch.pipeline_step(self.stage);
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.stage.is_none()
            && self.modality.is_empty()
            && self.task.is_empty()
            && self.evidence.is_empty()
            && self.maturity.is_empty()
            && self.year_min.is_none()
            && self.year_max.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    Pipeline,
    Landscape,
    Radar,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterState;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_flags_parse_into_patch() {
        let cli = Cli::try_parse_from([
            "methodscope",
            "list",
            "--stage",
            "preprocess",
            "--modality",
            "text,audio",
            "-q",
            "ocr",
            "--year-min",
            "2019",
        ])
        .unwrap();

        let Commands::List { filters, .. } = cli.command else {
            panic!("expected list");
        };
        assert!(!filters.is_empty());

        let mut state = FilterState::default();
        filters.to_patch().apply_to(&mut state);
        assert_eq!(state.pipeline_step, Some(Stage::Preprocess));
        assert_eq!(state.modalities.len(), 2);
        assert_eq!(state.search_query, "ocr");
        assert_eq!(state.year_range.min, Some(2019));
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        assert!(Cli::try_parse_from(["methodscope", "list", "--stage", "nope"]).is_err());
    }

    #[test]
    fn test_compare_requires_ids_or_link() {
        assert!(Cli::try_parse_from(["methodscope", "compare"]).is_err());
        assert!(Cli::try_parse_from(["methodscope", "compare", "--link", "/compare?methods=a,b"]).is_ok());
    }
}
