//! Diff command

use super::{load_config, read_file};
use clap::{Args, ValueEnum};
use crashdiff_core::config::DiffConfig;
use crashdiff_core::diff::Comparison;
use std::path::PathBuf;

const STACKWALK_PRESET: &str = include_str!("../../../../presets/stackwalk.yaml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// minidump-stackwalk against breakpad stackwalker
    Stackwalk,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Left-hand document
    pub left: PathBuf,

    /// Right-hand document
    pub right: PathBuf,

    /// Rule configuration (YAML, or JSON with a .json extension)
    #[arg(long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in rule configuration
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Print the summary as JSON after the report
    #[arg(long)]
    pub summary_json: bool,

    /// List suppressed changes in their own section
    #[arg(long)]
    pub show_suppressed: bool,
}

/// Run the comparison; `Ok(true)` when differences remain after filtering.
pub fn execute(args: DiffArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = match (&args.config, args.preset) {
        (Some(path), _) => load_config(path)?,
        (None, Some(Preset::Stackwalk)) => DiffConfig::from_yaml_str(STACKWALK_PRESET)?,
        (None, None) => DiffConfig::default(),
    };
    if args.show_suppressed {
        config.report.show_suppressed = true;
    }
    let compiled = config.compile()?;

    let left = read_file(&args.left)?;
    let right = read_file(&args.right)?;

    println!(
        "diffing {} and {}",
        args.left.display(),
        args.right.display()
    );

    let report = Comparison::new(&compiled).compare_documents(&left, &right)?;
    print!("{}", report.text);

    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    }

    Ok(report.summary.has_differences)
}
