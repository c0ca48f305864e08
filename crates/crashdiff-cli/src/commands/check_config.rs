//! Configuration check command

use super::load_config;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckConfigArgs {
    /// Configuration file to validate
    pub file: PathBuf,
}

pub fn execute(args: CheckConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let compiled = load_config(&args.file)?.compile()?;
    let counts = compiled.rule_counts();

    println!("✓ {} is valid", args.file.display());
    println!("  ignore rules:        {}", counts.ignore);
    println!("  absent equivalents:  {}", counts.absent_equivalents);
    println!("  comparators:         {}", counts.comparators);
    println!("  alignment selectors: {}", counts.alignment);
    if let Some(root_key) = compiled.root_key() {
        println!("  root key:            {}", root_key);
    }

    Ok(())
}
