//! Assemble label and code PDFs from a directory.
//!
//! Usage:
//!   assemble_labels <input_dir> <output_dir> [--config FILE] [--label-pattern REGEX]
//!                   [--label-by-name] [--no-combined] [--verbose]
//!
//! `--label-pattern` picks the label by file name instead of by size;
//! `--label-by-name` does the same with the usual label keywords.

use label_assembler::config::{AssemblyConfig, LabelSelection};
use label_assembler::discovery::NamePattern;
use label_assembler::pipeline::AssemblyPipeline;
use std::path::PathBuf;
use std::process;

struct CliConfig {
    input_dir: PathBuf,
    output_dir: PathBuf,
    config_file: Option<PathBuf>,
    label_pattern: Option<String>,
    label_by_name: bool,
    no_combined: bool,
    verbose: bool,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut positional = Vec::new();
        let mut config_file = None;
        let mut label_pattern = None;
        let mut label_by_name = false;
        let mut no_combined = false;
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    i += 1;
                    let value = args.get(i).ok_or("--config needs a file")?;
                    config_file = Some(PathBuf::from(value));
                },
                "--label-pattern" => {
                    i += 1;
                    let value = args.get(i).ok_or("--label-pattern needs a regex")?;
                    label_pattern = Some(value.clone());
                },
                "--label-by-name" => label_by_name = true,
                "--no-combined" => no_combined = true,
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => return Err(usage()),
                arg if arg.starts_with("--") => return Err(format!("unknown option {}\n{}", arg, usage())),
                arg => positional.push(PathBuf::from(arg)),
            }
            i += 1;
        }

        if positional.len() != 2 {
            return Err(usage());
        }
        let output_dir = positional.pop().unwrap_or_default();
        let input_dir = positional.pop().unwrap_or_default();

        Ok(Self {
            input_dir,
            output_dir,
            config_file,
            label_pattern,
            label_by_name,
            no_combined,
            verbose,
        })
    }
}

fn usage() -> String {
    "usage: assemble_labels <input_dir> <output_dir> [--config FILE] [--label-pattern REGEX] \
     [--label-by-name] [--no-combined] [--verbose]"
        .to_string()
}

fn main() {
    env_logger::init();

    let cli = match CliConfig::from_args() {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(2);
        },
    };

    let mut config = match &cli.config_file {
        Some(path) => match AssemblyConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                process::exit(2);
            },
        },
        None => AssemblyConfig::default(),
    };
    if let Some(pattern) = &cli.label_pattern {
        config = config.with_label_selection(LabelSelection::NamePattern(pattern.clone()));
    }
    if cli.no_combined {
        config = config.with_combined(false);
    }

    let mut pipeline = match AssemblyPipeline::new(&cli.input_dir, &cli.output_dir, config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(2);
        },
    };
    if cli.label_by_name && cli.label_pattern.is_none() {
        pipeline = pipeline.with_label_selector(NamePattern::label_keywords());
    }

    println!("Input directory:  {}", cli.input_dir.display());
    println!("Output directory: {}", cli.output_dir.display());

    let outcome = pipeline.run();

    if cli.verbose || !outcome.success {
        println!("\n{}", outcome.log);
    }

    println!("\n{}", "=".repeat(60));
    if outcome.success {
        println!("ASSEMBLY COMPLETE");
    } else {
        println!("ASSEMBLY FAILED");
    }
    println!("{}", "=".repeat(60));
    println!("Produced:  {}", outcome.documents.len());
    println!("Skipped:   {}", outcome.skipped.len());
    for path in &outcome.documents {
        println!("  {}", path.display());
    }
    for name in &outcome.skipped {
        println!("  skipped: {}", name);
    }

    if !outcome.success {
        process::exit(1);
    }
}
