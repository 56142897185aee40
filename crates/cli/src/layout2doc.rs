//! layout2doc - Reconstruct document structure from analyzer page dumps
//!
//! A command line tool that reads one or more JSON dumps of analyzed
//! pages (as produced by the upstream layout analyzer), runs the
//! reclassification pipeline, and writes the reconstructed node
//! sequence as JSON or plain text.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};

use strata_core::{CancelToken, DocumentInput, Node, Pipeline, PipelineConfig};

/// Output format for the reconstructed document.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputType {
    /// JSON node sequence (default)
    #[default]
    Json,
    /// Plain text outline
    Text,
}

/// Reconstruct document structure (titles, paragraphs, tables, reading
/// order) from JSON dumps of analyzed page layout.
#[derive(Parser, Debug)]
#[command(name = "layout2doc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more paths to analyzer page dumps (JSON)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory where reconstructed documents are written
    #[arg(short = 'd', long, default_value = ".")]
    directory: PathBuf,

    /// Output format
    #[arg(short = 't', long, value_enum, default_value_t = OutputType::Json)]
    output_type: OutputType,

    /// Header/footer margins as top,right,bottom,left page ratios
    #[arg(long, value_delimiter = ',', num_args = 4)]
    header_margins: Option<Vec<f64>>,

    /// Do not group bulleted runs into single paragraphs
    #[arg(long, action = ArgAction::SetTrue)]
    no_bullets: bool,

    /// Use debug logging level
    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn build_config(args: &Args) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    if let Some(margins) = &args.header_margins {
        config.headers.margins = [margins[0], margins[1], margins[2], margins[3]];
    }
    if args.no_bullets {
        config.group_bullets = false;
    }
    config
}

fn read_input(path: &Path) -> Result<DocumentInput> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let input: DocumentInput = serde_json::from_str(&data)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(input)
}

fn render_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Title { text, level, .. } => {
                out.push_str(&"#".repeat(level + 1));
                out.push(' ');
                out.push_str(text);
            }
            Node::Paragraph { text, .. } => out.push_str(text),
            Node::Table { rows, .. } => match rows {
                Some(rows) => {
                    for (i, row) in rows.iter().enumerate() {
                        if i > 0 {
                            out.push('\n');
                        }
                        out.push_str(&row.join("\t"));
                    }
                }
                None => out.push_str("[table]"),
            },
        }
        out.push_str("\n\n");
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let pipeline = Pipeline::new(build_config(&args))?;

    let mut inputs = Vec::new();
    for file in &args.files {
        inputs.push(read_input(file)?);
    }

    let cancel = CancelToken::new();
    let outcomes = pipeline.run_batch(inputs, &cancel);

    fs::create_dir_all(&args.directory)?;
    let mut failures = 0usize;
    for outcome in outcomes {
        match outcome.result {
            Ok(document) => {
                let (ext, content) = match args.output_type {
                    OutputType::Json => ("json", serde_json::to_string_pretty(&document)?),
                    OutputType::Text => ("txt", render_text(&document.content)),
                };
                let path = args.directory.join(format!("{}.{ext}", document.name));
                fs::write(&path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            Err(err) => {
                eprintln!("error: {}: {err}", outcome.name);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
