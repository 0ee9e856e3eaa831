use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use clap::{ArgAction, Parser};
use svg_to_spine::spine::{ConvertOptions, CornerStyle, SvgDocument, build_skeleton, convert_document};
use tracing_subscriber::EnvFilter;

/// Export the paths of an SVG file as Spine path attachments.
#[derive(Parser, Debug)]
#[command(name = "svg-to-spine", version)]
struct Cli {
    /// Input SVG file.
    input: PathBuf,

    /// Output skeleton JSON path.
    #[arg(short, long, default_value = "paths.json")]
    output: PathBuf,

    /// Handle style for the free ends of open paths (curve or line).
    #[arg(short = 'c', long = "corner-type", value_parser = CornerStyle::from_str, default_value = "curve")]
    corner_style: CornerStyle,

    /// Give every path its own slot instead of one shared `paths` slot.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    own_slot: bool,

    /// Only export the elements passed with `--id`.
    #[arg(short, long)]
    selected_only: bool,

    /// Element id to export when `--selected-only` is set. Repeatable.
    #[arg(long = "id")]
    ids: Vec<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_svg(path: &Path) -> anyhow::Result<SvgDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read input file '{}'", path.display()))?;
    SvgDocument::parse(&content).with_context(|| format!("parse SVG '{}'", path.display()))
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let options = ConvertOptions {
        corner_style: cli.corner_style,
        own_slot: cli.own_slot,
        selected_only: cli.selected_only,
        selection: cli.ids,
    };

    let doc = read_svg(&cli.input)?;
    let conversion = convert_document(&doc, &options)?;
    let json = build_skeleton(&conversion, options.own_slot).to_json()?;

    fs::write(&cli.output, json)
        .with_context(|| format!("write output file '{}'", cli.output.display()))?;

    println!(
        "Successfully converted '{}' to '{}' ({} paths, {} skipped)",
        cli.input.display(),
        cli.output.display(),
        conversion.paths.len(),
        conversion.skipped.len()
    );
    Ok(())
}
