use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use splom::compiler::compile_scene;
use splom::csv_reader;
use splom::data::Dataset;
use splom::graph::render_scene;
use splom::parser::parse_view_spec;
use splom::{Config, OutputFormat, ScatterMatrix};

#[derive(Parser, Debug)]
#[command(name = "splom")]
#[command(about = "Render a scatter-plot matrix from CSV data", long_about = None)]
struct Args {
    /// View DSL string (e.g., 'include(a, b) | drill(a, c) | color(species)')
    dsl: Option<String>,

    /// CSV file to read instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON config with a starting view and render options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format, overrides the config file
    #[arg(short, long, value_enum)]
    format: Option<Format>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Svg,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => OutputFormat::Png,
            Format::Svg => OutputFormat::Svg,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "splom=info".into()),
        )
        .init();

    let args = Args::parse();

    let csv_data = match &args.input {
        Some(path) => csv_reader::read_csv_from_path(path),
        None => csv_reader::read_csv_from_stdin(),
    }
    .context("Failed to read CSV input")?;

    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(format) = args.format {
        config.render.format = format.into();
    }

    let view_spec = match args.dsl.as_deref() {
        Some(dsl) => match parse_view_spec(dsl) {
            Ok((_, spec)) => spec,
            Err(e) => bail!("Parse error: {:?}", e),
        },
        None => Default::default(),
    };

    let mut matrix = ScatterMatrix::new(Dataset::from_csv(csv_data));
    info!(
        rows = matrix.data().len(),
        numeric = matrix.catalog().numeric_variables().len(),
        "loaded dataset"
    );

    let mut view = config.view.take().unwrap_or_else(|| matrix.initial_view());
    view_spec.apply(&mut view);
    let view = view.sanitized();
    matrix.rebuild(&view);

    if let Some(brush) = view_spec.brush() {
        if matrix.layout().cell(brush.cell).is_none() {
            warn!(column = brush.cell.column, row = brush.cell.row, "brush cell does not exist");
        } else {
            matrix.brush_start(brush.cell);
            matrix.brush_update(brush.cell, brush.extent);
            matrix.brush_end();
        }
    }

    let scene = compile_scene(
        matrix.layout(),
        matrix.data(),
        &matrix.highlight(),
        matrix.brush().active(),
    );
    info!(width = scene.width, height = scene.height, "compiled scene");

    let bytes = render_scene(&scene, &config.render).context("Failed to render scatter matrix")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&bytes)
        .context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
