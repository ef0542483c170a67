//! dashgrid CLI
//!
//! Usage:
//!   dashgrid [OPTIONS] <COMMAND>
//!
//! Commands:
//!   check   Lint a layout file for overlaps and out-of-canvas widgets
//!   render  Render a layout file as an SVG preview
//!   drag    Preview dragging a widget to a new position
//!   resize  Preview resizing a widget
//!
//! Options:
//!   -s, --settings <FILE>  Grid settings (TOML format)
//!   -v, --verbose          Debug logging (overridden by RUST_LOG)

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dashgrid::engine::lint;
use dashgrid::renderer::render_layout_highlighted;
use dashgrid::{
    Bounds, BoundsMapper, CellGrid, Container, DashboardError, DashboardLayout, DashboardSession,
    GesturePreview, GridSettings, ResizeDirection, SvgConfig,
};

#[derive(Parser)]
#[command(name = "dashgrid")]
#[command(about = "Snap, collision and lint tooling for dashboard widget layouts")]
struct Cli {
    /// Grid settings file (TOML format)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lint a layout file
    Check {
        /// Layout file (JSON)
        layout: PathBuf,
        #[command(flatten)]
        canvas: Canvas,
    },
    /// Render a layout file as SVG to stdout
    Render {
        /// Layout file (JSON)
        layout: PathBuf,
        #[command(flatten)]
        canvas: Canvas,
    },
    /// Preview dragging a widget; prints the snap and collision result as JSON
    Drag {
        layout: PathBuf,
        widget: String,
        x: f64,
        y: f64,
        /// Write the moved layout back to the file if the drop is valid
        #[arg(long)]
        commit: bool,
        #[command(flatten)]
        canvas: Canvas,
    },
    /// Preview resizing a widget; prints the snap and collision result as JSON
    Resize {
        layout: PathBuf,
        widget: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        /// Moving edges, e.g. "e", "sw"
        direction: String,
        #[arg(long)]
        commit: bool,
        #[command(flatten)]
        canvas: Canvas,
    },
}

#[derive(Args)]
struct Canvas {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 1200.0)]
    canvas_width: f64,
    /// Canvas height in pixels
    #[arg(long, default_value_t = 800.0)]
    canvas_height: f64,
    /// Pixel size of one layout cell (defaults to the grid size)
    #[arg(long)]
    cell_size: Option<f64>,
}

impl Canvas {
    fn container(&self) -> Container {
        Container::new(self.canvas_width, self.canvas_height)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid layout file '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let settings = match &cli.settings {
        Some(path) => GridSettings::from_file(path).map_err(DashboardError::from)?,
        None => GridSettings::default(),
    };

    match cli.command {
        Command::Check { layout, canvas } => {
            let layout = load_layout(&layout)?;
            let session = session(layout, settings, &canvas);
            let warnings = lint::check(session.layout(), session.grid(), session.container());
            for w in &warnings {
                println!("{}", w);
            }
            tracing::info!(warnings = warnings.len(), "lint finished");
            Ok(if warnings.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Render { layout, canvas } => {
            let layout = load_layout(&layout)?;
            let session = session(layout, settings, &canvas);
            let conflicts = overlapping_ids(&session);
            let svg = render_layout_highlighted(
                session.layout(),
                session.grid(),
                session.settings(),
                session.container(),
                &SvgConfig::default(),
                &conflicts,
            );
            println!("{}", svg);
            Ok(ExitCode::SUCCESS)
        }
        Command::Drag {
            layout: path,
            widget,
            x,
            y,
            commit,
            canvas,
        } => {
            let mut session = session(load_layout(&path)?, settings, &canvas);
            let current = session.widget_bounds(&widget).map_err(DashboardError::from)?;
            let preview = session
                .drag(&widget, current.moved_to(x, y))
                .map_err(DashboardError::from)?;
            finish_gesture(&mut session, &preview, commit, &path)
        }
        Command::Resize {
            layout: path,
            widget,
            x,
            y,
            width,
            height,
            direction,
            commit,
            canvas,
        } => {
            let direction: ResizeDirection = direction.parse().map_err(DashboardError::from)?;
            let mut session = session(load_layout(&path)?, settings, &canvas);
            let preview = session
                .resize(&widget, Bounds::new(x, y, width, height), direction)
                .map_err(DashboardError::from)?;
            finish_gesture(&mut session, &preview, commit, &path)
        }
    }
}

fn session(layout: DashboardLayout, settings: GridSettings, canvas: &Canvas) -> DashboardSession {
    let session = DashboardSession::new(layout)
        .with_settings(settings)
        .with_container(canvas.container());
    match canvas.cell_size {
        Some(side) if side > 0.0 => session.with_grid(CellGrid::square(side)),
        _ => session,
    }
}

/// Ids of visible widgets involved in at least one overlap
fn overlapping_ids(session: &DashboardSession) -> Vec<String> {
    let layout = session.layout();
    layout
        .visible_widgets()
        .filter(|w| {
            let bounds = session.grid().widget_bounds(w);
            dashgrid::detect_collision(bounds, &layout.widgets, &w.id, session.grid()).has_collision
        })
        .map(|w| w.id.clone())
        .collect()
}

fn finish_gesture(
    session: &mut DashboardSession,
    preview: &GesturePreview,
    commit: bool,
    path: &Path,
) -> Result<ExitCode, CliError> {
    let json = serde_json::to_string_pretty(preview).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })?;
    println!("{}", json);

    if !preview.is_valid() {
        return Ok(ExitCode::FAILURE);
    }
    if commit {
        session.commit(preview).map_err(DashboardError::from)?;
        save_layout(path, session.layout())?;
        tracing::info!(widget = %preview.widget_id, path = %path.display(), "layout updated");
    }
    Ok(ExitCode::SUCCESS)
}

fn load_layout(path: &Path) -> Result<DashboardLayout, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    DashboardLayout::from_json(&content).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn save_layout(path: &Path, layout: &DashboardLayout) -> Result<(), CliError> {
    let json = layout.to_json().map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, json).map_err(|source| CliError::Write {
        path: path.display().to_string(),
        source,
    })
}
