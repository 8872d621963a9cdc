//! figure - inspect and edit structured diagram files from the command line.
//!
//! Every subcommand works on a drawing saved as JSON. Edits go through the
//! same command history an interactive editor uses.

use anyhow::{bail, Context, Result};
use canvas::{Canvas, CanvasConfig, CommandRequest};
use clap::{Parser, Subcommand};
use figure::{
    find_enclosing_figures, find_figures_below_point, find_figures_enclosing_and_enclosed,
    serialization, Drawing, FigureId, FigureRegistry, Point, Rect,
};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// figure - work with structured diagram files
#[derive(Parser)]
#[command(name = "figure")]
#[command(about = "Inspect, check and edit structured diagram files")]
struct Cli {
    /// Increase log output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with canvas settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the figure tree with the path of every figure
    Inspect { file: PathBuf },

    /// Verify that every figure lies strictly inside its container
    Check { file: PathBuf },

    /// List the figures below a document point, innermost first
    Hit {
        file: PathBuf,
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },

    /// Show where a rect would be placed and which figures it would take over
    Enclose {
        file: PathBuf,
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
        width: f64,
        height: f64,
    },

    /// Run a JSON array of command requests against a drawing
    Apply {
        file: PathBuf,
        script: PathBuf,
        /// Where to write the result (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Decode and re-encode a drawing and report whether the bytes match
    Roundtrip { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { file } => inspect(&file),
        Commands::Check { file } => check(&file),
        Commands::Hit { file, x, y } => hit(&file, x, y),
        Commands::Enclose {
            file,
            x,
            y,
            width,
            height,
        } => enclose(&file, x, y, width, height),
        Commands::Apply { file, script, out } => apply(config, &file, &script, out.as_deref()),
        Commands::Roundtrip { file } => roundtrip(&file),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_config(path: Option<&Path>) -> Result<CanvasConfig> {
    let Some(path) = path else {
        return Ok(CanvasConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    CanvasConfig::from_json_str(&json).with_context(|| format!("Invalid config {}", path.display()))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_drawing(path: &Path) -> Result<Drawing> {
    let json = read_file(path)?;
    let registry = FigureRegistry::with_default_kinds();
    let drawing = serialization::from_json_str(&registry, &json)
        .with_context(|| format!("Failed to load drawing from {}", path.display()))?;
    debug!("loaded {}", path.display());
    Ok(drawing)
}

fn describe_path(drawing: &Drawing, id: FigureId) -> Result<String> {
    let path = drawing.path_of(id)?;
    let parts: Vec<String> = path.iter().map(|index| index.to_string()).collect();
    Ok(format!("[{}]", parts.join(", ")))
}

fn print_figure_line(drawing: &Drawing, id: FigureId) -> Result<()> {
    let figure = drawing.figure(id)?;
    println!("{} {}", describe_path(drawing, id)?, figure.describe());
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let drawing = load_drawing(path)?;
    for id in drawing.descendants(drawing.root())? {
        let depth = drawing.containers(id)?.len();
        let figure = drawing.figure(id)?;
        println!(
            "{}{} {}",
            "  ".repeat(depth),
            describe_path(&drawing, id)?,
            figure.describe()
        );
    }
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let drawing = load_drawing(path)?;
    drawing
        .check_invariants()
        .with_context(|| format!("{} violates containment", path.display()))?;
    let count = drawing.descendants(drawing.root())?.len();
    println!("OK: {count} figures");
    Ok(())
}

fn hit(path: &Path, x: f64, y: f64) -> Result<()> {
    let drawing = load_drawing(path)?;
    let point = Point::new(x, y)?;
    let below = find_figures_below_point(&drawing, drawing.root(), point, true);
    if below.is_empty() {
        println!("No figures below {point}");
    }
    for id in below {
        print_figure_line(&drawing, id)?;
    }
    Ok(())
}

fn enclose(path: &Path, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
    let drawing = load_drawing(path)?;
    let rect = Rect::new(x, y, width, height)?;
    let containment = find_figures_enclosing_and_enclosed(&drawing, rect)
        .with_context(|| format!("{rect} does not fit in the drawing"))?;
    println!("Enclosed by:");
    for id in find_enclosing_figures(&drawing, drawing.root(), rect) {
        print!("  ");
        print_figure_line(&drawing, id)?;
    }
    print!("Container: ");
    print_figure_line(&drawing, containment.target_container)?;
    if containment.to_be_absorbed.is_empty() {
        println!("Absorbs nothing");
    } else {
        println!("Absorbs:");
        for id in containment.to_be_absorbed {
            print!("  ");
            print_figure_line(&drawing, id)?;
        }
    }
    Ok(())
}

fn apply(config: CanvasConfig, path: &Path, script: &Path, out: Option<&Path>) -> Result<()> {
    let mut canvas = Canvas::new(config);
    canvas
        .load_json(&read_file(path)?)
        .with_context(|| format!("Failed to load drawing from {}", path.display()))?;
    let requests = CommandRequest::parse_script(&read_file(script)?)
        .with_context(|| format!("Invalid script {}", script.display()))?;

    for (index, request) in requests.iter().enumerate() {
        canvas
            .run_request(request)
            .with_context(|| format!("Request {index} failed: {request:?}"))?;
    }
    info!("applied {} requests", requests.len());

    let json = canvas.to_json()?;
    match out {
        Some(out) => std::fs::write(out, format!("{json}\n"))
            .with_context(|| format!("Failed to write {}", out.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn roundtrip(path: &Path) -> Result<()> {
    let drawing = load_drawing(path)?;
    let first = serialization::to_json_string(&drawing)?;
    let registry = FigureRegistry::with_default_kinds();
    let second = serialization::to_json_string(&serialization::from_json_str(&registry, &first)?)?;
    if first != second {
        bail!("{} does not survive a round trip", path.display());
    }
    let original = read_file(path)?;
    if original.trim_end() == first {
        println!("Identical: re-encoding reproduces the file byte for byte");
    } else {
        println!("Stable: re-encoding is idempotent but differs from the file's formatting");
    }
    Ok(())
}
