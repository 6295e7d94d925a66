//! Skillgrid CLI - compare candidates on a skill heatmap

// Global invariants enforced:
// - Heatmap columns follow the order ids were given, never fetch order
// - A failed detail fetch drops that candidate only
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use skillgrid_core::config::{self, ResolvedConfig};
use skillgrid_core::heatmap;
use skillgrid_core::html::{render_html_dashboard, Dashboard};
use skillgrid_core::report::{render_people_json, render_people_text};
use skillgrid_core::selection::recommended;
use skillgrid_core::svg::render_svg;
use skillgrid_core::{
    render_json, render_text, skill_axis, DirSource, HttpSource, PaginationWindow, PeopleSource,
    PersonId, Selection,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skillgrid")]
#[command(about = "Compare candidates' experience and skill scores on a heatmap")]
#[command(version = env!("SKILLGRID_VERSION"))]
struct Cli {
    /// Read people from a directory (people.json, people/<id>.json) instead of the API
    #[arg(long, global = true)]
    source_dir: Option<PathBuf>,

    /// People API base URL (overrides config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to config file (default: auto-discover)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress at info level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List people, marking the recommended ones
    People {
        /// Output format
        #[arg(long, default_value = "text")]
        format: ListFormat,
    },
    /// Build the comparison heatmap for the selected candidates
    Heatmap {
        /// Candidate ids, in selection order
        ids: Vec<String>,

        /// Select the recommended candidates before any explicit ids
        #[arg(long)]
        recommended: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: HeatmapFormat,

        /// Number of forward page navigations to apply
        #[arg(long, default_value = "0")]
        page: usize,

        /// Candidates per page (overrides config file)
        #[arg(long)]
        page_size: Option<usize>,

        /// Output file path (for HTML format, default: .skillgrid/heatmap.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate or show configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate,
    /// Show the resolved configuration (merged defaults + config file)
    Show,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ListFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum HeatmapFormat {
    Text,
    Json,
    Svg,
    Html,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_root = std::env::current_dir()?;

    match cli.command {
        Commands::People { format } => {
            let resolved = load_config(&project_root, cli.config.as_deref())?;
            let source = open_source(cli.source_dir, cli.api_url, &resolved)?;
            let people = source.list_people()?;

            match format {
                ListFormat::Text => {
                    print!("{}", render_people_text(&people, resolved.recommended_count))
                }
                ListFormat::Json => println!("{}", render_people_json(&people)),
            }
        }
        Commands::Heatmap {
            ids,
            recommended: with_recommended,
            format,
            page,
            page_size,
            output,
        } => {
            let resolved = load_config(&project_root, cli.config.as_deref())?;
            let page_size = page_size.unwrap_or(resolved.page_size);
            let mut window =
                PaginationWindow::new(page_size).context("invalid --page-size")?;
            let source = open_source(cli.source_dir, cli.api_url, &resolved)?;

            let mut selection = Selection::new();
            if with_recommended {
                let people = source.list_people()?;
                for person in recommended(&people, resolved.recommended_count) {
                    selection.select(person.id.clone());
                }
            }
            for id in ids {
                let id = PersonId::new(id);
                if !selection.select(id.clone()) {
                    tracing::info!(person = %id, "already selected");
                }
            }
            if selection.is_empty() {
                anyhow::bail!("no candidates selected (pass ids or --recommended)");
            }

            fetch_details(&mut selection, source.as_ref())?;

            let rows = selection.rows();
            let axis = skill_axis(&rows, &resolved);
            window.advance(page, rows.len());
            eprintln!(
                "Selected {} candidates ({} in heatmap)",
                selection.len(),
                rows.len()
            );

            match format {
                HeatmapFormat::Text => print!("{}", render_text(&rows, &axis, &window)),
                HeatmapFormat::Json => println!("{}", render_json(&rows, &axis, &window)),
                HeatmapFormat::Svg => {
                    let scene =
                        heatmap::render(window.visible_slice(&rows), &axis, &resolved.heatmap);
                    let svg = render_svg(&scene);
                    match output {
                        Some(path) => {
                            write_report(&path, &svg)?;
                            eprintln!("SVG written to: {}", path.display());
                        }
                        None => println!("{}", svg),
                    }
                }
                HeatmapFormat::Html => {
                    let html = render_html_dashboard(&Dashboard {
                        rows: &rows,
                        axis: &axis,
                        options: &resolved.heatmap,
                        page_size,
                        selected_count: selection.len(),
                    })?;
                    let output_path = output
                        .unwrap_or_else(|| project_root.join(".skillgrid").join("heatmap.html"));
                    write_report(&output_path, &html)?;
                    eprintln!("HTML dashboard written to: {}", output_path.display());
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate => {
                match config::load_and_resolve(&project_root, cli.config.as_deref()) {
                    Ok(resolved) => {
                        if let Some(ref p) = resolved.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show => {
                let resolved = load_config(&project_root, cli.config.as_deref())?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(project_root: &Path, config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let resolved = config::load_and_resolve(project_root, config_path)
        .context("failed to load configuration")?;
    if let Some(path) = &resolved.config_path {
        eprintln!("Using config: {}", path.display());
    }
    Ok(resolved)
}

/// Directory source when `--source-dir` is given, otherwise the HTTP API
fn open_source(
    source_dir: Option<PathBuf>,
    api_url: Option<String>,
    resolved: &ResolvedConfig,
) -> anyhow::Result<Box<dyn PeopleSource>> {
    match source_dir {
        Some(dir) => {
            if !dir.is_dir() {
                anyhow::bail!("Source directory does not exist: {}", dir.display());
            }
            tracing::info!(dir = %dir.display(), "reading people from directory");
            Ok(Box::new(DirSource::new(dir)))
        }
        None => {
            let url = api_url.unwrap_or_else(|| resolved.api_url.clone());
            tracing::info!(url = %url, "reading people from API");
            Ok(Box::new(HttpSource::new(&url, resolved.timeout)?))
        }
    }
}

/// Fetch every pending detail with a progress bar on stderr
fn fetch_details(selection: &mut Selection, source: &dyn PeopleSource) -> anyhow::Result<()> {
    let pending = selection.pending().len();
    let progress = ProgressBar::new(pending as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} fetching details [{bar:30}] {pos}/{len} {msg}")
            .context("invalid progress template")?
            .progress_chars("=> "),
    );

    let stored = selection.fetch_pending(source, |id| {
        progress.set_message(id.to_string());
        progress.inc(1);
    });
    progress.finish_and_clear();

    tracing::info!(requested = pending, stored, "detail fetch complete");
    Ok(())
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("People API:");
    println!("  api_url: {}", resolved.api_url);
    println!("  timeout: {}s", resolved.timeout.as_secs());
    println!();
    println!("Selection:");
    println!("  page_size: {}", resolved.page_size);
    println!("  recommended_count: {}", resolved.recommended_count);
    println!(
        "  skills: {}",
        resolved
            .skills
            .as_ref()
            .map(|s| s.join(", "))
            .unwrap_or_else(|| "all (first-seen order)".to_string())
    );
    println!();
    println!("Canvas:");
    println!("  width: {}", resolved.heatmap.width);
    println!("  height: {}", resolved.heatmap.height);
}

/// Write a report to file with atomic write pattern
fn write_report(path: &Path, content: &str) -> anyhow::Result<()> {
    use std::fs;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}
