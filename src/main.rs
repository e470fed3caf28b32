//! Mini-Pager CLI (diagnostic use only)
//! The main interface is through WASM bindings.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};

use mini_pager::{
    Document, Paginator, PaginatorConfig, RecomputeOutcome, TemplateCatalog, TypesetSurface,
};

#[derive(Parser, Debug)]
#[command(name = "mini-pager")]
#[command(
    author,
    version,
    about = "Paginate a manuscript against a page template and print the page map as JSON"
)]
struct Args {
    /// Template name (a4, a5, letter, legal, manuscript, web, or one from --templates)
    template: String,

    /// Input text file; reads stdin when omitted
    file: Option<PathBuf>,

    /// Extra templates as a JSON array
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Paginator settings as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the page preview instead of the state snapshot
    #[arg(short, long)]
    preview: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    let catalog = match &args.templates {
        Some(path) => TemplateCatalog::from_json(&read_file(path)?)
            .with_context(|| format!("Invalid template catalog {}", path.display()))?,
        None => TemplateCatalog::builtin(),
    };
    let template = catalog.get(&args.template)?.clone();

    let config = match &args.config {
        Some(path) => PaginatorConfig::from_json(&read_file(path)?)
            .with_context(|| format!("Invalid config {}", path.display()))?,
        None => PaginatorConfig::default(),
    };

    let text = match &args.file {
        Some(path) => read_file(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let document = Document::from_text(&text);
    log::info!(
        "Loaded {} blocks ({} positions)",
        document.block_count(),
        document.size()
    );

    let mut paginator = Paginator::with_config(template.clone(), config);
    let surface = TypesetSurface::new(paginator.geometry(), &template.typography);

    match paginator.recompute(&document, &surface) {
        RecomputeOutcome::Applied(diff) => {
            log::info!(
                "{} pages, {} spacer patches",
                paginator.total_pages(),
                diff.patch_count()
            );
        }
        RecomputeOutcome::Stale => anyhow::bail!("Recompute was superseded"),
        RecomputeOutcome::NotReady(err) => {
            return Err(err).context("Failed to measure document");
        }
    }

    let json = if args.preview {
        serde_json::to_string_pretty(&paginator.preview())?
    } else {
        serde_json::to_string_pretty(paginator.state())?
    };
    println!("{}", json);

    Ok(())
}
