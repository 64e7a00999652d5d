mod config;
mod export;
mod logger;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use graft_core::{TemplateGeometry, ViewKind, project_all};
use template_core::{Session, SessionFile, cylinder_svg, default_file_name, template_svg};
use tracing::{debug, info};

use crate::config::TemplateConfig;

#[derive(Parser, Debug)]
#[command(name = "graft-template")]
#[command(about = "Print 1:1 fenestration templates for aortic stent grafts", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a session to SVG, PNG or PDF (chosen by file extension)
    Render {
        /// Session file (JSON)
        session: PathBuf,

        /// Output path; defaults to graft_template_<d>mm_<l>mm.pdf
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum)]
        view: Option<ViewArg>,

        /// Raster resolution for PNG output
        #[arg(long)]
        px_per_mm: Option<f64>,
    },
    /// Print the fenestration list in display order
    List {
        /// Session file (JSON)
        session: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ViewArg {
    Template,
    Cylinder,
}

impl From<ViewArg> for ViewKind {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::Template => ViewKind::FlatTemplate,
            ViewArg::Cylinder => ViewKind::CylindricalView,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let config = match &cli.config {
        Some(path) => TemplateConfig::from_file(path)?,
        None => TemplateConfig::default(),
    };
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Render {
            session,
            output,
            view,
            px_per_mm,
        } => {
            let loaded = load_session(&session, &config)?;
            let view = view.map(ViewKind::from).unwrap_or(config.render.view);
            let px_per_mm = px_per_mm.unwrap_or(config.render.px_per_mm);
            render(&loaded, &config, view, output, px_per_mm)
        }
        Command::List { session } => {
            let loaded = load_session(&session, &config)?;
            list(&loaded);
            Ok(())
        }
    }
}

fn load_session(path: &Path, config: &TemplateConfig) -> Result<Session> {
    SessionFile::from_path(path)
        .and_then(|file| file.into_session(config.limits.clone()))
        .with_context(|| format!("loading session {}", path.display()))
}

fn render(
    session: &Session,
    config: &TemplateConfig,
    view: ViewKind,
    output: Option<PathBuf>,
    px_per_mm: f64,
) -> Result<()> {
    // A convention saved with the session wins over the config file.
    let convention = session.convention.unwrap_or(config.convention);
    let graft = &session.graft;
    let markers = project_all(&session.registry, graft, view, &convention)?;

    let sheet = match view {
        ViewKind::FlatTemplate => {
            let geometry = TemplateGeometry::new(graft, &convention);
            template_svg(graft, &geometry, &markers, &config.sheet)?
        }
        ViewKind::CylindricalView => cylinder_svg(graft, &markers, &convention, &config.sheet),
    };

    let output = output.unwrap_or_else(|| {
        PathBuf::from(default_file_name(
            graft.diameter_mm(),
            graft.length_mm(),
            "pdf",
        ))
    });
    info!(
        ?view,
        markers = markers.len(),
        output = %output.display(),
        "rendering"
    );
    export::write_sheet(&sheet, &output, px_per_mm)
}

fn list(session: &Session) {
    let graft = &session.graft;
    println!(
        "Graft: {}mm x {}mm (circumference {:.1}mm)",
        template_core::fmt_mm(graft.diameter_mm()),
        template_core::fmt_mm(graft.length_mm()),
        graft.circumference_mm()
    );
    if session.registry.is_empty() {
        println!("No fenestrations.");
    }
    for (i, f) in session.registry.display_order().enumerate() {
        println!("{:>2}. {}  [{}]", i + 1, f, f.clock.region());
    }
    let available: Vec<String> = session
        .registry
        .available_vessels()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Available vessels: {}", available.join(", "));
}
