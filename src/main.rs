use clap::{Args, Parser, Subcommand};
use iconsmith::config::{self, PipelineConfig};
use iconsmith::extract::{self, ExtractSettings};
use iconsmith::gather::{self, GatherOptions, IconSet};
use iconsmith::imaging::ResvgRasterizer;
use iconsmith::render::{RenderSettings, Renderer};
use iconsmith::stylesheet::SassCompiler;
use iconsmith::types::{FolderState, IconEntry};
use iconsmith::{fragment, naming, output, theme};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const REPORT_FILE: &str = "render-report.json";

fn version_string() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[derive(Parser)]
#[command(name = "iconsmith")]
#[command(about = "Render, restyle and theme the Eclipse SVG icon set")]
#[command(long_about = "\
Render, restyle and theme the Eclipse SVG icon set

Run from the directory holding the icon repository:

  eclipse-svg/                         # SVG sources, one directory per icon set
  │   └── org.eclipse.ui/icons/full/
  │       ├── etool16/save_edit.svg    # e* directories get a derived disabled variant
  │       ├── dtool16/                 # ...written here, never read as a source
  │       └── wizban/new_wiz.svg       # wizard banners (see --banners)
  eclipse-css/                         # per-icon stylesheets
  │   ├── styles/stock.scss            # theme aggregator
  │   └── org.eclipse.ui/styles/stock/full/etool16/save_edit.scss
  eclipse-png[-<theme>][-hidpi]/       # render output

Typical workflow:
  iconsmith extract-css                # lift inline styles into stock stylesheets
  iconsmith create-theme dark          # copy stock to a new theme, then edit it
  iconsmith render --theme dark --scale 2

Run 'iconsmith gen-config' to generate a documented iconsmith.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (optional; defaults apply when missing)
    #[arg(long, default_value = "iconsmith.toml", global = true)]
    config: PathBuf,

    /// Log debug detail
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Gather filters shared by every command that walks the icon sets.
#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Only icons whose path contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Only icons whose file name contains this text
    #[arg(long)]
    icon: Option<String>,

    /// Wizard banner handling
    #[arg(long, value_parser = ["exclude", "include", "only"])]
    banners: Option<String>,
}

#[derive(Args, Clone, Default)]
struct RenderArgs {
    /// Output scale factor (1, 1.5 and 2 are usual)
    #[arg(long)]
    scale: Option<f64>,

    /// Max render workers (capped at the CPU count)
    #[arg(long)]
    threads: Option<usize>,

    /// Render through the per-icon stylesheets of this theme
    #[arg(long)]
    theme: Option<String>,

    /// Recompile stylesheets even if a compiled sheet exists
    #[arg(long)]
    regenerate_styles: bool,

    /// Write scaled output next to the native sets instead of `.hidpi` fragments
    #[arg(long)]
    no_fragments: bool,

    /// Write render-report.json into the output directory
    #[arg(long)]
    report: bool,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Rasterize every icon to PNG
    Render(RenderArgs),
    /// Extract inline styles into stock stylesheets
    ExtractCss(FilterArgs),
    /// Clone the stock stylesheets into a new theme
    CreateTheme {
        /// Name of the new theme
        name: String,
    },
    /// Gather icons and list the render jobs without rendering
    Check(FilterArgs),
    /// Print a stock iconsmith.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let working_dir = std::env::current_dir()?;
    let load = || -> Result<PipelineConfig, config::ConfigError> {
        info!("Working directory: {}", working_dir.display());
        config::load_config(&working_dir.join(&cli.config))
    };

    match cli.command {
        Command::Render(args) => {
            let mut config = load()?;
            apply_render_args(&mut config, &args)?;
            config.validate()?;
            init_thread_pool(&config.processing);
            render(&config, &working_dir, args.report)?;
        }
        Command::ExtractCss(filters) => {
            let mut config = load()?;
            apply_filter_args(&mut config, &filters)?;
            init_thread_pool(&config.processing);
            let sets = gather_sets(&config, &working_dir)?;
            let icons: Vec<IconEntry> = sets.into_iter().flat_map(|s| s.icons).collect();
            let summary = extract::extract_all(&icons, &ExtractSettings::from_config(&config));
            output::print_extract_summary(&summary);
        }
        Command::CreateTheme { name } => {
            let config = load()?;
            let css_root = working_dir.join(&config.paths.styles);
            let report = theme::clone_theme(&css_root, &name)?;
            output::print_clone_report(&report, &working_dir);
        }
        Command::Check(filters) => {
            let mut config = load()?;
            apply_filter_args(&mut config, &filters)?;
            let sets = gather_sets(&config, &working_dir)?;
            output::print_check_output(&sets, &working_dir);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the fmt subscriber: DEBUG with `--verbose`, INFO otherwise.
/// `RUST_LOG` takes precedence when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    info!("Number of threads: {threads}");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn apply_filter_args(
    config: &mut PipelineConfig,
    filters: &FilterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &filters.filter {
        config.filter.path = Some(path.clone());
    }
    if let Some(icon) = &filters.icon {
        config.filter.icon = Some(icon.clone());
    }
    if let Some(banners) = &filters.banners {
        config.render.banners = banners.parse::<FolderState>()?;
    }
    Ok(())
}

fn apply_render_args(
    config: &mut PipelineConfig,
    args: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    apply_filter_args(config, &args.filters)?;
    if let Some(scale) = args.scale {
        config.render.scale = scale;
    }
    if let Some(threads) = args.threads {
        config.processing.max_processes = Some(threads);
    }
    if let Some(theme) = &args.theme {
        config.styles.theme = Some(theme.clone());
    }
    if args.regenerate_styles {
        config.styles.regenerate = true;
    }
    if args.no_fragments {
        config.render.create_fragments = false;
    }
    Ok(())
}

/// Output directory for a render run: `<target>[-<theme>][-hidpi]`.
fn target_dir(config: &PipelineConfig, working_dir: &Path) -> PathBuf {
    working_dir.join(naming::target_dir_name(
        &config.paths.target,
        config.styles.theme.as_deref(),
        config.hidpi_fragments(),
    ))
}

fn gather_sets(
    config: &PipelineConfig,
    working_dir: &Path,
) -> Result<Vec<IconSet>, gather::GatherError> {
    let svg_root = working_dir.join(&config.paths.source);
    info!("SVG directory: {}", svg_root.display());
    gather::gather_icon_sets(
        &svg_root,
        &target_dir(config, working_dir),
        config.hidpi_fragments(),
        &GatherOptions::from_config(config),
    )
}

fn render(
    config: &PipelineConfig,
    working_dir: &Path,
    report: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sets = gather_sets(config, working_dir)?;

    if config.hidpi_fragments() {
        for set in &sets {
            let written = fragment::create_fragment_files(&set.output_base, &set.name);
            debug!("Fragment files for {}: {}", set.name, written.len());
        }
    }

    let icons: Vec<IconEntry> = sets.into_iter().flat_map(|s| s.icons).collect();
    info!("Working on {} icons", icons.len());

    let rasterizer = ResvgRasterizer::new();
    let compiler = SassCompiler::new(config.styles.compiler.clone());
    let renderer = Renderer::new(
        RenderSettings::from_config(config, working_dir),
        &rasterizer,
        &compiler,
    );

    let (tx, rx) = std::sync::mpsc::channel();
    let printer_dir = working_dir.to_path_buf();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_render_event(&event, &printer_dir) {
                println!("{}", line);
            }
        }
    });
    let summary = renderer.render_all(&icons, Some(tx));
    printer.join().ok();

    output::print_render_summary(&summary);
    if report {
        let path = target_dir(config, working_dir).join(REPORT_FILE);
        summary.write_report(&path)?;
        info!("Report written to {}", path.display());
    }
    Ok(())
}
