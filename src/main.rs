use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use poster_pipeline::{Algorithm, ColorPipeline};
use posterkit::api;
use posterkit::models::{AppConfig, OptionsOverride, PaletteChoice};
use posterkit::server;
use posterkit::services::{palette_deriver, ExportFormat, PosterService};

#[derive(Parser)]
#[command(name = "posterkit")]
#[command(about = "Posterkit - turn photos into flat, limited-palette posters")]
struct Cli {
    /// YAML config file (defaults to $CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Process an image file into a poster
    Process {
        /// Source image (PNG, JPEG, GIF, BMP or WebP)
        input: PathBuf,

        /// Output file; the extension selects PNG or JPEG
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_enum)]
        algorithm: Option<AlgorithmArg>,

        /// Preset name, or comma-separated colors (e.g. "#000,#fff,red")
        #[arg(short, long)]
        palette: Option<String>,

        /// Use the palette colors as-is
        #[arg(long, conflicts_with = "gradient_steps")]
        strict: bool,

        /// Expand the palette into a gradient of N colors
        #[arg(long)]
        gradient_steps: Option<usize>,

        /// Threshold bias, neutral at 128
        #[arg(short, long)]
        threshold: Option<u8>,

        /// -100 to 100
        #[arg(long, allow_hyphen_values = true)]
        brightness: Option<f32>,

        /// -100 to 100
        #[arg(long, allow_hyphen_values = true)]
        contrast: Option<f32>,

        /// 0.1 to 3.0
        #[arg(long)]
        gamma: Option<f32>,

        /// Invert tones before color mapping
        #[arg(long)]
        invert: bool,

        /// Disable inversion set in the config defaults
        #[arg(long, conflicts_with = "invert")]
        no_invert: bool,

        /// Pixelation block size
        #[arg(long)]
        point_size: Option<u32>,

        #[arg(long, value_enum)]
        pipeline: Option<PipelineArg>,

        /// Longer edge of the working image
        #[arg(long)]
        target_length: Option<u32>,

        /// JPEG quality 1-100
        #[arg(short, long)]
        quality: Option<u8>,
    },
    /// Derive a palette from picked colors and print it
    Palette {
        /// Two to eight colors, as separate arguments or comma-separated
        #[arg(required = true)]
        colors: Vec<String>,

        /// Gradient length
        #[arg(long, conflicts_with = "strict")]
        steps: Option<usize>,

        /// Print the colors as-is instead of a gradient
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    None,
    Atkinson,
    Threshold,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::None => Algorithm::None,
            AlgorithmArg::Atkinson => Algorithm::Atkinson,
            AlgorithmArg::Threshold => Algorithm::Threshold,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PipelineArg {
    Default,
    Smooth,
    Linear,
}

impl From<PipelineArg> for ColorPipeline {
    fn from(arg: PipelineArg) -> Self {
        match arg {
            PipelineArg::Default => ColorPipeline::Standard,
            PipelineArg::Smooth => ColorPipeline::Smooth,
            PipelineArg::Linear => ColorPipeline::Linear,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Posterkit API",
        description = "Pixelate, tone-correct and palette-map images into posters",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_process,
        api::handle_preview,
        api::handle_palette,
        api::handle_palettes,
    ),
    components(schemas(
        api::ProcessRequest,
        api::OutputFormat,
        api::PaletteRequest,
        api::PaletteResponse,
        api::PresetsResponse,
        OptionsOverride,
        PaletteChoice,
    )),
    tags(
        (name = "Processing", description = "Image processing and live previews"),
        (name = "Palettes", description = "Palette presets and derivation")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

    match cli.command {
        Some(Commands::Serve) => run_server(config_path.as_deref()).await,
        Some(Commands::Process {
            input,
            output,
            algorithm,
            palette,
            strict,
            gradient_steps,
            threshold,
            brightness,
            contrast,
            gamma,
            invert,
            no_invert,
            point_size,
            pipeline,
            target_length,
            quality,
        }) => {
            init_cli_logging();
            let overrides = OptionsOverride {
                algorithm: algorithm.map(Into::into),
                threshold,
                palette: palette.as_deref().map(palette_choice),
                strict_swatches: strict.then_some(true),
                gradient_steps,
                brightness,
                contrast,
                gamma,
                invert: match (invert, no_invert) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                point_size,
                color_pipeline: pipeline.map(Into::into),
            };
            run_process_command(
                config_path.as_deref(),
                &input,
                &output,
                &overrides,
                target_length,
                quality,
            )
        }
        Some(Commands::Palette {
            colors,
            steps,
            strict,
        }) => {
            init_cli_logging();
            run_palette_command(config_path.as_deref(), &colors, steps, strict)
        }
        None => {
            run_status_command(config_path.as_deref());
            Ok(())
        }
    }
}

/// Minimal logging for CLI one-shots
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posterkit=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// A palette argument with a comma is a color list, otherwise a preset name.
fn palette_choice(arg: &str) -> PaletteChoice {
    if arg.contains(',') {
        PaletteChoice::Colors(arg.split(',').map(|s| s.trim().to_string()).collect())
    } else {
        PaletteChoice::Preset(arg.to_string())
    }
}

/// Process an image file without starting the server
fn run_process_command(
    config_path: Option<&Path>,
    input: &Path,
    output: &Path,
    overrides: &OptionsOverride,
    target_length: Option<u32>,
    quality: Option<u8>,
) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path);
    let format = ExportFormat::from_path(output, quality.unwrap_or(config.jpeg_quality))?;
    let service = PosterService::new(Arc::new(config));

    let options = service.resolve_options(overrides)?;
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let rendered = service.render(&bytes, &options, target_length, format)?;
    std::fs::write(output, &rendered.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({}x{}, {} colors, {} bytes)",
        output.display(),
        rendered.width,
        rendered.height,
        options.palette.len(),
        rendered.bytes.len()
    );
    Ok(())
}

/// Print a derived palette, one hex color per line
fn run_palette_command(
    config_path: Option<&Path>,
    colors: &[String],
    steps: Option<usize>,
    strict: bool,
) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path);

    let mut parsed = Vec::new();
    for arg in colors {
        parsed.extend(palette_deriver::parse_color_list(arg)?);
    }
    let strict = strict || (steps.is_none() && config.defaults.strict_swatches);
    let palette = palette_deriver::derive(
        &parsed,
        strict,
        steps.unwrap_or(config.gradient_steps),
    )?;

    for color in palette.colors() {
        println!("{color}");
    }
    Ok(())
}

async fn run_server(config_path: Option<&Path>) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posterkit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load(config_path);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| config.bind_addr.clone());

    tracing::info!(
        config = %config_path.map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".to_string()),
        target_length = config.target_length,
        presets = config.presets().len(),
        debounce_ms = config.preview_debounce_ms,
        "Configuration ready"
    );

    let state = server::create_app_state(config);

    // Build router: start with shared API routes, add production-only routes
    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Posterkit server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("Posterkit v{VERSION}");
    println!("Flat, limited-palette poster renderer\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    let config_source = match config_path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("{} (file not found, using defaults)", path.display()),
        None => "defaults".to_string(),
    };
    let config = AppConfig::load(config_path.filter(|p| p.exists()));
    let defaults = &config.defaults;

    println!("\nConfiguration:");
    println!("  Source:        {config_source}");
    println!(
        "  Bind address:  {}",
        bind_addr.as_deref().unwrap_or(&config.bind_addr)
    );
    println!(
        "  Target length: {} (max {})",
        config.target_length, config.max_target_length
    );
    println!(
        "  Defaults:      {} / {} pipeline, threshold {}, point size {}, palette {}",
        defaults.algorithm,
        defaults.color_pipeline,
        defaults.threshold,
        defaults.point_size,
        defaults.palette
    );

    println!("\nPalette Presets:");
    for (name, colors) in config.presets() {
        println!("  {name:<12} {}", colors.join(" "));
    }

    println!("\nCommands:");
    println!("  posterkit serve     Start the HTTP server");
    println!("  posterkit process   Process an image file into a poster");
    println!("  posterkit palette   Derive and print a palette");
    println!("\nRun 'posterkit --help' for more details.");
}
