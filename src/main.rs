use clap::Parser;
use hugo_postgen::config::{self, CONFIG_PATH_ENV, ConfigError};
use hugo_postgen::genai::GeminiClient;
use hugo_postgen::pacing::ThreadPacer;
use hugo_postgen::pipeline::Pipeline;
use hugo_postgen::{output, titles};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the generation service API key.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Parser)]
#[command(name = "hugo-postgen")]
#[command(version)]
#[command(about = "Generate Hugo page bundles from a CSV of blog post titles")]
#[command(long_about = "\
Generate Hugo page bundles from a CSV of blog post titles

Each title goes through five steps: article idea, outline and image plan,
article markdown, images, and finally a page bundle:

  content/posts/
  └── top-5-web-trends-20240305-140709/
      ├── index.md              # +++ TOML front matter +++ and the article
      ├── featured_image.jpg
      ├── og_image.jpg          # copy of the featured image for link previews
      ├── image_1.jpg
      └── image_2.jpg

Settings are read from config.toml in the working directory (or the file
named by HUGO_POSTGEN_CONFIG). The API key is read from GEMINI_API_KEY.
Log verbosity follows RUST_LOG (default: info).")]
struct Cli {
    /// CSV file with a header row and one title per row in the first column
    /// (default: paths.default_csv_path)
    csv_path: Option<PathBuf>,

    /// Directory the page bundles are written into
    /// (default: paths.hugo_posts_path)
    output_root: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let config_path = config::config_path(std::env::var(CONFIG_PATH_ENV).ok().as_deref());
    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(ConfigError::NotFound(path)) => {
            eprintln!("ERROR: config file not found: {}", path.display());
            eprintln!("Create it from this template:\n");
            eprint!("{}", config::stock_config_toml());
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("ERROR: could not load {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
    if api_key.trim().is_empty() {
        eprintln!("ERROR: {API_KEY_ENV} environment variable not found.");
        return ExitCode::FAILURE;
    }

    let client = match GeminiClient::new(&api_key, &config.service) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "could not initialize the generation service client");
            return ExitCode::FAILURE;
        }
    };
    info!(
        project = %config.service.project_id,
        location = %config.service.location,
        api_base = %config.service.api_base,
        "generation service initialized"
    );

    let csv_path = cli.csv_path.unwrap_or_else(|| config.paths.default_csv_path.clone());
    let output_root = cli
        .output_root
        .unwrap_or_else(|| config.paths.hugo_posts_path.clone());
    output::print_run_header(
        &csv_path,
        &output_root,
        config.api.interval_between_posts_seconds,
    );

    let titles = match titles::load_titles(&csv_path) {
        Ok(titles) => titles,
        Err(e) => {
            error!(path = %csv_path.display(), error = %e, "could not read titles");
            Vec::new()
        }
    };
    if titles.is_empty() {
        println!("No titles found. Exiting.");
        return ExitCode::FAILURE;
    }
    info!(count = titles.len(), path = %csv_path.display(), "titles loaded");

    let pacer = ThreadPacer;
    let pipeline = Pipeline::new(&config, &client, &client, &pacer).show_progress(true);
    let summary = pipeline.run(&titles, &output_root);
    output::print_summary(&summary, &output_root);

    ExitCode::SUCCESS
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
