mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelver_core::{
    check_track_count, load_config, metrics, validate_config, Decision, Matcher, Release,
    SanitizedConfig, TagSet,
};

use report::Report;

/// Exit status when the match needs a human decision.
const EXIT_REVIEW: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "shelver")]
#[command(about = "Score local tags against a catalogue release and plan file destinations")]
#[command(version)]
struct Args {
    /// Catalogue release, as JSON
    release: PathBuf,

    /// Tags of the local files in track order, as a JSON array
    tags: PathBuf,

    /// Configuration file
    #[arg(short, long, default_value = "config.toml", env = "SHELVER_CONFIG")]
    config: PathBuf,

    /// Extension of the files being placed
    #[arg(long, default_value = ".flac")]
    ext: String,

    /// Accept the release whatever the score
    #[arg(long)]
    force: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long, env = "SHELVER_LOG_JSON")]
    log_json: bool,

    /// Print collected metrics in Prometheus text format after the report
    #[arg(long)]
    metrics: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.log_json);

    match run(&args) {
        Ok(Decision::Accept) => {}
        Ok(Decision::Review) => std::process::exit(EXIT_REVIEW),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries the report.
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(args: &Args) -> Result<Decision> {
    // Load configuration
    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        path_format = %sanitized.path_format.source,
        root = %sanitized.path_format.root,
        score_threshold = sanitized.matching.score_threshold,
        "Configuration loaded successfully"
    );

    let release: Release = load_json(&args.release).context("Failed to load release")?;
    let tags: TagSet = load_json(&args.tags).context("Failed to load tags")?;

    if let Err(e) = check_track_count(&release, &tags) {
        warn!("{}; extra tracks are compared against empty values", e);
    }

    let matcher = Matcher::from(&config.matching);
    let result = if args.force {
        matcher.evaluate_forced(&release, &tags)
    } else {
        matcher.evaluate(&release, &tags)
    };

    let destinations = if result.is_accepted() {
        config
            .path_format
            .destinations(&release, &args.ext)
            .context("Failed to render destinations")?
    } else {
        Vec::new()
    };

    let report = Report {
        release_id: &release.id,
        release_title: &release.title,
        result: &result,
        destinations,
    };
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report")?
        );
    } else {
        print!("{}", report);
    }

    if args.metrics {
        print!("{}", encode_metrics()?);
    }

    Ok(result.decision)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {:?}", path))
}

fn encode_metrics() -> Result<String> {
    let registry = Registry::new();
    for metric in metrics::all_metrics() {
        registry
            .register(metric)
            .context("Failed to register metric")?;
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics are not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelver_core::testing::fixtures;
    use tempfile::TempDir;

    fn write_json<T: serde::Serialize>(dir: &TempDir, name: &str, value: &T) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    fn args(dir: &TempDir, config: &str, tags: &TagSet) -> Args {
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, config).unwrap();

        Args {
            release: write_json(dir, "release.json", &fixtures::hex_enduction_hour()),
            tags: write_json(dir, "tags.json", tags),
            config: config_path,
            ext: ".flac".to_string(),
            force: false,
            json: false,
            log_json: false,
            metrics: false,
        }
    }

    fn config_toml() -> String {
        format!("path_format = {:?}\n", fixtures::CANONICAL_PATH_FORMAT)
    }

    #[test]
    fn test_run_accepts_matching_tags() {
        let dir = TempDir::new().unwrap();
        let tags = fixtures::tags_for(&fixtures::hex_enduction_hour());
        let args = args(&dir, &config_toml(), &tags);
        assert_eq!(run(&args).unwrap(), Decision::Accept);
    }

    #[test]
    fn test_run_reviews_mismatch_unless_forced() {
        let dir = TempDir::new().unwrap();
        let release = fixtures::hex_enduction_hour();
        let mut files: Vec<_> = fixtures::tags_for(&release).iter().cloned().collect();
        files[0].label = "Rough Trade".to_string();
        let tags = TagSet::new(files);

        let mut args = args(&dir, &config_toml(), &tags);
        assert_eq!(run(&args).unwrap(), Decision::Review);

        args.force = true;
        assert_eq!(run(&args).unwrap(), Decision::Accept);
    }

    #[test]
    fn test_run_rejects_ambiguous_config() {
        let dir = TempDir::new().unwrap();
        let tags = fixtures::tags_for(&fixtures::hex_enduction_hour());
        let args = args(&dir, "path_format = \"/m/{{ .Release.Title }}\"\n", &tags);
        let err = run(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("Ambiguous path format"));
    }

    #[test]
    fn test_load_json_reports_path() {
        let err = load_json::<Release>(Path::new("/nonexistent/release.json")).unwrap_err();
        assert!(err.to_string().contains("release.json"));
    }

    #[test]
    fn test_encode_metrics() {
        let text = encode_metrics().unwrap();
        // Unlabelled counters are always gathered.
        assert!(text.contains("shelver_paths_rendered_total"));
    }
}
