use clap::Parser;
use imagewithin::{
    FileSearch, RequestContext, SearchConfig, SearchOutcome, SearchResult, Searcher,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find a template image inside a base image (JSON config driven)"
)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Image to search in; overrides `image_path`.
    #[arg(long, value_name = "FILE")]
    image: Option<PathBuf>,
    /// Image to search for; overrides `template_path`.
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,
    /// Where to write the annotated image; overrides `output_path`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// 1-based match index; overrides `index`.
    #[arg(short, long)]
    index: Option<usize>,
    /// Acceptance threshold in (0, 1]; overrides the config and IMG_MATCH_THRESHOLD.
    #[arg(short, long)]
    threshold: Option<f32>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SearchConfigJson {
    threshold: f32,
    scales: Vec<f32>,
    max_matches_after_fallback: Option<usize>,
    suppression_radius: Option<usize>,
}

impl Default for SearchConfigJson {
    fn default() -> Self {
        let cfg = SearchConfig::default();
        Self {
            threshold: cfg.threshold,
            scales: cfg.scales,
            max_matches_after_fallback: cfg.max_matches_after_fallback,
            suppression_radius: cfg.suppression_radius,
        }
    }
}

impl From<SearchConfigJson> for SearchConfig {
    fn from(value: SearchConfigJson) -> Self {
        Self {
            threshold: value.threshold,
            scales: value.scales,
            max_matches_after_fallback: value.max_matches_after_fallback,
            suppression_radius: value.suppression_radius,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    image_path: String,
    template_path: String,
    output_path: Option<String>,
    index: usize,
    workspace_dir: Option<String>,
    keep_intermediates: bool,
    search: SearchConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            template_path: String::new(),
            output_path: None,
            index: 1,
            workspace_dir: None,
            keep_intermediates: false,
            search: SearchConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResultRecord {
    request_id: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    intermediates_dir: Option<String>,
    message: String,
}

impl ResultRecord {
    fn new(request_id: &str, outcome: &SearchOutcome, output: &Path) -> Self {
        let result = &outcome.result;
        let status = match result {
            SearchResult::Resolved(_) => "resolved",
            SearchResult::NoMatch => "no_match",
            SearchResult::IndexOutOfRange { .. } => "index_out_of_range",
            SearchResult::ImagesMissing => "images_missing",
        };
        let res = result.resolution();
        Self {
            request_id: request_id.to_owned(),
            status,
            x: res.map(|r| r.x),
            y: res.map(|r| r.y),
            accuracy: res.map(|r| r.accuracy),
            scale: res.map(|r| r.scale),
            output_path: res.map(|_| output.display().to_string()),
            intermediates_dir: outcome
                .intermediates
                .as_ref()
                .map(|dir| dir.display().to_string()),
            message: result.message(),
        }
    }
}

/// `<dir>/<stem>.found.png` next to the base image.
fn default_output_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    image.with_file_name(format!("{stem}.found.png"))
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("imagewithin=info".parse()?),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(ExitCode::SUCCESS);
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(ExitCode::SUCCESS);
    }

    let config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    let image_path = cli
        .image
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.image_path));
    let template_path = cli
        .template
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.template_path));
    if image_path.as_os_str().is_empty() || template_path.as_os_str().is_empty() {
        return Err(
            "image and template paths must be set in the config or on the command line".into(),
        );
    }
    let output_path = cli
        .output
        .clone()
        .or_else(|| config.output_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| default_output_path(&image_path));

    let index = cli.index.unwrap_or(config.index);
    if index == 0 {
        return Err("index is 1-based and must be at least 1".into());
    }

    let env_threshold = std::env::var(imagewithin::search::THRESHOLD_ENV).ok();
    let mut search_cfg =
        SearchConfig::from(config.search).with_threshold_override(env_threshold.as_deref())?;
    if let Some(threshold) = cli.threshold {
        search_cfg.threshold = threshold;
    }
    let searcher = Searcher::new(search_cfg)?;

    let ctx = RequestContext::new(Uuid::new_v4().to_string());
    let workspace_root = config.workspace_dir.as_ref().map(PathBuf::from);
    let request = FileSearch {
        base: &image_path,
        template: &template_path,
        index: index - 1,
        output: &output_path,
        workspace_root: workspace_root.as_deref(),
        keep_intermediates: config.keep_intermediates,
    };

    let outcome = searcher.search_files(&request, &ctx)?;
    if outcome.result.is_failure() {
        tracing::warn!(
            request_id = ctx.request_id(),
            attempts = outcome.report.attempts().len(),
            "{}",
            outcome.result.message()
        );
    }

    let record = ResultRecord::new(ctx.request_id(), &outcome, &output_path);
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(if outcome.result.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[cfg(test)]
mod tests {
    use super::{default_output_path, Config, ResultRecord};
    use imagewithin::{SearchConfig, SearchOutcome, SearchReport, SearchResult};
    use std::path::{Path, PathBuf};

    #[test]
    fn example_config_parses() {
        let config: Config = serde_json::from_str(super::EXAMPLE_JSON).unwrap();
        assert_eq!(config.index, 1);
        let cfg = SearchConfig::from(config.search);
        assert_eq!(cfg, SearchConfig::default());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"image_path": "a.png", "template_path": "b.png"}"#).unwrap();
        assert_eq!(config.index, 1);
        assert!(!config.keep_intermediates);
        assert_eq!(SearchConfig::from(config.search), SearchConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{"max_results": 3}"#).is_err());
    }

    #[test]
    fn default_output_sits_next_to_base() {
        assert_eq!(
            default_output_path(Path::new("shots/screen.jpg")),
            PathBuf::from("shots/screen.found.png")
        );
    }

    #[test]
    fn record_omits_coordinates_when_unresolved() {
        let outcome = SearchOutcome {
            result: SearchResult::IndexOutOfRange {
                index: 3,
                available: 1,
            },
            report: SearchReport::default(),
            intermediates: None,
        };
        let record = ResultRecord::new("req", &outcome, Path::new("out.png"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "index_out_of_range");
        assert_eq!(
            json["message"],
            "Matching element found but Index out of range"
        );
        assert!(json.get("x").is_none());
        assert!(json.get("output_path").is_none());
    }
}
