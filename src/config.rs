use crate::export::{parse_delimiter, ExportFormat};
use crate::model::{DEFAULT_CATEGORY, DEFAULT_COLUMN_WIDTH, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
use clap::{Parser, Subcommand};
use config::{Config as ConfigCrate, ConfigError as ConfigCrateError, Environment, File, Map, Source, Value};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_FILE_NAME: &str = "explainator.log";
const DEFAULT_WRITE_THROUGH: bool = true;
const DEFAULT_DEMO_ON_FIRST_RUN: bool = true;
const DEFAULT_BATCH_DELIMITER: &str = "tab";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Failed to determine the platform config/data directory")]
    DirectoryNotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Every field optional so that file and env layers only set what they name.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    default_category: Option<String>,
    default_column_width: Option<u32>,
    write_through: Option<bool>,
    demo_on_first_run: Option<bool>,
    batch_delimiter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub config_file: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_file: PathBuf,
    pub default_category: String,
    pub default_column_width: u32,
    /// Persist every mutation immediately.
    pub write_through: bool,
    pub demo_on_first_run: bool,
    pub batch_delimiter: String,
}

impl AppConfig {
    /// Defaults rooted at `data_dir`, used by tests and as the base layer.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            config_file: None,
            log_file: data_dir.join(DEFAULT_LOG_FILE_NAME),
            data_dir,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
            default_column_width: DEFAULT_COLUMN_WIDTH,
            write_through: DEFAULT_WRITE_THROUGH,
            demo_on_first_run: DEFAULT_DEMO_ON_FIRST_RUN,
            batch_delimiter: DEFAULT_BATCH_DELIMITER.to_string(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Column, section and box layout builder", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a custom configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the stored layout, categories, canvas, slides and projects
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub debug_config: bool,

    #[arg(long)]
    pub default_category: Option<String>,

    #[arg(long)]
    pub default_column_width: Option<u32>,

    #[arg(long)]
    pub write_through: Option<bool>,

    #[arg(long)]
    pub demo_on_first_run: Option<bool>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the terminal editor (default)
    Edit,
    /// Print the text outline of the stored layout
    Outline,
    /// Write the stored workspace as JSON, HTML or outline text
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Apply an exported JSON document to the stored workspace
    Import { file: PathBuf },
    /// Add boxes from a delimited text file, one per line
    BatchImport {
        /// 1-based column position
        #[arg(long)]
        column: usize,
        /// 1-based section position within the column
        #[arg(long)]
        section: usize,
        /// comma, semicolon, tab, pipe or a single character
        #[arg(long)]
        delimiter: Option<String>,
        /// Category for lines that do not name one
        #[arg(long)]
        category: Option<String>,
        file: PathBuf,
    },
    /// Clear the stored layout
    Reset {
        /// Restore the demo layout instead of an empty one
        #[arg(long)]
        demo: bool,
    },
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "explainator")
}

pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix("EXPLAINATOR").separator("__");
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_else(|_| Map::new());
    build_config_from_args(args, Some(env_map))
}

/// Layers args > overrides (env) > file > defaults.
pub fn build_config_from_args(
    args: &CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let dirs = project_dirs();
    let config_file = args
        .config
        .clone()
        .or_else(|| dirs.as_ref().map(|d| d.config_dir().join("config.toml")));

    let mut builder = ConfigCrate::builder();
    if let Some(ref path) = config_file {
        builder = builder.add_source(File::from(path.clone()).required(false));
    }
    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            builder = builder.set_override(&key, value)?;
        }
    }
    let loaded: FileConfig = builder.build()?.try_deserialize()?;

    let data_dir = match args.data_dir.clone().or(loaded.data_dir) {
        Some(dir) => dir,
        None => dirs
            .as_ref()
            .map(|d| d.data_dir().to_path_buf())
            .ok_or(ConfigError::DirectoryNotFound)?,
    };
    let defaults = AppConfig::with_data_dir(&data_dir);

    let config = AppConfig {
        config_file,
        log_file: args
            .log_file
            .clone()
            .or(loaded.log_file)
            .unwrap_or(defaults.log_file),
        log_level: args
            .log_level
            .clone()
            .or(loaded.log_level)
            .unwrap_or(defaults.log_level)
            .to_lowercase(),
        default_category: args
            .default_category
            .clone()
            .or(loaded.default_category)
            .unwrap_or(defaults.default_category),
        default_column_width: args
            .default_column_width
            .or(loaded.default_column_width)
            .unwrap_or(defaults.default_column_width),
        write_through: args
            .write_through
            .or(loaded.write_through)
            .unwrap_or(defaults.write_through),
        demo_on_first_run: args
            .demo_on_first_run
            .or(loaded.demo_on_first_run)
            .unwrap_or(defaults.demo_on_first_run),
        batch_delimiter: loaded
            .batch_delimiter
            .unwrap_or(defaults.batch_delimiter),
        data_dir,
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "log_level must be one of {}, got {}",
            LOG_LEVELS.join(", "),
            config.log_level
        )));
    }
    if !(MIN_COLUMN_WIDTH..=MAX_COLUMN_WIDTH).contains(&config.default_column_width) {
        return Err(ConfigError::ValidationError(format!(
            "default_column_width must be between {MIN_COLUMN_WIDTH} and {MAX_COLUMN_WIDTH}"
        )));
    }
    if config.default_category.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "default_category must not be empty".to_string(),
        ));
    }
    parse_delimiter(&config.batch_delimiter)
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::ValueKind;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn args(extra: &[&str]) -> CliArgs {
        let mut cmd = vec!["explainator", "--data-dir", "/tmp/explainator-test"];
        cmd.extend_from_slice(extra);
        CliArgs::try_parse_from(cmd).expect("Failed to parse test args")
    }

    fn string(value: &str) -> Value {
        Value::new(None, ValueKind::String(value.to_string()))
    }

    #[test]
    fn test_default_config() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("none.toml");
        let config = build_config_from_args(
            &args(&["--config", missing.to_str().unwrap()]),
            None,
        )
        .expect("Failed to load default config");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.default_category, "blue");
        assert_eq!(config.default_column_width, 400);
        assert!(config.write_through);
        assert!(config.demo_on_first_run);
        assert_eq!(config.batch_delimiter, "tab");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/explainator-test"));
        assert_eq!(
            config.log_file,
            PathBuf::from("/tmp/explainator-test/explainator.log")
        );
    }

    #[test]
    fn test_file_env_and_args_layering() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "log_level = \"debug\"\ndefault_category = \"red\"\ndefault_column_width = 300\nbatch_delimiter = \"comma\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let from_file = build_config_from_args(&args(&["--config", &path]), None).unwrap();
        assert_eq!(from_file.log_level, "debug");
        assert_eq!(from_file.default_category, "red");
        assert_eq!(from_file.batch_delimiter, "comma");

        let mut overrides = Map::new();
        overrides.insert("default_category".to_string(), string("green"));
        overrides.insert(
            "default_column_width".to_string(),
            Value::new(None, ValueKind::U64(500)),
        );
        let from_env =
            build_config_from_args(&args(&["--config", &path]), Some(overrides.clone())).unwrap();
        assert_eq!(from_env.default_category, "green");
        assert_eq!(from_env.default_column_width, 500);
        assert_eq!(from_env.log_level, "debug");

        let from_args = build_config_from_args(
            &args(&["--config", &path, "--default-category", "purple"]),
            Some(overrides),
        )
        .unwrap();
        assert_eq!(from_args.default_category, "purple");
        assert_eq!(from_args.default_column_width, 500);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("none.toml");
        let missing = missing.to_str().unwrap();
        let err = build_config_from_args(
            &args(&["--config", missing, "--default-column-width", "90"]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = build_config_from_args(&args(&["--config", missing, "--log-level", "loud"]), None)
            .unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn test_subcommands_parse() {
        let parsed = args(&["export", "--format", "html", "-o", "out.html"]);
        assert_eq!(
            parsed.command,
            Some(Command::Export {
                format: ExportFormat::Html,
                output: Some(PathBuf::from("out.html")),
            })
        );
        let parsed = args(&[
            "batch-import",
            "--column",
            "1",
            "--section",
            "2",
            "--delimiter",
            "pipe",
            "boxes.txt",
        ]);
        assert!(matches!(
            parsed.command,
            Some(Command::BatchImport { column: 1, section: 2, .. })
        ));
        assert_eq!(args(&["reset", "--demo"]).command, Some(Command::Reset { demo: true }));
        assert!(args(&[]).command.is_none());
    }
}
