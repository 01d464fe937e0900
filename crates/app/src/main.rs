use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use lingo_core::model::{ApiSettingsDraft, DEFAULT_TIMEOUT_SECS, LanguageCode};
use services::{AppServices, AppServicesError, Clock};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite:lingo.sqlite3";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTimeout { raw: String },
    InvalidLanguage { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout-secs value: {raw}"),
            ArgsError::InvalidLanguage { raw } => write!(f, "invalid --language value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: Arc<AppServices>,
    preferred_language: Option<LanguageCode>,
}

impl UiApp for DesktopApp {
    fn services(&self) -> Arc<AppServices> {
        Arc::clone(&self.services)
    }

    fn preferred_language(&self) -> Option<LanguageCode> {
        self.preferred_language.clone()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- --api-url <url> [--db <sqlite_url>] [--timeout-secs <n>] [--language <code>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --timeout-secs {DEFAULT_TIMEOUT_SECS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LINGO_API_URL, LINGO_DB_URL, LINGO_TIMEOUT_SECS, LINGO_LANGUAGE, RUST_LOG");
}

#[derive(Debug)]
struct Args {
    api: ApiSettingsDraft,
    db_url: String,
    language: Option<LanguageCode>,
}

#[derive(Debug)]
enum Invocation {
    Run(Args),
    Help,
}

impl Args {
    /// Environment first, then flags on top.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Invocation, ArgsError> {
        let mut api = ApiSettingsDraft {
            base_url: env("LINGO_API_URL"),
            timeout_secs: env("LINGO_TIMEOUT_SECS")
                .map(|raw| parse_timeout(&raw))
                .transpose()?,
        };
        let mut db_url = env("LINGO_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string());
        let mut language = env("LINGO_LANGUAGE")
            .map(|raw| parse_language(&raw))
            .transpose()?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => api.base_url = Some(require_value(args, "--api-url")?),
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--timeout-secs" => {
                    let value = require_value(args, "--timeout-secs")?;
                    api.timeout_secs = Some(parse_timeout(&value)?);
                }
                "--language" => {
                    let value = require_value(args, "--language")?;
                    language = Some(parse_language(&value)?);
                }
                "--help" | "-h" => return Ok(Invocation::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Invocation::Run(Self {
            api,
            db_url: normalize_sqlite_url(db_url),
            language,
        }))
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidTimeout {
            raw: raw.to_string(),
        })
}

fn parse_language(raw: &str) -> Result<LanguageCode, ArgsError> {
    LanguageCode::new(raw).map_err(|_| ArgsError::InvalidLanguage {
        raw: raw.to_string(),
    })
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_logging() {
    // RUST_LOG=services=debug for request traces.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv, |key| std::env::var(key).ok()) {
        Ok(Invocation::Run(args)) => args,
        Ok(Invocation::Help) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    info!(db = parsed.db_url.as_str(), "starting");
    let services = AppServices::new_sqlite(&parsed.db_url, parsed.api, Clock::default_clock())
        .await
        .map_err(|err| {
            if matches!(err, AppServicesError::Settings(_)) {
                print_usage();
            }
            err
        })?;
    info!(api = services.settings().base_url().as_str(), "lesson service configured");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services: Arc::new(services),
        preferred_language: parsed.language,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Multilingual Learning")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
