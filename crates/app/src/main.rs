use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::api::HttpBackend;
use services::{
    AccountApi, AccountService, AuthContext, BackendConfig, Clock, ProfileService, QuizApi,
    QuizSessionService, SharedQuizService,
};
use storage::repository::Storage;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt as log_fmt};
use ui::{App, UiApp, build_app_context};
use url::Url;

const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
const DEFAULT_SHARE_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
    InvalidDbUrl { raw: String },
    InvalidOrigin { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidOrigin { raw } => write!(f, "invalid --origin value: {raw}"),
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
    share_origin: String,
    auth: AuthContext,
    quiz_sessions: Arc<QuizSessionService>,
    shared_quizzes: Arc<SharedQuizService>,
    accounts: Arc<AccountService>,
    profiles: Arc<ProfileService>,
}

impl UiApp for DesktopApp {
    fn share_origin(&self) -> String {
        self.share_origin.clone()
    }

    fn auth(&self) -> AuthContext {
        self.auth.clone()
    }

    fn quiz_sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz_sessions)
    }

    fn shared_quizzes(&self) -> Arc<SharedQuizService> {
        Arc::clone(&self.shared_quizzes)
    }

    fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }
}

struct Args {
    backend: BackendConfig,
    db_url: String,
    share_origin: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <url>] [--db <sqlite_url>] [--origin <url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api {}", services::config::DEFAULT_API_BASE_URL);
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --origin {DEFAULT_SHARE_ORIGIN}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_BASE_URL, QUIZ_DB_URL, QUIZ_SHARE_ORIGIN, RUST_LOG");
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_origin(raw: String) -> Result<String, ArgsError> {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(raw.trim().trim_end_matches('/').to_string())
        }
        _ => Err(ArgsError::InvalidOrigin { raw }),
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut backend = BackendConfig::from_env().map_err(|_| ArgsError::InvalidApiUrl {
            raw: env_or("QUIZ_API_BASE_URL", ""),
        })?;
        let mut db_url = normalize_sqlite_url(env_or("QUIZ_DB_URL", DEFAULT_DB_URL));
        let mut share_origin = parse_origin(env_or("QUIZ_SHARE_ORIGIN", DEFAULT_SHARE_ORIGIN))?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    backend = BackendConfig::new(&value)
                        .map_err(|_| ArgsError::InvalidApiUrl { raw: value.clone() })?;
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--origin" => {
                    share_origin = parse_origin(require_value(args, "--origin")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            backend,
            db_url,
            share_origin,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
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
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(log_fmt::layer())
        .with(filter)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_logging();

    // The credential store is the only local state; everything else lives on the backend.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let clock = Clock::default_clock();
    let auth = AuthContext::load(storage.credentials.clone(), clock).await?;
    info!(
        api = %parsed.backend.base_url(),
        signed_in = auth.is_authenticated(),
        "starting quiz app"
    );

    let backend = Arc::new(HttpBackend::new(parsed.backend)?);
    let quiz_api: Arc<dyn QuizApi> = backend.clone();
    let account_api: Arc<dyn AccountApi> = backend;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        share_origin: parsed.share_origin,
        auth: auth.clone(),
        quiz_sessions: Arc::new(QuizSessionService::new(Arc::clone(&quiz_api), auth.clone())),
        shared_quizzes: Arc::new(SharedQuizService::new(quiz_api, auth.clone())),
        accounts: Arc::new(AccountService::new(Arc::clone(&account_api), auth.clone())),
        profiles: Arc::new(ProfileService::new(account_api, auth)),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("IntelliQuiz")
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
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
