use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use launcher_common::config::parse_max_entries;
use launcher_common::{
    DetachedSpawner, DryRunSpawner, LauncherError, Outcome, ProviderKind, RuntimeConfig,
    Spawner, build_provider, dispatch,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ROFI_RECENT_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

const ROFI_USAGE: &str = "\
Register as a rofi script mode:
  rofi -show recent -modi \"recent:rofi-recent --provider zed\"

Open the selection in a new window with kb-custom-1:
  rofi -show recent -modi \"recent:rofi-recent --provider zed\" -kb-custom-1 \"Alt+Return\"

Rofi sets ROFI_RETV: 0 lists entries, 1 opens the selection, 10 opens it in a new window.";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Recent editor projects and files as a rofi script mode",
    after_help = ROFI_USAGE
)]
struct Cli {
    /// Entry rofi passes back after a selection.
    selection: Option<String>,
    /// Editor whose history is listed.
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,
    /// Maximum rows to show (1-500).
    #[arg(long)]
    max_entries: Option<String>,
    /// Print the launch command instead of starting the editor.
    #[arg(long)]
    dry_run: bool,
    /// Config file (default: $XDG_CONFIG_HOME/rofi-recent/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderArg {
    Zed,
    Vscode,
    Vscodium,
    CodeOss,
    Cursor,
}

impl From<ProviderArg> for ProviderKind {
    fn from(value: ProviderArg) -> Self {
        match value {
            ProviderArg::Zed => ProviderKind::Zed,
            ProviderArg::Vscode => ProviderKind::VsCode,
            ProviderArg::Vscodium => ProviderKind::VsCodium,
            ProviderArg::CodeOss => ProviderKind::CodeOss,
            ProviderArg::Cursor => ProviderKind::Cursor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    User,
    Runtime,
}

#[derive(Debug)]
struct AppError {
    kind: ErrorKind,
    code: &'static str,
    message: String,
}

impl AppError {
    fn user(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::User,
            code,
            message: message.into(),
        }
    }

    fn runtime(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            code,
            message: message.into(),
        }
    }

    fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::User => 2,
            ErrorKind::Runtime => 1,
        }
    }
}

const ERROR_CODE_USER_INVALID_CONFIG: &str = "user.invalid_config";
const ERROR_CODE_USER_INVALID_MAX_ENTRIES: &str = "user.invalid_max_entries";
const ERROR_CODE_USER_UNKNOWN_PROVIDER: &str = "user.unknown_provider";
const ERROR_CODE_RUNTIME_STORE: &str = "runtime.store_failed";
const ERROR_CODE_RUNTIME_STDOUT: &str = "runtime.stdout_failed";

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = run(cli).and_then(|stdout| {
        write_stdout(io::stdout().lock(), &stdout)
            .map_err(|error| AppError::runtime(ERROR_CODE_RUNTIME_STDOUT, error.to_string()))
    });

    if let Err(err) = result {
        emit_error(&err);
        std::process::exit(err.exit_code());
    }
}

/// Logs go to stderr; stdout carries the rofi protocol only.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<String, AppError> {
    let config = RuntimeConfig::from_env(cli.config.as_deref()).map_err(map_launcher_error)?;
    run_with_config(cli, &config)
}

fn run_with_config(cli: Cli, config: &RuntimeConfig) -> Result<String, AppError> {
    let config = apply_cli_overrides(&cli, config)?;
    let provider = build_provider(&config);
    debug!(
        provider = provider.name(),
        signal = ?config.recency_signal,
        selection = cli.selection.as_deref(),
        "dispatching"
    );

    let spawner: &dyn Spawner = if cli.dry_run {
        &DryRunSpawner
    } else {
        &DetachedSpawner
    };

    match dispatch(provider.as_ref(), &config, cli.selection.as_deref(), spawner) {
        Outcome::Launched(command) if cli.dry_run => Ok(format!("{command}\n")),
        outcome => Ok(outcome.stdout().to_string()),
    }
}

fn apply_cli_overrides(cli: &Cli, config: &RuntimeConfig) -> Result<RuntimeConfig, AppError> {
    let mut config = config.clone();
    if let Some(provider) = cli.provider {
        config.provider = provider.into();
    }
    if let Some(raw) = &cli.max_entries {
        config.max_entries =
            parse_max_entries(raw, "--max-entries").map_err(map_launcher_error)?;
    }
    Ok(config)
}

/// rofi may close the pipe before reading everything; that is not a failure.
fn write_stdout(mut out: impl Write, text: &str) -> io::Result<()> {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn emit_error(error: &AppError) {
    eprintln!("error[{}]: {}", error.code, error.message);
}

fn map_launcher_error(error: LauncherError) -> AppError {
    let code = match &error {
        LauncherError::ConfigRead { .. } | LauncherError::ConfigParse { .. } => {
            ERROR_CODE_USER_INVALID_CONFIG
        }
        LauncherError::InvalidCount { .. } => ERROR_CODE_USER_INVALID_MAX_ENTRIES,
        LauncherError::UnknownProvider(_) => ERROR_CODE_USER_UNKNOWN_PROVIDER,
        LauncherError::StoreMissing(_)
        | LauncherError::StoreOpen { .. }
        | LauncherError::Query { .. }
        | LauncherError::Decode { .. } => ERROR_CODE_RUNTIME_STORE,
    };

    if error.is_user_error() {
        AppError::user(code, error.to_string())
    } else {
        AppError::runtime(code, error.to_string())
    }
}
