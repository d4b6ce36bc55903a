use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dispatch::RecencySignal;
use crate::error::LauncherError;
use crate::providers::ProviderKind;

pub const DEFAULT_MAX_ENTRIES: usize = 15;
pub const DEFAULT_ZED_CHANNEL: &str = "0-stable";
pub const CONFIG_FILE_RELATIVE: &str = "rofi-recent/config.toml";

const HOME_ENV: &str = "HOME";
const DATA_HOME_ENV: &str = "XDG_DATA_HOME";
const CONFIG_HOME_ENV: &str = "XDG_CONFIG_HOME";
const RETV_ENV: &str = "ROFI_RETV";
const PROVIDER_ENV: &str = "ROFI_RECENT_PROVIDER";
const MAX_ENTRIES_ENV: &str = "ROFI_RECENT_MAX_ENTRIES";
const EXECUTABLE_ENV: &str = "ROFI_RECENT_EXECUTABLE";
const ZED_DB_ENV: &str = "ZED_DB_PATH";
const ZED_CHANNEL_ENV: &str = "ZED_CHANNEL";
const VSCODE_DB_ENV: &str = "VSCODE_STATE_DB";

const MAX_ENTRIES_MIN: i64 = 1;
const MAX_ENTRIES_MAX: i64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub home: String,
    pub data_home: PathBuf,
    pub config_home: PathBuf,
    pub recency_signal: RecencySignal,
    pub provider: ProviderKind,
    pub max_entries: usize,
    pub executable: Option<String>,
    pub zed_db_path: Option<PathBuf>,
    pub zed_channel: String,
    pub vscode_state_db: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn from_env(config_file: Option<&Path>) -> Result<Self, LauncherError> {
        Self::from_pairs(std::env::vars(), config_file)
    }

    /// Build from explicit key/value pairs. An explicit `config_file` must
    /// exist; the default location is optional.
    pub fn from_pairs<I, K, V>(pairs: I, config_file: Option<&Path>) -> Result<Self, LauncherError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env_map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let lookup = |key: &str| {
            env_map
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let home = lookup(HOME_ENV).unwrap_or_default().to_string();
        let config_home = lookup(CONFIG_HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(&home).join(".config"));
        let data_home = lookup(DATA_HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(&home).join(".local/share"));

        let file = match config_file {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::load_optional(&config_home.join(CONFIG_FILE_RELATIVE))?,
        };

        let provider = match lookup(PROVIDER_ENV).or(file.provider.as_deref()) {
            Some(raw) => ProviderKind::parse(raw)?,
            None => ProviderKind::default(),
        };

        let max_entries = match lookup(MAX_ENTRIES_ENV) {
            Some(raw) => parse_max_entries(raw, MAX_ENTRIES_ENV)?,
            None => file
                .max_entries
                .map(clamp_file_max_entries)
                .unwrap_or(DEFAULT_MAX_ENTRIES),
        };

        let expand = |raw: &str| PathBuf::from(expand_home_tokens(raw, &home));

        Ok(Self {
            recency_signal: RecencySignal::from_raw(env_map.get(RETV_ENV).map(String::as_str)),
            provider,
            max_entries,
            executable: lookup(EXECUTABLE_ENV)
                .map(str::to_string)
                .or(file.executable.clone()),
            zed_db_path: lookup(ZED_DB_ENV)
                .or(file.zed.db_path.as_deref())
                .map(expand),
            zed_channel: lookup(ZED_CHANNEL_ENV)
                .or(file.zed.channel.as_deref())
                .unwrap_or(DEFAULT_ZED_CHANNEL)
                .to_string(),
            vscode_state_db: lookup(VSCODE_DB_ENV)
                .or(file.vscode.state_db.as_deref())
                .map(expand),
            home,
            data_home,
            config_home,
        })
    }
}

/// Optional `config.toml`; environment variables win over it.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub provider: Option<String>,
    pub max_entries: Option<usize>,
    pub executable: Option<String>,
    pub zed: ZedSection,
    pub vscode: VsCodeSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ZedSection {
    pub db_path: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct VsCodeSection {
    pub state_db: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, LauncherError> {
        let content = fs::read_to_string(path).map_err(|source| LauncherError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn load_optional(path: &Path) -> Result<Self, LauncherError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, LauncherError> {
        toml::from_str(content).map_err(|error| LauncherError::ConfigParse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }
}

pub fn parse_max_entries(raw: &str, field: &'static str) -> Result<usize, LauncherError> {
    let parsed = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| LauncherError::InvalidCount {
            field,
            value: raw.to_string(),
        })?;
    Ok(clamp_max_entries(parsed))
}

fn clamp_max_entries(value: i64) -> usize {
    value.clamp(MAX_ENTRIES_MIN, MAX_ENTRIES_MAX) as usize
}

fn clamp_file_max_entries(value: usize) -> usize {
    clamp_max_entries(i64::try_from(value).unwrap_or(i64::MAX))
}

pub fn expand_home_tokens(raw: &str, home: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut expanded = trimmed.replace("$HOME", home);

    if expanded == "~" {
        expanded = home.to_string();
    } else if let Some(rest) = expanded.strip_prefix("~/") {
        expanded = format!("{home}/{rest}");
    }

    expanded
}

/// Rewrite a leading home directory to `~`. Paths outside home, and
/// siblings such as `/home/alice2` for home `/home/alice`, are unchanged.
pub fn collapse_home(path: &str, home: &str) -> String {
    let home = home.trim_end_matches('/');
    if home.is_empty() {
        return path.to_string();
    }

    match path.strip_prefix(home) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{rest}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> RuntimeConfig {
        RuntimeConfig::from_pairs(pairs.iter().copied(), None).expect("config")
    }

    #[test]
    fn defaults_follow_xdg_layout_under_home() {
        let config = config_from(&[("HOME", "/home/alice")]);

        assert_eq!(config.home, "/home/alice");
        assert_eq!(config.data_home, PathBuf::from("/home/alice/.local/share"));
        assert_eq!(config.config_home, PathBuf::from("/home/alice/.config"));
        assert_eq!(config.max_entries, DEFAULT_MAX_ENTRIES);
        assert_eq!(config.provider, ProviderKind::Zed);
        assert_eq!(config.recency_signal, RecencySignal::List);
        assert_eq!(config.zed_channel, DEFAULT_ZED_CHANNEL);
        assert_eq!(config.executable, None);
    }

    #[test]
    fn data_home_override_is_respected() {
        let config = config_from(&[
            ("HOME", "/home/alice"),
            ("XDG_DATA_HOME", "/data"),
            ("XDG_CONFIG_HOME", "/conf"),
        ]);
        assert_eq!(config.data_home, PathBuf::from("/data"));
        assert_eq!(config.config_home, PathBuf::from("/conf"));
    }

    #[test]
    fn max_entries_is_clamped() {
        let config = config_from(&[("ROFI_RECENT_MAX_ENTRIES", "0")]);
        assert_eq!(config.max_entries, 1);

        let config = config_from(&[("ROFI_RECENT_MAX_ENTRIES", "100000")]);
        assert_eq!(config.max_entries, 500);
    }

    #[test]
    fn oversized_file_max_entries_saturates_to_upper_bound() {
        assert_eq!(clamp_file_max_entries(usize::MAX), 500);
        assert_eq!(clamp_file_max_entries(0), 1);
        assert_eq!(clamp_file_max_entries(42), 42);
    }

    #[test]
    fn invalid_max_entries_is_user_error() {
        let err = RuntimeConfig::from_pairs([("ROFI_RECENT_MAX_ENTRIES", "lots")], None)
            .expect_err("non-numeric count must fail");
        assert!(err.is_user_error());
        assert!(err.to_string().contains("ROFI_RECENT_MAX_ENTRIES"));
    }

    #[test]
    fn unknown_provider_is_user_error() {
        let err = RuntimeConfig::from_pairs([("ROFI_RECENT_PROVIDER", "emacs")], None)
            .expect_err("unknown provider must fail");
        assert!(matches!(err, LauncherError::UnknownProvider(ref name) if name == "emacs"));
    }

    #[test]
    fn retv_is_decoded_once() {
        let config = config_from(&[("ROFI_RETV", "10")]);
        assert_eq!(config.recency_signal, RecencySignal::OpenAlternate);

        let config = config_from(&[("ROFI_RETV", "garbage")]);
        assert_eq!(config.recency_signal, RecencySignal::List);
    }

    #[test]
    fn store_overrides_expand_home_tokens() {
        let config = config_from(&[
            ("HOME", "/home/alice"),
            ("ZED_DB_PATH", "~/zed.sqlite"),
            ("VSCODE_STATE_DB", "$HOME/state.vscdb"),
        ]);
        assert_eq!(
            config.zed_db_path,
            Some(PathBuf::from("/home/alice/zed.sqlite"))
        );
        assert_eq!(
            config.vscode_state_db,
            Some(PathBuf::from("/home/alice/state.vscdb"))
        );
    }

    #[test]
    fn config_file_is_read_from_config_home() {
        let temp = tempdir().expect("create temp dir");
        let config_dir = temp.path().join("rofi-recent");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(
            config_dir.join("config.toml"),
            "provider = \"vscodium\"\nmax_entries = 30\nexecutable = \"codium-insiders\"\n\n[zed]\nchannel = \"0-preview\"\n",
        )
        .expect("write config");

        let config_home = temp.path().to_string_lossy().to_string();
        let config = config_from(&[
            ("HOME", "/home/alice"),
            ("XDG_CONFIG_HOME", config_home.as_str()),
        ]);

        assert_eq!(config.provider, ProviderKind::VsCodium);
        assert_eq!(config.max_entries, 30);
        assert_eq!(config.executable.as_deref(), Some("codium-insiders"));
        assert_eq!(config.zed_channel, "0-preview");
    }

    #[test]
    fn environment_wins_over_config_file() {
        let temp = tempdir().expect("create temp dir");
        let file = temp.path().join("custom.toml");
        fs::write(&file, "provider = \"cursor\"\nmax_entries = 30\n").expect("write config");

        let config = RuntimeConfig::from_pairs(
            [("ROFI_RECENT_PROVIDER", "zed"), ("ROFI_RECENT_MAX_ENTRIES", "5")],
            Some(&file),
        )
        .expect("config");

        assert_eq!(config.provider, ProviderKind::Zed);
        assert_eq!(config.max_entries, 5);
    }

    #[test]
    fn explicit_missing_config_file_fails() {
        let temp = tempdir().expect("create temp dir");
        let missing = temp.path().join("missing.toml");
        let err = RuntimeConfig::from_pairs(Vec::<(String, String)>::new(), Some(&missing))
            .expect_err("explicit config must exist");
        assert!(matches!(err, LauncherError::ConfigRead { .. }));
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let temp = tempdir().expect("create temp dir");
        let file = temp.path().join("config.toml");
        fs::write(&file, "max_entry = 3\n").expect("write config");

        let err = RuntimeConfig::from_pairs(Vec::<(String, String)>::new(), Some(&file))
            .expect_err("typo in key must fail");
        assert!(matches!(err, LauncherError::ConfigParse { .. }));
    }

    #[test]
    fn expands_home_tokens() {
        assert_eq!(
            expand_home_tokens("$HOME/.usage.log", "/home/tester"),
            "/home/tester/.usage.log"
        );
        assert_eq!(
            expand_home_tokens("~/projects", "/home/tester"),
            "/home/tester/projects"
        );
        assert_eq!(expand_home_tokens("~", "/home/tester"), "/home/tester");
    }

    #[test]
    fn collapse_home_rewrites_prefix_only() {
        assert_eq!(collapse_home("/home/alice/proj", "/home/alice"), "~/proj");
        assert_eq!(collapse_home("/home/alice", "/home/alice/"), "~");
        assert_eq!(collapse_home("/srv/proj", "/home/alice"), "/srv/proj");
        assert_eq!(
            collapse_home("/home/alice2/proj", "/home/alice"),
            "/home/alice2/proj"
        );
        assert_eq!(collapse_home("/home/alice/proj", ""), "/home/alice/proj");
    }
}
