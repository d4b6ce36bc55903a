//! Recently opened list of VS Code and its forks.
//!
//! Every flavor keeps the list as JSON under one key of the `ItemTable` in
//! `User/globalStorage/state.vscdb`. Entries come newest first and carry no
//! timestamps.

use std::path::{Path, PathBuf};

use rusqlite::OptionalExtension;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::RuntimeConfig;
use crate::entry::{Entry, EntryKind};
use crate::error::LauncherError;
use crate::provider::{LaunchConfig, LaunchMode, Provider};
use crate::store::{self, text_or_blob};
use crate::uri::{is_vcs_internal, normalize_path, split_authority};

const RECENT_KEY: &str = "history.recentlyOpenedPathsList";
const RECENT_QUERY: &str = "SELECT value FROM ItemTable WHERE key = ?1";
const SSH_AUTHORITY_PREFIX: &str = "ssh-remote+";
const WORKSPACE_EXTENSION: &str = "code-workspace";
const WORKSPACE_FILE_ICON: &str = "folder-documents";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VsCodeFlavor {
    Code,
    Codium,
    Oss,
    Cursor,
}

impl VsCodeFlavor {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Code => "VS Code",
            Self::Codium => "VSCodium",
            Self::Oss => "Code - OSS",
            Self::Cursor => "Cursor",
        }
    }

    pub fn executable(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Codium => "codium",
            Self::Oss => "code-oss",
            Self::Cursor => "cursor",
        }
    }

    /// Directory under `$XDG_CONFIG_HOME` holding the flavor's user data.
    pub fn config_dir(self) -> &'static str {
        match self {
            Self::Code => "Code",
            Self::Codium => "VSCodium",
            Self::Oss => "Code - OSS",
            Self::Cursor => "Cursor",
        }
    }

    pub fn default_state_db(self, config_home: &Path) -> PathBuf {
        config_home
            .join(self.config_dir())
            .join("User")
            .join("globalStorage")
            .join("state.vscdb")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsCodeProvider {
    flavor: VsCodeFlavor,
    state_db: PathBuf,
    executable: String,
}

impl VsCodeProvider {
    pub fn new(flavor: VsCodeFlavor, state_db: impl Into<PathBuf>) -> Self {
        Self {
            flavor,
            state_db: state_db.into(),
            executable: flavor.executable().to_string(),
        }
    }

    pub fn from_config(flavor: VsCodeFlavor, config: &RuntimeConfig) -> Self {
        let state_db = config
            .vscode_state_db
            .clone()
            .unwrap_or_else(|| flavor.default_state_db(&config.config_home));
        let provider = Self::new(flavor, state_db);
        match &config.executable {
            Some(executable) => provider.with_executable(executable.clone()),
            None => provider,
        }
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    fn load_recent_list(&self) -> Result<Vec<RecentItem>, LauncherError> {
        let connection = store::open_read_only(&self.state_db)?;
        let raw = connection
            .query_row(RECENT_QUERY, [RECENT_KEY], |row| {
                row.get_ref(0).map(text_or_blob)
            })
            .optional()
            .map_err(LauncherError::query("vscode recently opened"))?
            .flatten();

        match raw {
            Some(raw) => parse_recent_list(&raw),
            None => Ok(Vec::new()),
        }
    }

    /// Remote files and workspace files open with `--file-uri`; only the
    /// stored list tells them apart from remote folders.
    fn is_remote_file(&self, uri: &str) -> bool {
        match self.load_recent_list() {
            Ok(items) => items
                .iter()
                .any(|item| {
                    item.folder_uri.as_deref() != Some(uri) && item.uri() == Some(uri)
                }),
            Err(error) => {
                debug!(%error, "vscode: assuming remote folder");
                false
            }
        }
    }
}

impl Provider for VsCodeProvider {
    fn name(&self) -> &str {
        self.flavor.display_name()
    }

    fn executable(&self) -> &str {
        &self.executable
    }

    fn recent_entries(&self) -> Result<Vec<Entry>, LauncherError> {
        let entries: Vec<Entry> = self
            .load_recent_list()?
            .into_iter()
            .filter_map(recent_entry)
            .collect();
        debug!(
            count = entries.len(),
            db = %self.state_db.display(),
            flavor = self.flavor.display_name(),
            "vscode entries loaded"
        );
        Ok(entries)
    }

    fn file_icon(&self, extension: &str) -> Option<String> {
        extension
            .eq_ignore_ascii_case(WORKSPACE_EXTENSION)
            .then(|| WORKSPACE_FILE_ICON.to_string())
    }

    fn launch_config(&self, mode: LaunchMode, selection: &str) -> Option<LaunchConfig> {
        let window_flag = match mode {
            LaunchMode::Default => "--reuse-window",
            LaunchMode::NewWindow => "--new-window",
        };
        let config = LaunchConfig::default().with_prepend_arg(window_flag);

        if !is_remote_uri(selection) {
            return Some(config);
        }
        let uri_flag = if self.is_remote_file(selection) {
            "--file-uri"
        } else {
            "--folder-uri"
        };
        Some(config.with_target(vec![uri_flag.to_string(), selection.to_string()]))
    }
}

#[derive(Debug, Default, Deserialize)]
struct RecentList {
    #[serde(default)]
    entries: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    #[serde(default)]
    pub folder_uri: Option<String>,
    #[serde(default)]
    pub file_uri: Option<String>,
    #[serde(default)]
    pub workspace: Option<WorkspaceRef>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub remote_authority: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRef {
    #[serde(default)]
    pub id: Option<String>,
    pub config_path: String,
}

impl RecentItem {
    fn uri(&self) -> Option<&str> {
        self.folder_uri
            .as_deref()
            .or(self.file_uri.as_deref())
            .or(self.workspace.as_ref().map(|workspace| workspace.config_path.as_str()))
    }

    fn local_kind(&self) -> EntryKind {
        if self.folder_uri.is_some() {
            EntryKind::Folder
        } else if self.file_uri.is_some() {
            EntryKind::File
        } else {
            EntryKind::Workspace
        }
    }
}

/// Items that do not deserialize are skipped one by one.
pub fn parse_recent_list(raw: &str) -> Result<Vec<RecentItem>, LauncherError> {
    let list: RecentList = serde_json::from_str(raw).map_err(|error| LauncherError::Decode {
        what: "recently opened list",
        message: error.to_string(),
    })?;

    Ok(list
        .entries
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RecentItem>(value) {
            Ok(item) => Some(item),
            Err(error) => {
                debug!(%error, "vscode: skipping malformed recent item");
                None
            }
        })
        .collect())
}

pub fn recent_entry(item: RecentItem) -> Option<Entry> {
    let uri = item.uri()?;
    let authority = item
        .remote_authority
        .clone()
        .or_else(|| {
            split_authority(uri)
                .filter(|_| is_remote_uri(uri))
                .map(|(host, _)| host)
        });

    let entry = match authority {
        Some(authority) => remote_entry(&item, uri, &authority)?,
        None => local_entry(&item, uri)?,
    };

    Some(match item.workspace.as_ref().and_then(|workspace| workspace.id.clone()) {
        Some(id) => entry.with_workspace_id(id),
        None => entry,
    })
}

fn local_entry(item: &RecentItem, uri: &str) -> Option<Entry> {
    let path = normalize_path(uri);
    let kind = item.local_kind();
    if kind == EntryKind::File && is_vcs_internal(&path) {
        return None;
    }
    Entry::new(kind, path)
}

fn remote_entry(item: &RecentItem, uri: &str, authority: &str) -> Option<Entry> {
    let kind = if authority.starts_with(SSH_AUTHORITY_PREFIX) {
        EntryKind::Ssh
    } else {
        EntryKind::DevServer
    };
    let label = match &item.label {
        Some(label) => label.clone(),
        None => {
            let path = split_authority(uri)
                .map(|(_, path)| path)
                .unwrap_or_else(|| uri.to_string());
            format!("[{authority}] {path}")
        }
    };
    Entry::new(kind, uri).map(|entry| entry.with_display_name(label))
}

fn is_remote_uri(uri: &str) -> bool {
    uri.contains("://")
        && !uri
            .get(..7)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file://"))
}
