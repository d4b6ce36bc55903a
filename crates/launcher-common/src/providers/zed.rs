//! Recent workspaces and files from Zed's `db.sqlite`.
//!
//! Workspaces carry either local paths, an ssh project or a dev-server
//! project. Open editors are stored per workspace and supply the recent
//! files list.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use tracing::{debug, warn};

use crate::config::RuntimeConfig;
use crate::entry::{Entry, EntryKind};
use crate::error::LauncherError;
use crate::provider::{LaunchConfig, LaunchMode, Provider};
use crate::store::{self, text_or_blob};
use crate::uri::{is_vcs_internal, normalize_path};

pub const DEFAULT_EXECUTABLE: &str = "zed";
const NEW_WINDOW_FLAG: &str = "--new";
const MULTI_ROOT_SEPARATOR: &str = "\t";
const ZED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const MAX_ENCODED_PATHS: u64 = 4096;

const WORKSPACES_QUERY: &str = "
    SELECT w.workspace_id, w.local_paths, w.timestamp,
           sp.host, sp.port, sp.user, sp.paths,
           dsp.path, dsp.dev_server_name
    FROM workspaces w
    LEFT JOIN ssh_projects sp ON sp.id = w.ssh_project_id
    LEFT JOIN dev_server_projects dsp ON dsp.id = w.dev_server_project_id
    ORDER BY w.timestamp DESC";

const LOCAL_WORKSPACES_QUERY: &str = "
    SELECT workspace_id, local_paths, timestamp
    FROM workspaces
    ORDER BY timestamp DESC";

const FILES_QUERY: &str = "
    SELECT e.path, w.timestamp, w.workspace_id
    FROM editors e
    JOIN workspaces w ON w.workspace_id = e.workspace_id
    WHERE e.path IS NOT NULL
    ORDER BY w.timestamp DESC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZedProvider {
    db_path: PathBuf,
    executable: String,
}

impl ZedProvider {
    pub fn new(db_path: impl Into<PathBuf>, executable: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            executable: executable.into(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        let db_path = config
            .zed_db_path
            .clone()
            .unwrap_or_else(|| default_db_path(&config.data_home, &config.zed_channel));
        let executable = config
            .executable
            .clone()
            .unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string());
        Self::new(db_path, executable)
    }
}

pub fn default_db_path(data_home: &Path, channel: &str) -> PathBuf {
    data_home
        .join("zed")
        .join("db")
        .join(channel)
        .join("db.sqlite")
}

impl Provider for ZedProvider {
    fn name(&self) -> &str {
        "Zed"
    }

    fn executable(&self) -> &str {
        &self.executable
    }

    fn recent_entries(&self) -> Result<Vec<Entry>, LauncherError> {
        let connection = store::open_read_only(&self.db_path)?;
        let mut entries = Vec::new();

        match query_workspaces(&connection) {
            Ok(workspaces) => entries.extend(workspaces),
            Err(error) => warn!(%error, "zed: skipping recent workspaces"),
        }
        match query_files(&connection) {
            Ok(files) => entries.extend(files),
            Err(error) => warn!(%error, "zed: skipping recent files"),
        }

        debug!(count = entries.len(), db = %self.db_path.display(), "zed entries loaded");
        Ok(entries)
    }

    fn launch_config(&self, mode: LaunchMode, selection: &str) -> Option<LaunchConfig> {
        let mut config = LaunchConfig::default();
        if mode == LaunchMode::NewWindow {
            config = config.with_prepend_arg(NEW_WINDOW_FLAG);
        }
        if selection.contains(MULTI_ROOT_SEPARATOR) {
            config = config.with_target(
                selection
                    .split(MULTI_ROOT_SEPARATOR)
                    .filter(|path| !path.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
        Some(config)
    }
}

/// Raw `workspaces` row joined with its remote project, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceRow {
    pub workspace_id: Option<String>,
    pub local_paths: Vec<String>,
    pub timestamp: Option<String>,
    pub ssh_host: Option<String>,
    pub ssh_port: Option<String>,
    pub ssh_user: Option<String>,
    pub ssh_paths: Option<String>,
    pub dev_server_path: Option<String>,
    pub dev_server_name: Option<String>,
}

/// Remote-project tables come and go between Zed releases; without them
/// the local workspaces are still read.
fn query_workspaces(connection: &Connection) -> Result<Vec<Entry>, LauncherError> {
    match read_workspaces(connection, WORKSPACES_QUERY, read_workspace_row) {
        Ok(entries) => Ok(entries),
        Err(error) => {
            warn!(%error, "zed: remote projects unavailable, reading local workspaces only");
            read_workspaces(connection, LOCAL_WORKSPACES_QUERY, read_local_workspace_row)
        }
    }
}

fn read_workspaces(
    connection: &Connection,
    query: &str,
    read_row: fn(&Row<'_>) -> rusqlite::Result<WorkspaceRow>,
) -> Result<Vec<Entry>, LauncherError> {
    let mut statement = connection
        .prepare(query)
        .map_err(LauncherError::query("zed workspaces"))?;
    let rows = statement
        .query_map([], read_row)
        .map_err(LauncherError::query("zed workspaces"))?;

    let mut entries = Vec::new();
    for row in rows {
        match row {
            Ok(row) => entries.extend(workspace_entry(&row)),
            Err(error) => debug!(%error, "zed: unreadable workspace row"),
        }
    }
    Ok(entries)
}

fn read_workspace_row(row: &Row<'_>) -> rusqlite::Result<WorkspaceRow> {
    Ok(WorkspaceRow {
        workspace_id: column(row, 0)?,
        local_paths: decode_path_list(row.get_ref(1)?),
        timestamp: column(row, 2)?,
        ssh_host: column(row, 3)?,
        ssh_port: column(row, 4)?,
        ssh_user: column(row, 5)?,
        ssh_paths: column(row, 6)?,
        dev_server_path: column(row, 7)?,
        dev_server_name: column(row, 8)?,
    })
}

fn read_local_workspace_row(row: &Row<'_>) -> rusqlite::Result<WorkspaceRow> {
    Ok(WorkspaceRow {
        workspace_id: column(row, 0)?,
        local_paths: decode_path_list(row.get_ref(1)?),
        timestamp: column(row, 2)?,
        ..WorkspaceRow::default()
    })
}

fn query_files(connection: &Connection) -> Result<Vec<Entry>, LauncherError> {
    let mut statement = connection
        .prepare(FILES_QUERY)
        .map_err(LauncherError::query("zed files"))?;
    let rows = statement
        .query_map([], |row| {
            Ok((column(row, 0)?, column(row, 1)?, column(row, 2)?))
        })
        .map_err(LauncherError::query("zed files"))?;

    let mut entries = Vec::new();
    for row in rows {
        let (path, timestamp, workspace_id) = match row {
            Ok(values) => values,
            Err(error) => {
                debug!(%error, "zed: unreadable editor row");
                continue;
            }
        };
        let Some(path) = path.map(|raw| normalize_path(&raw)) else {
            continue;
        };
        if is_vcs_internal(&path) {
            continue;
        }
        let Some(mut entry) = Entry::new(EntryKind::File, path) else {
            continue;
        };
        if let Some(timestamp) = timestamp {
            entry = entry.with_timestamp(normalize_timestamp(&timestamp));
        }
        if let Some(workspace_id) = workspace_id {
            entry = entry.with_workspace_id(workspace_id);
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<String>> {
    Ok(text_or_blob(row.get_ref(index)?).filter(|value| !value.trim().is_empty()))
}

/// Classify one workspace: ssh project, then dev-server project, then
/// local folder(s).
pub fn workspace_entry(row: &WorkspaceRow) -> Option<Entry> {
    let entry = if let Some(host) = &row.ssh_host {
        ssh_entry(row, host)?
    } else if row.dev_server_name.is_some() || row.dev_server_path.is_some() {
        dev_server_entry(row)?
    } else {
        local_entry(&row.local_paths)?
    };

    let entry = match &row.timestamp {
        Some(timestamp) => entry.with_timestamp(normalize_timestamp(timestamp)),
        None => entry,
    };
    Some(match &row.workspace_id {
        Some(id) => entry.with_workspace_id(id.clone()),
        None => entry,
    })
}

fn ssh_entry(row: &WorkspaceRow, host: &str) -> Option<Entry> {
    let path = row
        .ssh_paths
        .as_deref()
        .and_then(first_remote_path)
        .unwrap_or_else(|| "/".to_string());
    let path_part = if path.starts_with('/') {
        path.clone()
    } else {
        format!("/{path}")
    };

    let user_part = row
        .ssh_user
        .as_deref()
        .map(|user| format!("{user}@"))
        .unwrap_or_default();
    let port_part = row
        .ssh_port
        .as_deref()
        .map(|port| format!(":{port}"))
        .unwrap_or_default();

    let identity = format!("ssh://{user_part}{host}{port_part}{path_part}");
    Entry::new(EntryKind::Ssh, identity)
        .map(|entry| entry.with_display_name(format!("{user_part}{host}:{path}")))
}

/// `ssh_projects.paths` is a JSON array in current Zed, a bare path before.
fn first_remote_path(raw: &str) -> Option<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(paths) => paths.into_iter().find(|path| !path.trim().is_empty()),
        Err(_) => Some(raw.trim().to_string()).filter(|path| !path.is_empty()),
    }
}

fn dev_server_entry(row: &WorkspaceRow) -> Option<Entry> {
    let name = row.dev_server_name.as_deref().unwrap_or("dev-server");
    let path = row.dev_server_path.as_deref().unwrap_or("/");
    Entry::new(EntryKind::DevServer, format!("{name}:{path}"))
        .map(|entry| entry.with_display_name(format!("{name}: {path}")))
}

fn local_entry(paths: &[String]) -> Option<Entry> {
    match paths {
        [] => None,
        [single] => Entry::new(EntryKind::Folder, single.as_str()),
        many => {
            let identity = many.join(MULTI_ROOT_SEPARATOR);
            let label = many
                .iter()
                .map(|path| {
                    path.rsplit('/')
                        .find(|part| !part.is_empty())
                        .unwrap_or(path.as_str())
                })
                .collect::<Vec<_>>()
                .join(", ");
            Entry::new(EntryKind::Workspace, identity)
                .map(|entry| entry.with_display_name(label))
        }
    }
}

/// `local_paths` is a bincode `Vec<PathBuf>` blob in older databases and
/// newline-separated text in newer ones.
pub fn decode_path_list(value: ValueRef<'_>) -> Vec<String> {
    let raw_text = match value {
        ValueRef::Blob(bytes) => {
            if let Some(paths) = decode_bincode_paths(bytes) {
                return clean_paths(paths);
            }
            String::from_utf8_lossy(bytes).into_owned()
        }
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Null | ValueRef::Integer(_) | ValueRef::Real(_) => return Vec::new(),
    };

    clean_paths(raw_text.lines().map(str::to_string).collect())
}

fn clean_paths(paths: Vec<String>) -> Vec<String> {
    paths
        .iter()
        .map(|path| normalize_path(path))
        .filter(|path| !path.is_empty())
        .collect()
}

fn decode_bincode_paths(bytes: &[u8]) -> Option<Vec<String>> {
    let mut cursor = bytes;
    let count = read_u64_le(&mut cursor)?;
    if count == 0 || count > MAX_ENCODED_PATHS {
        return None;
    }

    let mut paths = Vec::new();
    for _ in 0..count {
        let length = usize::try_from(read_u64_le(&mut cursor)?).ok()?;
        if length > cursor.len() {
            return None;
        }
        let (path, rest) = cursor.split_at(length);
        paths.push(String::from_utf8(path.to_vec()).ok()?);
        cursor = rest;
    }

    cursor.is_empty().then_some(paths)
}

fn read_u64_le(cursor: &mut &[u8]) -> Option<u64> {
    let (head, rest) = cursor.split_first_chunk::<8>()?;
    *cursor = rest;
    Some(u64::from_le_bytes(*head))
}

/// Zed stores `CURRENT_TIMESTAMP` text; ISO form keeps string order
/// chronological next to other providers.
pub fn normalize_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, ZED_TIMESTAMP_FORMAT)
        .map(|value| value.format(ISO_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|_| trimmed.to_string())
}
