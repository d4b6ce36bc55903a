//! Read-only access to another application's SQLite history database.
//!
//! The owning editor may be running and writing (usually in WAL mode), so
//! connections never take write locks and wait briefly on busy readers.

use std::path::Path;
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::error::LauncherError;

pub const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

pub fn open_read_only(path: &Path) -> Result<Connection, LauncherError> {
    if !path.is_file() {
        return Err(LauncherError::StoreMissing(path.to_path_buf()));
    }

    let open_error = |source| LauncherError::StoreOpen {
        path: path.to_path_buf(),
        source,
    };

    let connection = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(open_error)?;
    connection.busy_timeout(BUSY_TIMEOUT).map_err(open_error)?;
    connection
        .pragma_update(None, "query_only", true)
        .map_err(open_error)?;

    Ok(connection)
}

/// Text or blob column as lossy UTF-8; other types read as absent.
pub fn text_or_blob(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        ValueRef::Integer(number) => Some(number.to_string()),
        ValueRef::Null | ValueRef::Real(_) => None,
    }
}
