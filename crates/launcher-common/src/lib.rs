//! Shared recent-entry launcher modules.
//!
//! - `entry` / `provider`: the entry model and the provider capability trait.
//! - `menu`: dedup, cap, sort and rofi row assembly.
//! - `dispatch` / `launch`: `ROFI_RETV` phases and detached editor launch.
//! - `config`: environment, config file and path helpers.
//! - `providers`: Zed and the VS Code family.
//! - `store` / `uri`: read-only SQLite access and path normalization.

pub mod config;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod icons;
pub mod launch;
pub mod menu;
pub mod provider;
pub mod providers;
pub mod store;
pub mod uri;

pub use config::{DEFAULT_MAX_ENTRIES, RuntimeConfig, collapse_home, expand_home_tokens};
pub use dispatch::{Outcome, RecencySignal, dispatch, launch_command};
pub use entry::{Entry, EntryKind};
pub use error::LauncherError;
pub use launch::{DetachedSpawner, DryRunSpawner, LaunchCommand, Spawner};
pub use menu::{NO_ENTRIES_MESSAGE, build_menu, default_menu_options};
pub use provider::{EntryComparator, LaunchConfig, LaunchMode, Provider};
pub use providers::{ProviderKind, build_provider};
