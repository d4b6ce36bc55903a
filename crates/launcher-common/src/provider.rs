use std::cmp::Ordering;

use rofi_core::MenuOption;

use crate::entry::Entry;
use crate::error::LauncherError;

pub type EntryComparator = fn(&Entry, &Entry) -> Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Default,
    NewWindow,
}

/// Provider-shaped launch arguments.
///
/// The final argv is `prepend_args ++ target ++ args ++ append_args`, where
/// `target` falls back to the selected identity when left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchConfig {
    pub command: Option<String>,
    pub prepend_args: Vec<String>,
    pub target: Option<Vec<String>>,
    pub args: Vec<String>,
    pub append_args: Vec<String>,
}

impl LaunchConfig {
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_prepend_arg(mut self, arg: impl Into<String>) -> Self {
        self.prepend_args.push(arg.into());
        self
    }

    pub fn with_target(mut self, target: Vec<String>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_append_arg(mut self, arg: impl Into<String>) -> Self {
        self.append_args.push(arg.into());
        self
    }
}

/// Source of recent entries for one editor.
///
/// The hooks returning `Option` are capabilities: `None` means the provider
/// does not implement them and the framework default applies.
pub trait Provider {
    /// Human name used in the menu prompt.
    fn name(&self) -> &str;

    /// Editor binary launched on selection.
    fn executable(&self) -> &str;

    /// Recent entries in recency order. Implementations absorb partial
    /// failures themselves; an `Err` here means nothing could be read.
    fn recent_entries(&self) -> Result<Vec<Entry>, LauncherError>;

    fn file_icon(&self, _extension: &str) -> Option<String> {
        None
    }

    fn compare_entries(&self) -> Option<EntryComparator> {
        None
    }

    fn menu_options(&self) -> Option<Vec<MenuOption>> {
        None
    }

    fn launch_config(&self, _mode: LaunchMode, _selection: &str) -> Option<LaunchConfig> {
        None
    }
}
