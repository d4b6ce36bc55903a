//! Phase selection from rofi's `ROFI_RETV`, and the launch step.
//!
//! Rofi runs the script once to list rows and again, as a fresh process,
//! after a selection. The return code tells each process which phase it is.

use tracing::{debug, warn};

use crate::config::RuntimeConfig;
use crate::launch::{LaunchCommand, Spawner};
use crate::menu::build_menu;
use crate::provider::{LaunchConfig, LaunchMode, Provider};

const RETV_LIST: i64 = 0;
const RETV_SELECT: i64 = 1;
const RETV_CUSTOM_FIRST: i64 = 10;
const RETV_CUSTOM_LAST: i64 = 19;

const GENERIC_NEW_WINDOW_FLAG: &str = "-n";
const GENERIC_REUSE_WINDOW_FLAG: &str = "-r";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencySignal {
    List,
    OpenDefault,
    OpenAlternate,
    /// `kb-custom-2` .. `kb-custom-10`; reserved.
    CustomKey(u8),
    Unknown(i64),
}

impl RecencySignal {
    /// Absent or unparseable values mean the listing phase.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(code) = raw.and_then(|value| value.trim().parse::<i64>().ok()) else {
            return Self::List;
        };

        match code {
            RETV_LIST => Self::List,
            RETV_SELECT => Self::OpenDefault,
            RETV_CUSTOM_FIRST => Self::OpenAlternate,
            code if (RETV_CUSTOM_FIRST + 1..=RETV_CUSTOM_LAST).contains(&code) => {
                Self::CustomKey((code - RETV_CUSTOM_FIRST + 1) as u8)
            }
            other => Self::Unknown(other),
        }
    }

    pub fn launch_mode(self) -> Option<LaunchMode> {
        match self {
            Self::OpenDefault => Some(LaunchMode::Default),
            Self::OpenAlternate => Some(LaunchMode::NewWindow),
            Self::List | Self::CustomKey(_) | Self::Unknown(_) => None,
        }
    }
}

/// What one invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listed(String),
    Launched(LaunchCommand),
    Ignored,
}

impl Outcome {
    pub fn stdout(&self) -> &str {
        match self {
            Self::Listed(menu) => menu,
            Self::Launched(_) | Self::Ignored => "",
        }
    }
}

pub fn dispatch(
    provider: &dyn Provider,
    config: &RuntimeConfig,
    selection: Option<&str>,
    spawner: &dyn Spawner,
) -> Outcome {
    let signal = config.recency_signal;

    if signal == RecencySignal::List {
        let menu = build_menu(provider, &config.home, config.max_entries);
        return Outcome::Listed(menu.render());
    }

    let Some(mode) = signal.launch_mode() else {
        debug!(?signal, "no action bound to return code");
        return Outcome::Ignored;
    };

    let Some(selection) = selection.filter(|value| !value.is_empty()) else {
        warn!(?signal, "selection phase without a selected entry");
        return Outcome::Ignored;
    };

    let command = launch_command(provider, mode, selection);
    spawner.spawn_detached(&command);
    Outcome::Launched(command)
}

/// Provider launch config when present, else the generic reuse/new-window
/// flag convention.
pub fn launch_command(provider: &dyn Provider, mode: LaunchMode, selection: &str) -> LaunchCommand {
    match provider.launch_config(mode, selection) {
        Some(config) => from_launch_config(provider.executable(), config, selection),
        None => {
            let flag = match mode {
                LaunchMode::Default => GENERIC_REUSE_WINDOW_FLAG,
                LaunchMode::NewWindow => GENERIC_NEW_WINDOW_FLAG,
            };
            LaunchCommand::new(
                provider.executable(),
                vec![flag.to_string(), selection.to_string()],
            )
        }
    }
}

fn from_launch_config(executable: &str, config: LaunchConfig, selection: &str) -> LaunchCommand {
    let LaunchConfig {
        command,
        prepend_args,
        target,
        args,
        append_args,
    } = config;

    let target = target.unwrap_or_else(|| vec![selection.to_string()]);
    let argv = prepend_args
        .into_iter()
        .chain(target)
        .chain(args)
        .chain(append_args)
        .collect();

    LaunchCommand::new(command.as_deref().unwrap_or(executable), argv)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::entry::{Entry, EntryKind};
    use crate::error::LauncherError;

    use super::*;

    #[derive(Default)]
    struct RecordingSpawner {
        spawned: RefCell<Vec<LaunchCommand>>,
    }

    impl Spawner for RecordingSpawner {
        fn spawn_detached(&self, command: &LaunchCommand) {
            self.spawned.borrow_mut().push(command.clone());
        }
    }

    struct PlainProvider;

    impl Provider for PlainProvider {
        fn name(&self) -> &str {
            "Plain"
        }

        fn executable(&self) -> &str {
            "editor"
        }

        fn recent_entries(&self) -> Result<Vec<Entry>, LauncherError> {
            Ok(Entry::new(EntryKind::Folder, "/home/alice/proj")
                .into_iter()
                .collect())
        }
    }

    struct ShapedProvider;

    impl Provider for ShapedProvider {
        fn name(&self) -> &str {
            "Shaped"
        }

        fn executable(&self) -> &str {
            "shaped"
        }

        fn recent_entries(&self) -> Result<Vec<Entry>, LauncherError> {
            Ok(Vec::new())
        }

        fn launch_config(&self, mode: LaunchMode, _selection: &str) -> Option<LaunchConfig> {
            let config = LaunchConfig::default()
                .with_command("/opt/shaped/bin/shaped")
                .with_prepend_arg("--profile")
                .with_prepend_arg("work")
                .with_arg("--goto")
                .with_append_arg("--wait=false");
            Some(match mode {
                LaunchMode::Default => config,
                LaunchMode::NewWindow => config.with_append_arg("--fresh"),
            })
        }
    }

    fn config_with_retv(retv: Option<&str>) -> RuntimeConfig {
        let mut pairs = vec![("HOME", "/home/alice"), ("XDG_CONFIG_HOME", "/nonexistent")];
        if let Some(retv) = retv {
            pairs.push(("ROFI_RETV", retv));
        }
        RuntimeConfig::from_pairs(pairs, None).expect("config")
    }

    #[test]
    fn signal_decoding_covers_reserved_and_unknown_codes() {
        assert_eq!(RecencySignal::from_raw(None), RecencySignal::List);
        assert_eq!(RecencySignal::from_raw(Some("")), RecencySignal::List);
        assert_eq!(RecencySignal::from_raw(Some("x1")), RecencySignal::List);
        assert_eq!(RecencySignal::from_raw(Some("0")), RecencySignal::List);
        assert_eq!(RecencySignal::from_raw(Some("1")), RecencySignal::OpenDefault);
        assert_eq!(
            RecencySignal::from_raw(Some(" 10 ")),
            RecencySignal::OpenAlternate
        );
        assert_eq!(
            RecencySignal::from_raw(Some("11")),
            RecencySignal::CustomKey(2)
        );
        assert_eq!(
            RecencySignal::from_raw(Some("19")),
            RecencySignal::CustomKey(10)
        );
        assert_eq!(RecencySignal::from_raw(Some("2")), RecencySignal::Unknown(2));
        assert_eq!(
            RecencySignal::from_raw(Some("-4")),
            RecencySignal::Unknown(-4)
        );
    }

    #[test]
    fn list_signal_renders_without_spawning() {
        for retv in [None, Some("0")] {
            let spawner = RecordingSpawner::default();
            let outcome = dispatch(
                &PlainProvider,
                &config_with_retv(retv),
                Some("/ignored"),
                &spawner,
            );

            assert!(matches!(outcome, Outcome::Listed(_)));
            assert!(outcome.stdout().contains("/home/alice/proj"));
            assert!(spawner.spawned.borrow().is_empty(), "listing must not spawn");
        }
    }

    #[test]
    fn open_default_uses_generic_reuse_flag() {
        let spawner = RecordingSpawner::default();
        let outcome = dispatch(
            &PlainProvider,
            &config_with_retv(Some("1")),
            Some("/home/alice/proj"),
            &spawner,
        );

        let expected = LaunchCommand::new(
            "editor",
            vec!["-r".to_string(), "/home/alice/proj".to_string()],
        );
        assert_eq!(outcome, Outcome::Launched(expected.clone()));
        assert_eq!(*spawner.spawned.borrow(), vec![expected]);
        assert_eq!(outcome.stdout(), "");
    }

    #[test]
    fn open_alternate_uses_generic_new_window_flag() {
        let spawner = RecordingSpawner::default();
        dispatch(
            &PlainProvider,
            &config_with_retv(Some("10")),
            Some("/home/alice/proj"),
            &spawner,
        );

        let spawned = spawner.spawned.borrow();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].args, vec!["-n", "/home/alice/proj"]);
    }

    #[test]
    fn other_signals_never_spawn() {
        for retv in ["2", "3", "11", "19", "20", "-1"] {
            for selection in [None, Some("/home/alice/proj")] {
                let spawner = RecordingSpawner::default();
                let outcome = dispatch(
                    &PlainProvider,
                    &config_with_retv(Some(retv)),
                    selection,
                    &spawner,
                );
                assert_eq!(outcome, Outcome::Ignored, "retv {retv} must be a no-op");
                assert!(spawner.spawned.borrow().is_empty());
            }
        }
    }

    #[test]
    fn open_without_selection_is_a_no_op() {
        let spawner = RecordingSpawner::default();
        let outcome = dispatch(&PlainProvider, &config_with_retv(Some("1")), None, &spawner);
        assert_eq!(outcome, Outcome::Ignored);
        assert!(spawner.spawned.borrow().is_empty());
    }

    #[test]
    fn provider_launch_config_shapes_argv() {
        let command = launch_command(&ShapedProvider, LaunchMode::Default, "/srv/app");
        assert_eq!(command.program, "/opt/shaped/bin/shaped");
        assert_eq!(
            command.args,
            vec!["--profile", "work", "/srv/app", "--goto", "--wait=false"]
        );

        let command = launch_command(&ShapedProvider, LaunchMode::NewWindow, "/srv/app");
        assert_eq!(
            command.args,
            vec!["--profile", "work", "/srv/app", "--goto", "--wait=false", "--fresh"]
        );
    }

    #[test]
    fn launch_config_target_replaces_selection() {
        struct MultiRoot;

        impl Provider for MultiRoot {
            fn name(&self) -> &str {
                "Multi"
            }

            fn executable(&self) -> &str {
                "multi"
            }

            fn recent_entries(&self) -> Result<Vec<Entry>, LauncherError> {
                Ok(Vec::new())
            }

            fn launch_config(&self, _mode: LaunchMode, selection: &str) -> Option<LaunchConfig> {
                Some(
                    LaunchConfig::default()
                        .with_target(selection.split('\t').map(str::to_string).collect()),
                )
            }
        }

        let command = launch_command(&MultiRoot, LaunchMode::Default, "/a\t/b");
        assert_eq!(command.program, "multi");
        assert_eq!(command.args, vec!["/a", "/b"]);
    }
}
