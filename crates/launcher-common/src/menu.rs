use std::cmp::Ordering;
use std::collections::HashSet;

use rofi_core::{Menu, MenuOption, MenuRow, escape_markup};
use tracing::{debug, info, warn};

use crate::config::collapse_home;
use crate::entry::Entry;
use crate::icons::resolve_icon;
use crate::provider::{EntryComparator, Provider};

pub const NO_ENTRIES_MESSAGE: &str = "No recent entries found";
const MARKUP_ROWS_OPTION: &str = "markup-rows";

pub fn default_menu_options(provider_name: &str) -> Vec<MenuOption> {
    vec![
        MenuOption::flag("use-hot-keys", true),
        MenuOption::flag("no-custom", true),
        MenuOption::flag(MARKUP_ROWS_OPTION, true),
        MenuOption::prompt(provider_name),
        MenuOption::message(format!("Open with {provider_name}")),
    ]
}

/// Type bucket first; inside a bucket newer timestamps first when both
/// sides carry one. Any other pair compares equal.
pub fn default_compare(left: &Entry, right: &Entry) -> Ordering {
    left.kind
        .priority()
        .cmp(&right.kind.priority())
        .then_with(|| match (&left.timestamp, &right.timestamp) {
            (Some(left), Some(right)) => right.cmp(left),
            _ => Ordering::Equal,
        })
}

/// First occurrence wins; the cap applies before sorting so the most
/// recent entries in provider order survive.
pub fn prepare_entries(
    entries: Vec<Entry>,
    max_entries: usize,
    comparator: Option<EntryComparator>,
) -> Vec<Entry> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.path.clone()))
        .take(max_entries)
        .collect();

    match comparator {
        Some(comparator) => unique.sort_by(comparator),
        None => sort_by_default(&mut unique),
    }
    unique
}

/// Stable bucket sort, then dated entries are reordered among the slots
/// they already hold. Undated entries never move within their bucket.
fn sort_by_default(entries: &mut [Entry]) {
    entries.sort_by_key(|entry| entry.kind.priority());

    let same_bucket = |left: &Entry, right: &Entry| left.kind.priority() == right.kind.priority();
    for bucket in entries.chunk_by_mut(same_bucket) {
        let slots: Vec<usize> = bucket
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.timestamp.is_some())
            .map(|(index, _)| index)
            .collect();
        let mut dated: Vec<Entry> = slots.iter().map(|&index| bucket[index].clone()).collect();
        dated.sort_by(default_compare);
        for (index, entry) in slots.into_iter().zip(dated) {
            bucket[index] = entry;
        }
    }
}

pub fn entry_label(entry: &Entry, home: &str) -> String {
    match &entry.display_name {
        Some(display_name) => display_name.clone(),
        None => collapse_home(&entry.path, home),
    }
}

/// Provider failures degrade to an empty list.
pub fn collect_entries(provider: &dyn Provider) -> Vec<Entry> {
    match provider.recent_entries() {
        Ok(entries) => entries,
        Err(error) => {
            warn!(provider = provider.name(), %error, "failed to read recent entries");
            Vec::new()
        }
    }
}

pub fn build_menu(provider: &dyn Provider, home: &str, max_entries: usize) -> Menu {
    let entries = prepare_entries(
        collect_entries(provider),
        max_entries,
        provider.compare_entries(),
    );
    let options = provider
        .menu_options()
        .unwrap_or_else(|| default_menu_options(provider.name()));

    if entries.is_empty() {
        info!(provider = provider.name(), "{NO_ENTRIES_MESSAGE}");
    }

    let markup = options
        .iter()
        .any(|option| option.name == MARKUP_ROWS_OPTION && option.value == "true");

    let rows = entries
        .iter()
        .map(|entry| {
            debug!(kind = %entry.kind, identity = %entry.path, "menu row");
            let label = entry_label(entry, home);
            let label = if markup { escape_markup(&label) } else { label };
            MenuRow::new(entry.path.as_str())
                .with_icon(resolve_icon(provider, entry))
                .with_display(label)
        })
        .collect();

    Menu::new(options, rows)
}
