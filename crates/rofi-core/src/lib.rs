//! Rofi script-mode protocol.
//!
//! A script prints newline-terminated records on stdout. Mode options are
//! `\0<name>\x1f<value>`; rows are `<text>\0<key>\x1f<value>\x1f<key>\x1f<value>...`.
//! Rofi hands the row text back to the script as its first argument when the
//! row is selected.

use std::fmt;

pub const NUL: char = '\0';
pub const UNIT_SEPARATOR: char = '\x1f';

/// Mode-level option understood by rofi script mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub name: String,
    pub value: String,
}

impl MenuOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn flag(name: impl Into<String>, enabled: bool) -> Self {
        Self::new(name, if enabled { "true" } else { "false" })
    }

    pub fn prompt(value: impl Into<String>) -> Self {
        Self::new("prompt", value)
    }

    pub fn message(value: impl Into<String>) -> Self {
        Self::new("message", value)
    }
}

impl fmt::Display for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{NUL}{}{UNIT_SEPARATOR}{}",
            sanitize_field(&self.name),
            sanitize_field(&self.value)
        )
    }
}

/// One selectable row. `text` is the value rofi returns on selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRow {
    pub text: String,
    pub icon: Option<String>,
    pub display: Option<String>,
}

impl MenuRow {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
            display: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    fn properties(&self) -> Vec<(&'static str, &str)> {
        let mut properties = Vec::new();
        if let Some(icon) = &self.icon {
            properties.push(("icon", icon.as_str()));
        }
        if let Some(display) = &self.display {
            properties.push(("display", display.as_str()));
        }
        properties
    }
}

impl fmt::Display for MenuRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&sanitize_field(&self.text))?;

        let properties = self.properties();
        if properties.is_empty() {
            return Ok(());
        }

        write!(f, "{NUL}")?;
        for (index, (key, value)) in properties.iter().enumerate() {
            if index > 0 {
                write!(f, "{UNIT_SEPARATOR}")?;
            }
            write!(f, "{key}{UNIT_SEPARATOR}{}", sanitize_field(value))?;
        }
        Ok(())
    }
}

/// Full script output: options first, then rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub options: Vec<MenuOption>,
    pub rows: Vec<MenuRow>,
}

impl Menu {
    pub fn new(options: Vec<MenuOption>, rows: Vec<MenuRow>) -> Self {
        Self { options, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        for option in &self.options {
            output.push_str(&option.to_string());
            output.push('\n');
        }
        for row in &self.rows {
            output.push_str(&row.to_string());
            output.push('\n');
        }
        output
    }
}

/// Protocol separators cannot appear inside a field.
pub fn sanitize_field(raw: &str) -> String {
    raw.chars()
        .map(|ch| match ch {
            NUL | UNIT_SEPARATOR | '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}

/// Escape text for rows rendered with `markup-rows`.
pub fn escape_markup(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}
