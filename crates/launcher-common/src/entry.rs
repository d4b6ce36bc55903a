use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Folder,
    File,
    Ssh,
    DevServer,
    Workspace,
}

impl EntryKind {
    /// Sort bucket: folders first, individual files last.
    pub fn priority(self) -> u8 {
        match self {
            Self::Folder => 0,
            Self::Ssh => 1,
            Self::DevServer => 2,
            Self::Workspace => 3,
            Self::File => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
            Self::Ssh => "ssh-remote",
            Self::DevServer => "dev-server",
            Self::Workspace => "workspace-group",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recently used file, folder or remote project.
///
/// `path` is the identity key: it is what rofi hands back on selection and
/// what the editor receives as its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub path: String,
    pub timestamp: Option<String>,
    pub display_name: Option<String>,
    pub workspace_id: Option<String>,
}

impl Entry {
    pub fn new(kind: EntryKind, path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return None;
        }

        Some(Self {
            kind,
            path,
            timestamp: None,
            display_name: None,
            workspace_id: None,
        })
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        let timestamp = timestamp.into();
        if !timestamp.trim().is_empty() {
            self.timestamp = Some(timestamp);
        }
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        if !display_name.trim().is_empty() {
            self.display_name = Some(display_name);
        }
        self
    }

    pub fn with_workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    /// Lowercased text after the last `.` of the final path component.
    pub fn extension(&self) -> Option<String> {
        let file_name = self
            .path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str());
        let (_, extension) = file_name.rsplit_once('.')?;
        if extension.is_empty() {
            return None;
        }
        Some(extension.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_rejected() {
        assert!(Entry::new(EntryKind::Folder, "").is_none());
        assert!(Entry::new(EntryKind::File, "   ").is_none());
        assert!(Entry::new(EntryKind::File, "/tmp/a").is_some());
    }

    #[test]
    fn blank_optional_fields_stay_absent() {
        let entry = Entry::new(EntryKind::Folder, "/tmp/a")
            .expect("entry")
            .with_timestamp("")
            .with_display_name("  ");
        assert_eq!(entry.timestamp, None);
        assert_eq!(entry.display_name, None);
    }

    #[test]
    fn extension_uses_last_dot_of_file_name() {
        let entry = Entry::new(EntryKind::File, "a/b/report.MD").expect("entry");
        assert_eq!(entry.extension().as_deref(), Some("md"));

        let entry = Entry::new(EntryKind::File, "/src/archive.tar.gz").expect("entry");
        assert_eq!(entry.extension().as_deref(), Some("gz"));

        let entry = Entry::new(EntryKind::File, "/home/x.d/Makefile").expect("entry");
        assert_eq!(entry.extension(), None);
    }

    #[test]
    fn dotfiles_report_their_suffix() {
        let entry = Entry::new(EntryKind::File, "/home/tester/.gitignore").expect("entry");
        assert_eq!(entry.extension().as_deref(), Some("gitignore"));
    }

    #[test]
    fn priority_orders_buckets() {
        let mut kinds = vec![
            EntryKind::File,
            EntryKind::Workspace,
            EntryKind::DevServer,
            EntryKind::Ssh,
            EntryKind::Folder,
        ];
        kinds.sort_by_key(|kind| kind.priority());
        assert_eq!(
            kinds,
            vec![
                EntryKind::Folder,
                EntryKind::Ssh,
                EntryKind::DevServer,
                EntryKind::Workspace,
                EntryKind::File,
            ]
        );
    }
}
