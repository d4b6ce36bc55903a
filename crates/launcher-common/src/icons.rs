use crate::entry::{Entry, EntryKind};
use crate::provider::Provider;

pub const FOLDER_ICON: &str = "folder";
pub const FILE_ICON: &str = "text-x-generic";
pub const SSH_ICON: &str = "network-server";
pub const DEV_SERVER_ICON: &str = "network-workgroup";
pub const WORKSPACE_ICON: &str = "folder-documents";

/// Freedesktop icon names per lowercase file extension.
pub const EXTENSION_ICONS: &[(&str, &str)] = &[
    // source
    ("rs", "text-rust"),
    ("c", "text-x-csrc"),
    ("h", "text-x-chdr"),
    ("cc", "text-x-c++src"),
    ("cpp", "text-x-c++src"),
    ("cxx", "text-x-c++src"),
    ("hpp", "text-x-c++hdr"),
    ("go", "text-x-go"),
    ("java", "text-x-java"),
    ("kt", "text-x-kotlin"),
    ("py", "text-x-python"),
    ("rb", "application-x-ruby"),
    ("php", "application-x-php"),
    ("lua", "text-x-lua"),
    ("js", "application-javascript"),
    ("mjs", "application-javascript"),
    ("cjs", "application-javascript"),
    ("jsx", "application-javascript"),
    ("ts", "text-x-typescript"),
    ("tsx", "text-x-typescript"),
    ("swift", "text-x-swift"),
    ("zig", "text-x-zig"),
    ("sh", "application-x-shellscript"),
    ("bash", "application-x-shellscript"),
    ("zsh", "application-x-shellscript"),
    ("fish", "application-x-shellscript"),
    ("sql", "application-sql"),
    // markup and documents
    ("md", "text-x-markdown"),
    ("markdown", "text-x-markdown"),
    ("rst", "text-x-rst"),
    ("txt", "text-plain"),
    ("html", "text-html"),
    ("htm", "text-html"),
    ("css", "text-css"),
    ("scss", "text-x-scss"),
    ("svg", "image-svg+xml"),
    ("tex", "text-x-tex"),
    ("pdf", "application-pdf"),
    ("org", "text-x-org"),
    // config and data
    ("json", "application-json"),
    ("jsonc", "application-json"),
    ("yaml", "application-x-yaml"),
    ("yml", "application-x-yaml"),
    ("toml", "application-toml"),
    ("xml", "application-xml"),
    ("ini", "text-x-generic-template"),
    ("conf", "text-x-generic-template"),
    ("env", "text-x-generic-template"),
    ("lock", "application-x-lock"),
    ("csv", "text-csv"),
    // build
    ("nix", "text-x-nix"),
    ("cmake", "text-x-cmake"),
    ("mk", "text-x-makefile"),
    ("gradle", "text-x-gradle"),
    ("dockerfile", "text-dockerfile"),
];

pub fn extension_icon(extension: &str) -> Option<&'static str> {
    EXTENSION_ICONS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(extension))
        .map(|(_, icon)| *icon)
}

/// Provider hook first, then the static table, then the per-kind default.
pub fn resolve_icon(provider: &dyn Provider, entry: &Entry) -> String {
    match entry.kind {
        EntryKind::Folder => FOLDER_ICON.to_string(),
        EntryKind::Ssh => SSH_ICON.to_string(),
        EntryKind::DevServer => DEV_SERVER_ICON.to_string(),
        EntryKind::Workspace => WORKSPACE_ICON.to_string(),
        EntryKind::File => entry
            .extension()
            .and_then(|extension| {
                provider
                    .file_icon(&extension)
                    .or_else(|| extension_icon(&extension).map(str::to_string))
            })
            .unwrap_or_else(|| FILE_ICON.to_string()),
    }
}
