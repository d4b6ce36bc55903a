//! Normalize URI-style paths found in editor history stores.

const FILE_SCHEME: &str = "file://";

/// `file:///home/a%20b` becomes `/home/a b`. Plain paths pass through, and
/// anything that fails to decode is kept as-is.
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = strip_scheme_ignore_case(trimmed, FILE_SCHEME) else {
        return trimmed.to_string();
    };

    // `file://host/path` carries an authority; only local files are expected.
    let path = match rest.find('/') {
        Some(0) => rest,
        Some(index) => &rest[index..],
        None => rest,
    };

    percent_decode(path)
}

pub fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Split `scheme://authority/path` into its authority and decoded path.
pub fn split_authority(uri: &str) -> Option<(String, String)> {
    let (_, rest) = uri.split_once("://")?;
    let (authority, path) = match rest.find('/') {
        Some(index) => (&rest[..index], &rest[index..]),
        None => (rest, "/"),
    };
    Some((percent_decode(authority), percent_decode(path)))
}

/// Files inside version-control metadata are noise in a recent list.
pub fn is_vcs_internal(path: &str) -> bool {
    const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".jj"];
    const VCS_FILES: &[&str] = &[
        "COMMIT_EDITMSG",
        "MERGE_MSG",
        "TAG_EDITMSG",
        "git-rebase-todo",
        "addp-hunk-edit.diff",
    ];

    path.split('/').any(|component| VCS_DIRS.contains(&component))
        || path
            .rsplit('/')
            .next()
            .is_some_and(|name| VCS_FILES.contains(&name))
}

fn strip_scheme_ignore_case<'a>(raw: &'a str, scheme: &str) -> Option<&'a str> {
    let prefix = raw.get(..scheme.len())?;
    prefix
        .eq_ignore_ascii_case(scheme)
        .then(|| &raw[scheme.len()..])
}
