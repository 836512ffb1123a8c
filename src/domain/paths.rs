/// Anything longer than this is noise, not a path.
const MAX_PATH_LEN: usize = 500;

/// Abbreviation tokens that satisfy the path shape but show up constantly in
/// prose. Purely numeric tokens ("1.0") are handled separately.
const NOT_A_PATH: &[&str] = &[
    "e.g", "e.g.", "i.e", "i.e.", "a.m", "a.m.", "p.m", "p.m.", "etc.", "vs.",
];

/// Whether `candidate` is a plausible file path. Rejects empty and oversized
/// strings, URLs, strings without an extension dot, shell-glob/redirect
/// characters, and common prose tokens that would otherwise slip through the
/// pattern matchers.
pub fn is_valid_file_path(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() || candidate.len() > MAX_PATH_LEN {
        return false;
    }
    if !candidate.contains('.') {
        return false;
    }
    let lowered = candidate.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return false;
    }
    if candidate
        .chars()
        .any(|c| matches!(c, '<' | '>' | ':' | '|' | '?' | '*'))
    {
        return false;
    }
    if NOT_A_PATH.contains(&lowered.as_str()) {
        return false;
    }
    if candidate.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return false;
    }
    true
}

/// Canonical form used for every path comparison in the engine: one leading
/// `./` and one leading `/` are stripped, and the result is lowercased, so
/// `./src/App.ts`, `/src/app.ts` and `src/APP.TS` all name the same file.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let path = path.strip_prefix("./").unwrap_or(path);
    let path = path.strip_prefix('/').unwrap_or(path);
    path.to_ascii_lowercase()
}

pub fn same_file(a: &str, b: &str) -> bool {
    normalize_path(a) == normalize_path(b)
}
