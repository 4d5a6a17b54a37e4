//! Static asset detection.

/// Directories served as static content by the origin.
pub(crate) const ASSET_DIRS: [&str; 4] = ["_next/", "static/", "images/", "videos/"];

/// Extensions treated as static content.
const ASSET_EXTENSIONS: [&str; 19] = [
    "js", "mjs", "css", "json", "map", "png", "jpg", "jpeg", "webp", "gif", "svg", "ico", "bmp",
    "avif", "woff2", "woff", "ttf", "otf", "wasm",
];

/// Returns true if `path` names a static asset, by directory prefix or extension.
///
/// Matching is case-insensitive and ignores any query string or fragment.
pub fn is_asset_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() {
        return false;
    }

    let lower = path.to_ascii_lowercase();
    if lower
        .strip_prefix('/')
        .is_some_and(is_asset_dir)
    {
        return true;
    }

    lower
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ASSET_EXTENSIONS.contains(&ext))
}

/// Returns true if a path with its leading slash removed starts in an asset directory.
pub(crate) fn is_asset_dir(rest: &str) -> bool {
    ASSET_DIRS.iter().any(|dir| rest.starts_with(dir))
}
