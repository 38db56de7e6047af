//! Playable URL resolution

/// Resolve a track locator to the URL handed to the output device
///
/// A locator already ending in `.<extension>` is used as-is. Otherwise the
/// extension of its last path segment (if any) is replaced by `extension`.
/// Dots in earlier segments, such as a host name, are left alone.
pub fn resolve_source_path(music_url: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    let suffix = format!(".{extension}");

    if music_url.ends_with(&suffix) {
        return music_url.to_string();
    }

    let segment_start = music_url.rfind('/').map_or(0, |slash| slash + 1);
    let stem = match music_url[segment_start..].rfind('.') {
        Some(dot) if dot > 0 => &music_url[..segment_start + dot],
        _ => music_url,
    };

    format!("{stem}{suffix}")
}
