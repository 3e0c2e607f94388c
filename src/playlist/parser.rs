/// Playlist XML parser.
use quick_xml::de::from_str;
use std::path::Path;
use tracing::info;

use super::model::Playlist;
use crate::error::{Result, SlideshowError};

/// Parse a playlist file from disk
pub fn parse_playlist_file(path: &Path) -> Result<Playlist> {
    let xml = std::fs::read_to_string(path).map_err(|source| SlideshowError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let playlist = parse_playlist_xml(&xml)?;
    info!(
        "Loaded playlist '{}' with {} image(s) from {}",
        playlist.name,
        playlist.images.len(),
        path.display()
    );
    Ok(playlist)
}

/// Parse playlist XML from a string
pub fn parse_playlist_xml(xml: &str) -> Result<Playlist> {
    let xml_trimmed = xml.trim();

    if xml_trimmed.starts_with("<?xml") {
        // Strip the declaration and re-parse the body
        let pos = xml_trimmed
            .find("?>")
            .ok_or_else(|| SlideshowError::Playlist("malformed XML declaration".into()))?;
        return parse_playlist_xml(&xml_trimmed[pos + 2..]);
    }

    if !xml_trimmed.starts_with("<playlist") {
        return Err(SlideshowError::Playlist(format!(
            "expected <playlist>, got: {}...",
            xml_trimmed.chars().take(50).collect::<String>()
        )));
    }

    let playlist: Playlist = from_str(xml_trimmed)?;
    if playlist.images.is_empty() {
        return Err(SlideshowError::EmptyImageList);
    }
    if playlist.interval == 0 {
        return Err(SlideshowError::ZeroInterval);
    }
    Ok(playlist)
}
