use crate::error::FileRejection;
use crate::upload::types::SelectedFile;
use std::fs;
use std::path::Path;

pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

const ALLOWED_MIME_TYPES: [&str; 5] = [
    "video/mp4",
    "video/quicktime",
    "video/x-msvideo",
    "video/avi",
    "video/webm",
];

/// Extensions offered in the open dialog.
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "avi", "webm"];

/// MIME type for a path, derived from its extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "mov" | "qt" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        "webm" => Some("video/webm"),
        "mkv" => Some("video/x-matroska"),
        "ogv" => Some("video/ogg"),
        _ => None,
    }
}

pub fn validate(name: &str, size: u64, mime_type: Option<&str>) -> Result<(), FileRejection> {
    match mime_type {
        Some(mime) if ALLOWED_MIME_TYPES.contains(&mime) => {}
        _ => {
            return Err(FileRejection::UnsupportedType {
                name: name.to_string(),
            })
        }
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(FileRejection::TooLarge {
            name: name.to_string(),
            size_mb: size / (1024 * 1024),
        });
    }

    Ok(())
}

impl SelectedFile {
    /// Inspects a path picked or dropped by the user.
    pub fn from_path(path: &Path) -> Result<Self, FileRejection> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let metadata = fs::metadata(path).map_err(|e| FileRejection::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if !metadata.is_file() {
            return Err(FileRejection::Unreadable {
                path: path.display().to_string(),
                reason: "not a regular file".to_string(),
            });
        }

        let mime_type = mime_for_path(path);
        validate(&name, metadata.len(), mime_type)?;

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            // validate() rejects None
            mime_type: mime_type.unwrap_or("application/octet-stream"),
        })
    }
}
