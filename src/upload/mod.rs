//! File checks applied before a client sends a file to the media host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MB: u64 = 1024 * 1024;

pub const MAX_VIDEO_BYTES: u64 = 100 * MB;
pub const MAX_IMAGE_BYTES: u64 = 5 * MB;
pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Video must be less than 100 MB")]
    VideoTooLarge,

    #[error("Please upload an image file (JPEG, PNG, or WEBP)")]
    UnsupportedImageType,

    #[error("Image must be less than 5 MB")]
    ImageTooLarge,
}

/// Where and how a file of a given kind is uploaded.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRules {
    pub kind: FileKind,
    pub file_name: &'static str,
    pub folder: &'static str,
    pub max_bytes: u64,
    /// Empty means any type is accepted.
    pub mime_types: &'static [&'static str],
    pub use_unique_file_name: bool,
}

impl FileKind {
    pub fn rules(self) -> UploadRules {
        match self {
            FileKind::Video => UploadRules {
                kind: self,
                file_name: "video",
                folder: "/videos",
                max_bytes: MAX_VIDEO_BYTES,
                mime_types: &[],
                use_unique_file_name: true,
            },
            FileKind::Image => UploadRules {
                kind: self,
                file_name: "image",
                folder: "/images",
                max_bytes: MAX_IMAGE_BYTES,
                mime_types: IMAGE_MIME_TYPES,
                use_unique_file_name: true,
            },
        }
    }
}

/// File metadata sent by the client before uploading.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDescriptor {
    #[serde(default = "default_kind")]
    pub file_type: FileKind,
    pub mime_type: String,
    pub size: u64,
}

fn default_kind() -> FileKind {
    FileKind::Image
}

pub fn validate(file: &FileDescriptor) -> Result<(), UploadError> {
    match file.file_type {
        FileKind::Video => {
            if file.size > MAX_VIDEO_BYTES {
                return Err(UploadError::VideoTooLarge);
            }
        }
        FileKind::Image => {
            if !IMAGE_MIME_TYPES.contains(&file.mime_type.as_str()) {
                return Err(UploadError::UnsupportedImageType);
            }
            if file.size > MAX_IMAGE_BYTES {
                return Err(UploadError::ImageTooLarge);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(kind: FileKind, mime: &str, size: u64) -> FileDescriptor {
        FileDescriptor {
            file_type: kind,
            mime_type: mime.to_string(),
            size,
        }
    }

    #[test]
    fn videos_are_limited_by_size_only() {
        assert!(validate(&file(FileKind::Video, "video/mp4", MAX_VIDEO_BYTES)).is_ok());
        assert!(validate(&file(FileKind::Video, "application/octet-stream", 10)).is_ok());
        assert_eq!(
            validate(&file(FileKind::Video, "video/mp4", MAX_VIDEO_BYTES + 1)),
            Err(UploadError::VideoTooLarge)
        );
    }

    #[test]
    fn images_check_type_before_size() {
        assert!(validate(&file(FileKind::Image, "image/webp", 1024)).is_ok());
        assert_eq!(
            validate(&file(FileKind::Image, "image/gif", MAX_IMAGE_BYTES + 1)),
            Err(UploadError::UnsupportedImageType)
        );
        assert_eq!(
            validate(&file(FileKind::Image, "image/png", MAX_IMAGE_BYTES + 1)),
            Err(UploadError::ImageTooLarge)
        );
    }

    #[test]
    fn rules_name_the_destination_folder() {
        assert_eq!(FileKind::Video.rules().folder, "/videos");
        assert_eq!(FileKind::Image.rules().folder, "/images");
    }
}
