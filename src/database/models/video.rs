use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub controls: bool,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/videos`. The file itself already lives on the media host.
#[derive(Debug, Default, Deserialize)]
pub struct NewVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub controls: Option<bool>,
}

impl NewVideo {
    /// Builds the record, or names the first required field that is missing.
    pub fn into_video(self, owner_id: Uuid) -> Result<Video, &'static str> {
        fn required(value: Option<String>, field: &'static str) -> Result<String, &'static str> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(field)
        }

        let now = Utc::now();
        Ok(Video {
            id: Uuid::new_v4(),
            title: required(self.title, "title")?,
            description: required(self.description, "description")?,
            video_url: required(self.video_url, "video_url")?,
            thumbnail_url: required(self.thumbnail_url, "thumbnail_url")?,
            controls: self.controls.unwrap_or(true),
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> NewVideo {
        NewVideo {
            title: Some("Sunset".into()),
            description: Some("Timelapse".into()),
            video_url: Some("https://media.example.com/videos/sunset.mp4".into()),
            thumbnail_url: Some("https://media.example.com/images/sunset.jpg".into()),
            controls: None,
        }
    }

    #[test]
    fn builds_video_with_defaults() {
        let owner = Uuid::new_v4();
        let video = complete().into_video(owner).unwrap();
        assert_eq!(video.owner_id, owner);
        assert!(video.controls);
        assert_eq!(video.title, "Sunset");
    }

    #[test]
    fn blank_field_is_missing() {
        let mut input = complete();
        input.thumbnail_url = Some("   ".into());
        assert_eq!(input.into_video(Uuid::new_v4()).unwrap_err(), "thumbnail_url");
    }
}
