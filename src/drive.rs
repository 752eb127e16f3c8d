use crate::Config;
use crate::error::GatewayError;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thumbnail size requested from the upstream endpoint (320x180)
pub const THUMBNAIL_SIZE: &str = "w320-h180";

/// First-page cap on the upstream listing
const PAGE_SIZE: &str = "50";

/// Field mask for the listing request
const LIST_FIELDS: &str = "files(id,name,thumbnailLink,createdTime)";

// Drive denies thumbnail requests that do not look like they come from a
// browser, so the fetch presents as ordinary Chrome.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const BROWSER_ACCEPT: &str = "image/webp,image/apng,image/*,*/*;q=0.8";
const BROWSER_REFERER: &str = "https://drive.google.com/";

/// One file entry as the Drive v3 `files.list` endpoint reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
    pub created_time: String,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Client-facing clip entry, serialized in the wire format the gallery
/// front-end consumes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipDescriptor {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub created: String,
    pub download_link: String,
    pub stream_link: String,
}

pub fn download_link(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={file_id}")
}

pub fn stream_link(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{file_id}/preview")
}

pub fn fallback_thumbnail(file_id: &str) -> String {
    format!("https://drive.google.com/thumbnail?id={file_id}&sz={THUMBNAIL_SIZE}")
}

impl From<DriveFile> for ClipDescriptor {
    fn from(file: DriveFile) -> Self {
        // Drive omits thumbnailLink for freshly uploaded files; the templated
        // URL works for any file id
        let thumbnail = match file.thumbnail_link {
            Some(link) if !link.is_empty() => link,
            _ => fallback_thumbnail(&file.id),
        };

        Self {
            thumbnail,
            download_link: download_link(&file.id),
            stream_link: stream_link(&file.id),
            id: file.id,
            name: file.name,
            created: file.created_time,
        }
    }
}

/// Upstream HTTP client, shared across requests
#[derive(Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    api_base: String,
    thumbnail_base: String,
}

impl DriveClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: config.drive_api_base.trim_end_matches('/').to_string(),
            thumbnail_base: config.thumbnail_base.clone(),
        })
    }

    /// List the video files inside `folder_id`, upstream order preserved
    pub async fn list_videos(
        &self,
        api_key: &str,
        folder_id: &str,
    ) -> Result<Vec<DriveFile>, GatewayError> {
        let query =
            format!("'{folder_id}' in parents and trashed=false and mimeType contains 'video/'");

        let response = self
            .http
            .get(format!("{}/files", self.api_base))
            .query(&[
                ("q", query.as_str()),
                ("pageSize", PAGE_SIZE),
                ("fields", LIST_FIELDS),
                ("key", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UpstreamStatus(status));
        }

        let list: DriveFileList = response
            .json()
            .await
            .map_err(|error| GatewayError::UnexpectedPayload(error.to_string()))?;

        Ok(list.files)
    }

    /// Fetch the thumbnail image for `file_id`, returning the upstream
    /// response so the caller can relay body and content type
    pub async fn fetch_thumbnail(&self, file_id: &str) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .http
            .get(&self.thumbnail_base)
            .query(&[("id", file_id), ("sz", THUMBNAIL_SIZE)])
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .header(header::ACCEPT, BROWSER_ACCEPT)
            .header(header::REFERER, BROWSER_REFERER)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UpstreamStatus(status));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_templating() {
        assert_eq!(
            download_link("abc"),
            "https://drive.google.com/uc?export=download&id=abc"
        );
        assert_eq!(
            stream_link("abc"),
            "https://drive.google.com/file/d/abc/preview"
        );
        assert_eq!(
            fallback_thumbnail("abc"),
            "https://drive.google.com/thumbnail?id=abc&sz=w320-h180"
        );
    }

    #[test]
    fn descriptor_keeps_upstream_thumbnail() {
        let file = DriveFile {
            id: "f1".into(),
            name: "clip.mp4".into(),
            thumbnail_link: Some("https://lh3.googleusercontent.com/t".into()),
            created_time: "2024-01-01T00:00:00Z".into(),
        };

        let clip = ClipDescriptor::from(file);
        assert_eq!(clip.thumbnail, "https://lh3.googleusercontent.com/t");
        assert_eq!(clip.download_link, download_link("f1"));
        assert_eq!(clip.stream_link, stream_link("f1"));
    }

    #[test]
    fn descriptor_falls_back_when_thumbnail_missing_or_empty() {
        for thumbnail_link in [None, Some(String::new())] {
            let file = DriveFile {
                id: "f2".into(),
                name: "clip.mp4".into(),
                thumbnail_link,
                created_time: "2024-01-01T00:00:00Z".into(),
            };

            let clip = ClipDescriptor::from(file);
            assert_eq!(clip.thumbnail, fallback_thumbnail("f2"));
        }
    }

    #[test]
    fn descriptor_wire_format() {
        let file: DriveFile = serde_json::from_str(
            r#"{"id":"abc","name":"clip1.mp4","thumbnailLink":"","createdTime":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let clip = ClipDescriptor::from(file);
        assert_eq!(
            serde_json::to_value(&clip).unwrap(),
            serde_json::json!({
                "id": "abc",
                "name": "clip1.mp4",
                "thumbnail": "https://drive.google.com/thumbnail?id=abc&sz=w320-h180",
                "created": "2024-01-01T00:00:00Z",
                "download_link": "https://drive.google.com/uc?export=download&id=abc",
                "stream_link": "https://drive.google.com/file/d/abc/preview",
            })
        );
    }

    #[test]
    fn listing_without_files_key_is_empty() {
        let list: DriveFileList = serde_json::from_str("{}").unwrap();
        assert!(list.files.is_empty());
    }

    #[test]
    fn listing_preserves_upstream_order() {
        let list: DriveFileList = serde_json::from_str(
            r#"{"files":[
                {"id":"b","name":"2.mp4","createdTime":"2024-01-02T00:00:00Z"},
                {"id":"a","name":"1.mp4","createdTime":"2024-01-01T00:00:00Z"}
            ]}"#,
        )
        .unwrap();

        let ids = list.files.iter().map(|f| f.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn item_without_id_is_rejected() {
        let result = serde_json::from_str::<DriveFileList>(
            r#"{"files":[{"name":"1.mp4","createdTime":"2024-01-01T00:00:00Z"}]}"#,
        );
        assert!(result.is_err());
    }
}
