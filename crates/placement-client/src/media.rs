//! Unsigned uploads to the hosted media CDN.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use placement_core::traits::{MediaKind, MediaUploader, UploadRequest, UploadedMedia};
use placement_core::ApiError;

use crate::config::MediaConfig;
use crate::error::transport_error;

/// Uploads files with an unsigned upload preset.
pub struct CdnUploader {
    base_url: String,
    cloud_name: String,
    upload_preset: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    bytes: Option<u64>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorMessage,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

impl CdnUploader {
    pub fn new(config: &MediaConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            upload_preset: config.upload_preset.clone(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    fn endpoint(&self, kind: MediaKind) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.base_url,
            self.cloud_name,
            kind.resource_type()
        )
    }
}

/// Poster-frame URL for a hosted video: the same path with a `.jpg` extension.
pub fn thumbnail_url(video_url: &str) -> String {
    let file_start = video_url.rfind('/').map_or(0, |i| i + 1);
    match video_url[file_start..].rfind('.') {
        Some(dot) => format!("{}.jpg", &video_url[..file_start + dot]),
        None => format!("{video_url}.jpg"),
    }
}

#[async_trait]
impl MediaUploader for CdnUploader {
    #[instrument(skip_all, fields(kind = %request.kind, file = %request.file_name))]
    async fn upload(&self, request: &UploadRequest) -> Result<UploadedMedia, ApiError> {
        if request.bytes.is_empty() {
            return Err(ApiError::Upload(format!("{} is empty", request.file_name)));
        }

        let part = reqwest::multipart::Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(self.endpoint(request.kind))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ApiError::Upload(format!("{status}: {message}")));
        }

        let uploaded: UploadResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        let thumbnail =
            (request.kind == MediaKind::Video).then(|| thumbnail_url(&uploaded.secure_url));
        tracing::info!(url = %uploaded.secure_url, "upload finished");

        Ok(UploadedMedia {
            kind: request.kind,
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
            duration_secs: uploaded.duration,
            thumbnail_url: thumbnail,
            bytes: uploaded.bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn uploader(server: &MockServer) -> CdnUploader {
        CdnUploader::new(&MediaConfig {
            base_url: server.uri(),
            cloud_name: "demo".into(),
            upload_preset: "unsigned".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn request(kind: MediaKind, name: &str) -> UploadRequest {
        UploadRequest {
            kind,
            file_name: name.into(),
            bytes: b"fake media bytes".to_vec(),
        }
    }

    #[test]
    fn thumbnail_swaps_extension() {
        assert_eq!(
            thumbnail_url("https://cdn.test/demo/video/upload/v1/intro.mp4"),
            "https://cdn.test/demo/video/upload/v1/intro.jpg"
        );
        assert_eq!(thumbnail_url("https://cdn.test/v1.2/clip"), "https://cdn.test/v1.2/clip.jpg");
    }

    #[tokio::test]
    async fn audio_goes_to_video_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/video/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://cdn.test/demo/video/upload/v1/announce.mp3",
                "public_id": "announce",
                "duration": 12.4,
                "bytes": 16
            })))
            .expect(1)
            .mount(&server)
            .await;

        let media = uploader(&server)
            .upload(&request(MediaKind::Audio, "announce.mp3"))
            .await
            .unwrap();
        assert_eq!(media.public_id, "announce");
        assert_eq!(media.duration_secs, Some(12.4));
        assert!(media.thumbnail_url.is_none());
    }

    #[tokio::test]
    async fn video_gets_thumbnail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/video/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://cdn.test/demo/video/upload/v1/intro.mp4",
                "public_id": "intro"
            })))
            .mount(&server)
            .await;

        let media = uploader(&server)
            .upload(&request(MediaKind::Video, "intro.mp4"))
            .await
            .unwrap();
        assert_eq!(
            media.thumbnail_url.as_deref(),
            Some("https://cdn.test/demo/video/upload/v1/intro.jpg")
        );
    }

    #[tokio::test]
    async fn rejected_upload_reports_cdn_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": {"message": "Upload preset not found"}})),
            )
            .mount(&server)
            .await;

        let err = uploader(&server)
            .upload(&request(MediaKind::Image, "cover.png"))
            .await
            .unwrap_err();
        match err {
            ApiError::Upload(msg) => assert!(msg.contains("Upload preset not found")),
            other => panic!("expected Upload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_file_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut empty = request(MediaKind::Image, "blank.png");
        empty.bytes.clear();
        assert!(uploader(&server).upload(&empty).await.is_err());
    }
}
