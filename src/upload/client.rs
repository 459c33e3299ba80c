//! HTTP client for the DShorts web server.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::upload::options::UploadOptions;
use crate::upload::types::{SelectedFile, TaskId, TaskSnapshot, UploadResponse};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Longest server-provided reason shown to the user.
const MAX_ERROR_DETAIL_CHARS: usize = 160;

#[derive(Clone)]
pub struct ShortsClient {
    http: Client,
    base_url: String,
}

impl ShortsClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends the video and its options; returns the id of the created task.
    pub async fn upload(
        &self,
        file: &SelectedFile,
        options: &UploadOptions,
    ) -> ClientResult<TaskId> {
        let video = tokio::fs::File::open(&file.path).await?;
        let video_part = Part::stream_with_length(Body::from(video), file.size)
            .file_name(file.name.clone())
            .mime_str(file.mime_type)?;

        let mut form = Form::new().part("video", video_part);
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }

        let url = format!("{}/api/upload", self.base_url);
        info!(file = %file.name, size = file.size, "Uploading video to {}", url);

        let response = self.http.post(&url).multipart(form).send().await?;
        let response = Self::ensure_success(response).await?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ClientError::invalid_response(format!("upload response: {}", e)))?;

        info!(task_id = %body.task_id, "Upload accepted");
        Ok(body.task_id)
    }

    pub async fn task_status(&self, task_id: &TaskId) -> ClientResult<TaskSnapshot> {
        let url = format!("{}/api/task/{}", self.base_url, task_id);
        debug!("Checking task status at {}", url);

        let response = self.http.get(&url).send().await?;
        let response = Self::ensure_success(response).await?;

        response
            .json::<TaskSnapshot>()
            .await
            .map_err(|e| ClientError::invalid_response(format!("task status: {}", e)))
    }

    pub fn output_url(&self, task_id: &TaskId, filename: &str) -> String {
        format!("{}/outputs/{}/{}", self.base_url, task_id, filename)
    }

    pub fn download_url(&self, task_id: &TaskId, filename: &str) -> String {
        format!("{}?download=true", self.output_url(task_id, filename))
    }

    /// Streams a generated short to `destination`; returns the number of bytes written.
    ///
    /// Data goes to a temporary file next to `destination`, which is only
    /// renamed into place once the whole body has been received.
    pub async fn download_short(
        &self,
        task_id: &TaskId,
        filename: &str,
        destination: &Path,
    ) -> ClientResult<u64> {
        let url = self.download_url(task_id, filename);
        info!("Downloading {} to {}", url, destination.display());

        let response = self.http.get(&url).send().await?;
        let mut response = Self::ensure_success(response).await?;

        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let partial = tempfile::Builder::new()
            .prefix(".dshorts-")
            .suffix(".part")
            .tempfile_in(dir)?;

        let mut out = tokio::fs::File::from_std(partial.as_file().try_clone()?);
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;
        drop(out);

        partial
            .persist(destination)
            .map_err(|e| ClientError::Io(e.error))?;
        debug!(bytes = written, "Download complete");

        Ok(written)
    }

    async fn ensure_success(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.unwrap_or_default();
        debug!(%status, body = %body, "Request failed");

        Err(ClientError::Status {
            status,
            detail: error_detail(content_type.as_deref(), &body),
        })
    }
}

/// Picks the part of an error body worth showing in the UI.
///
/// HTML pages from the server's `send_error` carry the reason in a
/// `Message: ...` paragraph. Plain text is used as is. Anything else is
/// dropped, leaving only the status line.
fn error_detail(content_type: Option<&str>, body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());
    let looks_like_markup = body.starts_with('<');

    let detail = match mime.as_deref() {
        Some("text/html") => html_error_message(body)?,
        Some("text/plain") => body.to_string(),
        None if looks_like_markup => html_error_message(body)?,
        None => body.to_string(),
        Some(_) => return None,
    };

    let detail = detail.split_whitespace().collect::<Vec<_>>().join(" ");
    if detail.is_empty() {
        return None;
    }
    Some(truncate_chars(&detail, MAX_ERROR_DETAIL_CHARS))
}

fn html_error_message(body: &str) -> Option<String> {
    const MARKER: &str = "Message:";
    let start = body.find(MARKER)? + MARKER.len();
    let rest = &body[start..];
    let end = rest.find('<').unwrap_or(rest.len());
    let message = rest[..end].trim().trim_end_matches('.').trim();
    if message.is_empty() {
        return None;
    }
    Some(
        message
            .replace("&quot;", "\"")
            .replace("&#x27;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&"),
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
