//! Files wrapper.

use super::{FilesEndpoints, ListFilesRequest, UploadRequest};
use crate::api_caller::ApiCaller;
use crate::errors::{ResponseError, SlackError, SlackResult};
use crate::pagination::paginate;
use crate::services::messages::HistoryRequest;
use crate::services::resolve_id;
use crate::types::{File, FileDetails, FileId, Message, MessageCoordinates};
use futures::stream::{BoxStream, TryStreamExt};
use futures::FutureExt;
use tracing::{debug, info, instrument};

/// Messages scanned by `get_file_source_message` when no limit is given
pub const DEFAULT_SOURCE_SCAN: usize = 5;

/// Files, optionally bound to one file
#[derive(Debug, Clone)]
pub struct Files {
    endpoints: FilesEndpoints,
    file_id: Option<FileId>,
}

impl Files {
    pub(crate) fn new(caller: ApiCaller, file_id: Option<FileId>) -> Self {
        Self {
            endpoints: FilesEndpoints::new(caller),
            file_id,
        }
    }

    /// Bound file id, if any
    pub fn file_id(&self) -> Option<&FileId> {
        self.file_id.as_ref()
    }

    /// A wrapper bound to `file_id`
    pub fn with_file(&self, file_id: impl Into<FileId>) -> Self {
        Self {
            file_id: Some(file_id.into()),
            ..self.clone()
        }
    }

    /// The endpoint layer
    pub fn endpoints(&self) -> &FilesEndpoints {
        &self.endpoints
    }

    fn resolve(&self, file_id: Option<&str>) -> SlackResult<FileId> {
        resolve_id(file_id, self.file_id.as_ref(), "file_id")
    }

    /// File metadata with comments from every page
    #[instrument(skip(self))]
    pub async fn get_file_info(&self, file_id: Option<&str>) -> SlackResult<FileDetails> {
        let fid = self.resolve(file_id)?;
        let (file, mut page) = self.endpoints.files_info(&fid, None).await?;
        let mut comments = std::mem::take(&mut page.items);
        while let Some(cursor) = page.next.take() {
            let (_, next) = self.endpoints.files_info(&fid, Some(cursor)).await?;
            page = next;
            comments.append(&mut page.items);
        }
        Ok(FileDetails { file, comments })
    }

    /// Delete the given or bound file
    #[instrument(skip(self))]
    pub async fn delete_file(&self, file_id: Option<&str>) -> SlackResult<()> {
        let fid = self.resolve(file_id)?;
        self.endpoints.files_delete(&fid).await
    }

    /// Every file matching `request`
    pub fn list_files(&self, request: ListFilesRequest) -> BoxStream<'static, SlackResult<File>> {
        let endpoints = self.endpoints.clone();
        paginate(move |page: Option<u32>| {
            let endpoints = endpoints.clone();
            let request = request.clone();
            async move { endpoints.files_list(&request, page).await }.boxed()
        })
    }

    /// Upload content and share it, returning the new file's id
    ///
    /// Reserves an upload URL, sends the bytes there, then completes the
    /// upload with the title and sharing options.
    #[instrument(skip(self, request), fields(filename = %request.filename, bytes = request.content.len()))]
    pub async fn upload_to_slack(&self, request: UploadRequest) -> SlackResult<FileId> {
        if request.filename.trim().is_empty() {
            return Err(SlackError::invalid_argument("filename is required"));
        }
        let ticket = self
            .endpoints
            .files_get_upload_url_external(&request.filename, request.content.len())
            .await?;
        self.endpoints
            .upload_bytes(&ticket.upload_url, request.content.clone(), &request.resolved_content_type())
            .await?;
        let files = self
            .endpoints
            .files_complete_upload_external(&ticket.file_id, &request)
            .await?;
        let id = files
            .into_iter()
            .next()
            .map(|f| f.id)
            .unwrap_or(ticket.file_id);
        info!(file = %id, "Uploaded file");
        Ok(id)
    }

    /// Content of a `text/*` file
    #[instrument(skip(self))]
    pub async fn get_text_content(&self, file_id: Option<&str>) -> SlackResult<String> {
        let fid = self.resolve(file_id)?;
        let (file, _) = self.endpoints.files_info(&fid, None).await?;
        if !file.is_text() {
            return Err(SlackError::invalid_argument(format!(
                "file {} is {} ({}), not text/*",
                file.name.as_deref().unwrap_or(fid.as_str()),
                file.mimetype.as_deref().unwrap_or("of unknown type"),
                file.pretty_type.as_deref().unwrap_or("unknown"),
            )));
        }
        let url = file
            .url_private
            .as_deref()
            .ok_or_else(|| SlackError::invalid_argument(format!("file {fid} has no url_private")))?;
        let bytes = self.endpoints.download(url).await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            SlackError::Response(ResponseError::DeserializationError {
                message: format!("file {fid} is not valid UTF-8: {e}"),
            })
        })
    }

    /// Most recent message in `channel` that carries the file
    ///
    /// Scans at most `limit` messages, newest first.
    #[instrument(skip(self))]
    pub async fn get_file_source_message(
        &self,
        channel: &str,
        file_id: Option<&str>,
        limit: Option<usize>,
    ) -> SlackResult<Message> {
        let fid = self.resolve(file_id)?;
        let limit = limit.unwrap_or(DEFAULT_SOURCE_SCAN);
        let messages = self.endpoints.messages(MessageCoordinates::channel(channel));
        let mut history = messages.get_messages(HistoryRequest::new().limit(limit))?;
        while let Some(message) = history.try_next().await? {
            if message.carries_file(fid.as_str()) {
                return Ok(message);
            }
        }
        debug!(file = %fid, channel, limit, "File not found in recent history");
        Err(SlackError::not_found("source message", format!("{fid} in {channel}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, responses};
    use crate::mocks::{MockHttpTransport, MockResponse};
    use http::Method;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn files(mock: &Arc<MockHttpTransport>) -> Files {
        Files::new(fixtures::caller(mock), None)
    }

    #[tokio::test(start_paused = true)]
    async fn test_file_info_merges_comment_pages() {
        let mock = Arc::new(MockHttpTransport::new());
        let file = fixtures::file();
        mock.push_response(MockResponse::ok_json(responses::file_info(
            &file,
            json!([{"id": "Fc1", "comment": "first"}]),
            "c2",
        )));
        mock.push_response(MockResponse::ok_json(responses::file_info(
            &file,
            json!([{"id": "Fc2", "comment": "second"}]),
            "",
        )));

        let details = files(&mock).with_file(file.id.clone()).get_file_info(None).await.unwrap();

        assert_eq!(details.file, file);
        let ids: Vec<_> = details.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["Fc1", "Fc2"]);
        assert_eq!(mock.requests()[1].param("cursor"), Some(&json!("c2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_files_follows_pages() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(json!({
            "files": [{"id": "F1"}, {"id": "F2"}],
            "paging": {"page": 1, "pages": 2}
        })));
        mock.push_response(MockResponse::ok_json(json!({
            "files": [{"id": "F3"}],
            "paging": {"page": 2, "pages": 2}
        })));

        let ids: Vec<String> = files(&mock)
            .list_files(ListFilesRequest::new().channel("C1"))
            .map_ok(|f| f.id.to_string())
            .try_collect()
            .await
            .unwrap();

        assert_eq!(ids, vec!["F1", "F2", "F3"]);
        assert_eq!(mock.requests()[0].param("page"), None);
        assert_eq!(mock.requests()[1].param("page"), Some(&json!(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_three_steps() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(
            json!({"upload_url": "https://files.slack.com/upload/v1/abc", "file_id": "F9"}),
        ));
        mock.push_response(MockResponse::text(200, "OK - 5"));
        mock.push_response(MockResponse::ok_json(json!({"files": [{"id": "F9", "title": "Hello"}]})));

        let id = files(&mock)
            .upload_to_slack(
                UploadRequest::new("hello", "hello.txt")
                    .title("Hello")
                    .channel("C1"),
            )
            .await
            .unwrap();

        assert_eq!(id, "F9");
        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(requests[1].url, "https://files.slack.com/upload/v1/abc");
        assert_eq!(requests[1].raw_body.as_deref(), Some(&b"hello"[..]));
        assert_eq!(requests[1].raw_content_type.as_deref(), Some("text/plain"));
        assert_eq!(
            requests[2].body,
            Some(json!({"files": [{"id": "F9", "title": "Hello"}], "channel_id": "C1"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_content_downloads_private_url() {
        let mock = Arc::new(MockHttpTransport::new());
        let file = fixtures::file();
        mock.push_response(MockResponse::ok_json(responses::file_info(&file, json!([]), "")));
        mock.push_response(MockResponse::bytes("hello, notes", "text/plain"));

        let text = files(&mock).get_text_content(Some(file.id.as_str())).await.unwrap();

        assert_eq!(text, "hello, notes");
        let download = mock.last_request().unwrap();
        assert_eq!(Some(download.url.as_str()), file.url_private.as_deref());
        assert_eq!(download.header("authorization"), Some("Bearer xoxb-test-bot"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_content_rejects_images() {
        let mock = Arc::new(MockHttpTransport::new());
        let image = fixtures::image_file();
        mock.push_response(MockResponse::ok_json(responses::file_info(&image, json!([]), "")));

        let err = files(&mock)
            .get_text_content(Some(image.id.as_str()))
            .await
            .unwrap_err();

        assert!(matches!(err, SlackError::InvalidArgument { .. }));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_message_found_and_missing() {
        let mock = Arc::new(MockHttpTransport::new());
        let carrier = Message {
            files: vec![fixtures::file()],
            ..fixtures::message()
        };
        mock.push_response(MockResponse::ok_json(responses::history(
            &[fixtures::message(), carrier.clone()],
            "",
        )));
        mock.push_response(MockResponse::ok_json(responses::history(&[fixtures::message()], "")));
        let files = files(&mock).with_file("F1234567890");

        let found = files.get_file_source_message("C1", None, None).await.unwrap();
        let missing = files.get_file_source_message("C1", None, Some(1)).await.unwrap_err();

        assert_eq!(found, carrier);
        assert!(matches!(missing, SlackError::NotFound { .. }));
        assert_eq!(mock.requests()[0].param("limit"), Some(&json!(5)));
    }
}
