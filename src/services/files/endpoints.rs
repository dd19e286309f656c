//! One method per files endpoint, plus the raw transfers.

use super::{ListFilesRequest, UploadRequest};
use crate::api_caller::{ApiCaller, ApiRequest};
use crate::auth::TokenKind;
use crate::errors::SlackResult;
use crate::pagination::Page;
use crate::rate_limits::RateTier;
use crate::services::messages::Messages;
use crate::services::to_params;
use crate::types::{File, FileComment, FileId, MessageCoordinates};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

/// Presigned destination returned by `files.getUploadURLExternal`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadTicket {
    /// Where to send the bytes
    pub upload_url: String,
    /// Id the file will have
    pub file_id: FileId,
}

#[derive(Debug, Default, Deserialize)]
struct Paging {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    pages: u32,
}

/// Endpoints behind the files wrapper
#[derive(Debug, Clone)]
pub struct FilesEndpoints {
    caller: ApiCaller,
}

impl FilesEndpoints {
    pub(crate) fn new(caller: ApiCaller) -> Self {
        Self { caller }
    }

    /// Messages wrapper sharing this caller
    pub(crate) fn messages(&self, coordinates: MessageCoordinates) -> Messages {
        Messages::new(self.caller.clone(), Some(coordinates))
    }

    /// `files.info`, one page of comments
    #[instrument(skip(self))]
    pub async fn files_info(
        &self,
        file: &FileId,
        cursor: Option<String>,
    ) -> SlackResult<(File, Page<FileComment>)> {
        let request = ApiRequest::web("files.info")
            .rate_tier(RateTier::Tier4)
            .param("file", file.as_str())
            .opt_param("cursor", cursor);
        let response = self.caller.call(request).await?;
        let comments = Page::new(response.field_or_default("comments")?, response.next_cursor());
        Ok((response.field("file")?, comments))
    }

    /// `files.delete`
    #[instrument(skip(self))]
    pub async fn files_delete(&self, file: &FileId) -> SlackResult<()> {
        let request = ApiRequest::web("files.delete")
            .rate_tier(RateTier::Tier3)
            .param("file", file.as_str());
        self.caller.call(request).await.map(|_| ())
    }

    /// `files.list`, one numbered page
    #[instrument(skip(self, request))]
    pub async fn files_list(
        &self,
        request: &ListFilesRequest,
        page: Option<u32>,
    ) -> SlackResult<Page<File, u32>> {
        let call = ApiRequest::web("files.list")
            .rate_tier(RateTier::Tier3)
            .params(to_params(request)?)
            .opt_param("page", page);
        let response = self.caller.call(call).await?;
        let paging: Paging = response.field_or_default("paging")?;
        let next = (paging.page < paging.pages).then_some(paging.page + 1);
        Ok(Page::new(response.field_or_default("files")?, next))
    }

    /// `files.getUploadURLExternal`
    #[instrument(skip(self))]
    pub async fn files_get_upload_url_external(
        &self,
        filename: &str,
        length: usize,
    ) -> SlackResult<UploadTicket> {
        let request = ApiRequest::web("files.getUploadURLExternal")
            .rate_tier(RateTier::Tier4)
            .param("filename", filename)
            .param("length", length);
        self.caller.call(request).await?.decode()
    }

    /// `files.completeUploadExternal`
    #[instrument(skip(self, upload), fields(filename = %upload.filename))]
    pub async fn files_complete_upload_external(
        &self,
        file: &FileId,
        upload: &UploadRequest,
    ) -> SlackResult<Vec<File>> {
        let title = upload.title.as_deref().unwrap_or(&upload.filename);
        let request = ApiRequest::web("files.completeUploadExternal")
            .rate_tier(RateTier::Tier4)
            .param("files", json!([{"id": file.as_str(), "title": title}]))
            .opt_param("channel_id", upload.channel.as_ref().map(|c| c.as_str()))
            .opt_param("thread_ts", upload.thread_ts.as_ref().map(|t| t.as_str()))
            .opt_param("initial_comment", upload.initial_comment.as_deref());
        self.caller.call(request).await?.field_or_default("files")
    }

    /// Send file bytes to a presigned URL
    pub async fn upload_bytes(&self, url: &str, content: Bytes, content_type: &str) -> SlackResult<()> {
        self.caller.upload(url, content, content_type, TokenKind::Bot).await
    }

    /// Fetch a private file URL with the bot token
    pub async fn download(&self, url: &str) -> SlackResult<Bytes> {
        self.caller.download(url, TokenKind::Bot).await
    }
}
