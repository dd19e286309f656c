//! Messages wrapper.

use super::{HistoryRequest, MessagesEndpoints, ReplaceBlockRequest, ReplaceOutcome, RepliesRequest, UpdateMessageRequest};
use crate::api_caller::ApiCaller;
use crate::errors::{SlackError, SlackResult};
use crate::pagination::paginate;
use crate::services::resolve_id;
use crate::types::{find_block, ChannelId, Message, MessageCoordinates, Timestamp, UpdatedMessage};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use futures::FutureExt;
use tracing::{debug, instrument};

/// Messages, optionally bound to a conversation or one message
#[derive(Debug, Clone)]
pub struct Messages {
    endpoints: MessagesEndpoints,
    coordinates: Option<MessageCoordinates>,
}

impl Messages {
    pub(crate) fn new(caller: ApiCaller, coordinates: Option<MessageCoordinates>) -> Self {
        Self {
            endpoints: MessagesEndpoints::new(caller),
            coordinates,
        }
    }

    /// Bound coordinates, if any
    pub fn coordinates(&self) -> Option<&MessageCoordinates> {
        self.coordinates.as_ref()
    }

    /// A wrapper bound to `coordinates`
    pub fn with_coordinates(&self, coordinates: MessageCoordinates) -> Self {
        Self {
            coordinates: Some(coordinates),
            ..self.clone()
        }
    }

    /// The endpoint layer
    pub fn endpoints(&self) -> &MessagesEndpoints {
        &self.endpoints
    }

    fn channel(&self, channel: Option<&str>) -> SlackResult<ChannelId> {
        let bound = self.coordinates.as_ref().map(|c| &c.channel);
        resolve_id(channel, bound, "channel")
    }

    fn ts(&self, ts: Option<&str>) -> SlackResult<Timestamp> {
        let bound = self.coordinates.as_ref().and_then(|c| c.ts.as_ref());
        resolve_id(ts, bound, "ts")
    }

    /// Update a message's text, blocks or attachments
    #[instrument(skip(self, request))]
    pub async fn update_message(&self, mut request: UpdateMessageRequest) -> SlackResult<UpdatedMessage> {
        request.channel = Some(self.channel(request.channel.as_ref().map(ChannelId::as_str))?);
        request.ts = Some(self.ts(request.ts.as_ref().map(Timestamp::as_str))?);
        self.endpoints.chat_update(&request).await
    }

    /// Delete the given or bound message
    #[instrument(skip(self))]
    pub async fn delete_message(&self, channel: Option<&str>, ts: Option<&str>) -> SlackResult<()> {
        let channel = self.channel(channel)?;
        let ts = self.ts(ts)?;
        self.endpoints.chat_delete(&channel, &ts).await
    }

    /// Messages of a conversation, newest first
    ///
    /// `request.limit` caps the number of messages yielded; pages stop being
    /// fetched once it is reached.
    pub fn get_messages(
        &self,
        mut request: HistoryRequest,
    ) -> SlackResult<BoxStream<'static, SlackResult<Message>>> {
        request.channel = Some(self.channel(request.channel.as_ref().map(ChannelId::as_str))?);
        let limit = request.limit;
        let endpoints = self.endpoints.clone();
        let messages = paginate(move |cursor: Option<String>| {
            let endpoints = endpoints.clone();
            let request = request.clone();
            async move { endpoints.conversations_history(&request, cursor).await }.boxed()
        });
        Ok(match limit {
            Some(limit) => messages.take(limit).boxed(),
            None => messages,
        })
    }

    /// Replies of a thread, parent first
    pub fn get_message_threads(
        &self,
        mut request: RepliesRequest,
    ) -> SlackResult<BoxStream<'static, SlackResult<Message>>> {
        request.channel = Some(self.channel(request.channel.as_ref().map(ChannelId::as_str))?);
        request.thread_ts = Some(self.ts(request.thread_ts.as_ref().map(Timestamp::as_str))?);
        let limit = request.limit;
        let endpoints = self.endpoints.clone();
        let replies = paginate(move |cursor: Option<String>| {
            let endpoints = endpoints.clone();
            let request = request.clone();
            async move { endpoints.conversations_replies(&request, cursor).await }.boxed()
        });
        Ok(match limit {
            Some(limit) => replies.take(limit).boxed(),
            None => replies,
        })
    }

    /// The message at exactly `ts`
    async fn fetch_message(&self, channel: &ChannelId, ts: &Timestamp) -> SlackResult<Message> {
        let request = HistoryRequest::new()
            .channel(channel.clone())
            .latest(ts.clone())
            .inclusive(true)
            .limit(1);
        let mut messages = self.get_messages(request)?;
        match messages.try_next().await? {
            Some(message) if message.ts == *ts => Ok(message),
            _ => Err(SlackError::not_found("message", format!("{channel}/{ts}"))),
        }
    }

    /// Replace the first block matching `block_id` (or `block_type`) and update the message
    ///
    /// Without `request.blocks` the message is fetched first. When nothing
    /// matches, no update is made and [`ReplaceOutcome::BlockNotFound`] is returned.
    #[instrument(skip(self, request), fields(block_id = ?request.block_id, block_type = ?request.block_type))]
    pub async fn replace_message_block(&self, request: ReplaceBlockRequest) -> SlackResult<ReplaceOutcome> {
        let (key, target) = match (&request.block_id, &request.block_type) {
            (Some(id), _) => ("block_id", id.clone()),
            (None, Some(ty)) => ("type", ty.clone()),
            (None, None) => {
                return Err(SlackError::invalid_argument(
                    "either block_id or block_type is required",
                ))
            }
        };
        let channel = self.channel(request.channel.as_ref().map(ChannelId::as_str))?;
        let ts = self.ts(request.ts.as_ref().map(Timestamp::as_str))?;

        let mut blocks = match &request.blocks {
            Some(blocks) => blocks.clone(),
            None => self.fetch_message(&channel, &ts).await?.blocks,
        };
        let Some(index) = find_block(&blocks, request.block_id.as_deref(), request.block_type.as_deref()) else {
            debug!(key, target = %target, "No matching block; message left unchanged");
            return Ok(ReplaceOutcome::BlockNotFound { key, target });
        };
        blocks[index] = request.replacement();

        let update = UpdateMessageRequest::new().message(channel, ts).blocks(blocks);
        Ok(ReplaceOutcome::Replaced(self.endpoints.chat_update(&update).await?))
    }
}
