//! Lazy pagination over cursor-style listings.
//!
//! A listing is described by a `fetch` closure that retrieves one page for
//! an optional cursor. [`paginate`] turns it into a stream of items that
//! requests the next page only when the previous one has been consumed.
//!
//! Slack uses several cursor styles: the Web API `next_cursor` string, the
//! Discovery `offset` string, SCIM's numeric `startIndex` and the page
//! numbers of `files.list`. The cursor type parameter covers all of them.

use crate::errors::{SlackError, SlackResult};
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, C = String> {
    /// Items in upstream order
    pub items: Vec<T>,
    /// Cursor of the following page; `None` on the last page
    pub next: Option<C>,
}

impl<T, C> Page<T, C> {
    /// Create a page
    pub fn new(items: Vec<T>, next: Option<C>) -> Self {
        Self { items, next }
    }

    /// A page with nothing after it
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

enum State<C> {
    Start,
    Next(C),
    Done,
}

/// Stream every item of a paginated listing
///
/// `fetch(None)` retrieves the first page, then `fetch(Some(cursor))` each
/// following page until a page carries no cursor. An error is yielded once
/// and ends the stream.
pub fn paginate<T, C, F>(fetch: F) -> BoxStream<'static, SlackResult<T>>
where
    T: Send + 'static,
    C: Send + 'static,
    F: Fn(Option<C>) -> BoxFuture<'static, SlackResult<Page<T, C>>> + Send + Sync + 'static,
{
    stream::try_unfold((fetch, State::Start), |(fetch, state)| async move {
        let cursor = match state {
            State::Start => None,
            State::Next(cursor) => Some(cursor),
            State::Done => return Ok::<_, SlackError>(None),
        };
        let page = fetch(cursor).await?;
        let next = match page.next {
            Some(cursor) => State::Next(cursor),
            None => State::Done,
        };
        let items = stream::iter(page.items.into_iter().map(Ok::<T, SlackError>));
        Ok(Some((items, (fetch, next))))
    })
    .try_flatten()
    .boxed()
}
