//! Client-side port to the message service.

use courier_types::error::ClientError;
use courier_types::message::{Message, MessagePage, NewMessage, PAGE_SIZE};

use crate::message::pagination::paginate;

/// The two operations the message service exposes over the network.
pub trait MessageApi: Send + Sync {
    /// Fetch the full (capped) ordered message list.
    fn list_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, ClientError>> + Send;

    /// Submit a new message.
    fn append_message(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;
}

/// Fetch everything and slice out page `page` locally.
pub async fn fetch_page<A: MessageApi>(api: &A, page: usize) -> Result<MessagePage, ClientError> {
    let messages = api.list_messages().await?;
    Ok(paginate(&messages, page, PAGE_SIZE))
}
