//! Conversational state machine of the bot.
//!
//! `Dialogue` turns one incoming chat event into the replies the bot should
//! make. It knows nothing about the chat platform: the runner in the binary
//! translates platform updates into [`Event`]s and [`Reply`]s back into
//! platform calls.
//!
//! States per conversation: `Idle` and `AwaitingMessageText`. Pressing
//! "add message" moves to `AwaitingMessageText`; the next plain text is sent
//! to the message service and the conversation returns to `Idle` whether or
//! not the save succeeded.

use courier_types::conversation::{ConversationId, ConversationState};
use courier_types::message::{Message, MessagePage, NewMessage, PAGE_SIZE};
use tracing::{info, warn};

use crate::bot::api::{MessageApi, fetch_page};
use crate::bot::session::SessionStore;
use crate::message::pagination::PageNavExt;

pub const GREETING: &str = "Hi! What would you like to do?";
pub const ADD_MESSAGE_LABEL: &str = "Add message";
pub const READ_MESSAGES_LABEL: &str = "Read messages";
pub const NEXT_PAGE_LABEL: &str = "Next page";
pub const PREV_PAGE_LABEL: &str = "Previous page";
pub const ENTER_MESSAGE_PROMPT: &str = "Enter the message you want to save:";
pub const SAVED: &str = "Your message has been saved!";
pub const SAVE_FAILED: &str = "An error occurred while saving the message.";
pub const FETCH_FAILED: &str = "An error occurred while fetching messages.";
pub const NO_MESSAGES_YET: &str = "There are no messages yet.";
pub const NO_MORE_MESSAGES: &str = "There are no more messages.";
pub const IDLE_HINT: &str = "Send /start to add or read messages.";

/// Who sent an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl Author {
    /// Name recorded as the message author: the platform username, else the
    /// first name, else a synthetic `user<id>`.
    pub fn display_name(&self) -> String {
        [self.username.as_deref(), self.first_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("user{}", self.id))
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// The `/start` command.
    Start,
    /// Any other text.
    Text(String),
    /// An inline button press on the bot message `message_id`.
    Callback { data: String, message_id: i64 },
}

/// One incoming chat event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub conversation: ConversationId,
    pub author: Author,
    pub incoming: Incoming,
}

/// An inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    fn new(label: &str, action: CallbackAction) -> Self {
        Self {
            label: label.to_string(),
            data: action.to_data(),
        }
    }
}

/// Something the bot should do in response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Post a new message.
    Send {
        text: String,
        keyboard: Vec<Vec<Button>>,
    },
    /// Replace the text and keyboard of an earlier bot message.
    Edit {
        message_id: i64,
        text: String,
        keyboard: Vec<Vec<Button>>,
    },
}

impl Reply {
    fn text(text: &str) -> Self {
        Reply::Send {
            text: text.to_string(),
            keyboard: Vec::new(),
        }
    }
}

/// Parsed inline button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    AddMessage,
    ReadMessages,
    NextPage(usize),
    PrevPage(usize),
}

impl CallbackAction {
    /// Parse callback data such as `add_message` or `next_page:2`.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "add_message" => return Some(CallbackAction::AddMessage),
            "read_messages" => return Some(CallbackAction::ReadMessages),
            _ => {}
        }
        let (kind, page) = data.split_once(':')?;
        let page = page.parse().ok()?;
        match kind {
            "next_page" => Some(CallbackAction::NextPage(page)),
            "prev_page" => Some(CallbackAction::PrevPage(page)),
            _ => None,
        }
    }

    pub fn to_data(self) -> String {
        match self {
            CallbackAction::AddMessage => "add_message".to_string(),
            CallbackAction::ReadMessages => "read_messages".to_string(),
            CallbackAction::NextPage(page) => format!("next_page:{page}"),
            CallbackAction::PrevPage(page) => format!("prev_page:{page}"),
        }
    }
}

/// The bot's conversation handler.
pub struct Dialogue<A: MessageApi, S: SessionStore> {
    api: A,
    sessions: S,
}

impl<A: MessageApi, S: SessionStore> Dialogue<A, S> {
    pub fn new(api: A, sessions: S) -> Self {
        Self { api, sessions }
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Handle one event and return the replies to make, in order.
    pub async fn handle(&self, event: Event) -> Vec<Reply> {
        match event.incoming {
            Incoming::Start => {
                self.sessions.clear(event.conversation);
                vec![Reply::Send {
                    text: GREETING.to_string(),
                    keyboard: vec![vec![
                        Button::new(ADD_MESSAGE_LABEL, CallbackAction::AddMessage),
                        Button::new(READ_MESSAGES_LABEL, CallbackAction::ReadMessages),
                    ]],
                }]
            }
            Incoming::Text(text) => self.on_text(event.conversation, &event.author, text).await,
            Incoming::Callback { data, message_id } => match CallbackAction::parse(&data) {
                Some(action) => self.on_action(event.conversation, action, message_id).await,
                None => {
                    warn!(conversation = %event.conversation, data = %data, "Unknown callback data");
                    Vec::new()
                }
            },
        }
    }

    async fn on_text(&self, conversation: ConversationId, author: &Author, text: String) -> Vec<Reply> {
        if self.sessions.state(conversation) != ConversationState::AwaitingMessageText {
            return vec![Reply::text(IDLE_HINT)];
        }

        info!(conversation = %conversation, "Saving message from user");
        let message = NewMessage::new(author.display_name(), text);
        let reply = match self.api.append_message(&message).await {
            Ok(()) => SAVED,
            Err(e) => {
                warn!(conversation = %conversation, error = %e, "Failed to save message");
                SAVE_FAILED
            }
        };

        self.sessions.clear(conversation);
        vec![Reply::text(reply)]
    }

    async fn on_action(
        &self,
        conversation: ConversationId,
        action: CallbackAction,
        message_id: i64,
    ) -> Vec<Reply> {
        match action {
            CallbackAction::AddMessage => {
                self.sessions
                    .set_state(conversation, ConversationState::AwaitingMessageText);
                vec![Reply::text(ENTER_MESSAGE_PROMPT)]
            }
            CallbackAction::ReadMessages => vec![self.show_page(0, None).await],
            CallbackAction::NextPage(page) | CallbackAction::PrevPage(page) => {
                info!(conversation = %conversation, page, "Loading page");
                vec![self.show_page(page, Some(message_id)).await]
            }
        }
    }

    /// Render `page`, as a new message or by editing `edit`.
    async fn show_page(&self, page: usize, edit: Option<i64>) -> Reply {
        let page = match fetch_page(&self.api, page).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Failed to fetch messages");
                return Reply::text(FETCH_FAILED);
            }
        };

        if page.messages.is_empty() {
            return Reply::text(if edit.is_some() {
                NO_MORE_MESSAGES
            } else {
                NO_MESSAGES_YET
            });
        }

        let text = render_page(&page);
        let keyboard = page_keyboard(&page);
        match edit {
            Some(message_id) => Reply::Edit {
                message_id,
                text,
                keyboard,
            },
            None => Reply::Send { text, keyboard },
        }
    }
}

/// `username (timestamp): text`, one message per line.
pub fn render_page(page: &MessagePage) -> String {
    page.messages
        .iter()
        .map(render_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_line(message: &Message) -> String {
    format!("{} ({}): {}", message.username, message.timestamp, message.text)
}

/// Previous/next controls, one button per row.
fn page_keyboard(page: &MessagePage) -> Vec<Vec<Button>> {
    let mut rows = Vec::new();
    if page.has_previous() {
        rows.push(vec![Button::new(
            PREV_PAGE_LABEL,
            CallbackAction::PrevPage(page.page - 1),
        )]);
    }
    if page.has_next(PAGE_SIZE) {
        rows.push(vec![Button::new(
            NEXT_PAGE_LABEL,
            CallbackAction::NextPage(page.page + 1),
        )]);
    }
    rows
}
