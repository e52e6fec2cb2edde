//! `courier messages` subcommands: list and add messages from the terminal.

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use courier_core::bot::api::MessageApi;
use courier_core::message::pagination::{PageNavExt, paginate};
use courier_infra::client::HttpMessageApi;
use courier_types::message::{Message, NewMessage, PAGE_SIZE};

use crate::state::AppState;

#[derive(Subcommand)]
pub enum MessagesCommand {
    /// Show stored messages, oldest first.
    #[command(alias = "ls")]
    List {
        /// Show only this zero-based page of five messages.
        #[arg(long)]
        page: Option<usize>,
    },

    /// Append a message.
    Add {
        /// Author name.
        username: String,
        /// Message text.
        text: String,
    },
}

/// Dispatch a messages subcommand.
///
/// `api_url` is the running API server, used for writes when the snapshot
/// cache is private to each process.
pub async fn handle_messages_command(
    action: MessagesCommand,
    state: &AppState,
    api_url: &str,
    json: bool,
) -> Result<()> {
    match action {
        MessagesCommand::List { page } => list_messages(state, page, json).await,
        MessagesCommand::Add { username, text } => {
            let new = NewMessage::new(username, text);
            if state.message_service.cache().is_shared() {
                add_message(state, new, json).await
            } else {
                add_message_via_server(api_url, new, json).await
            }
        }
    }
}

async fn list_messages(state: &AppState, page: Option<usize>, json: bool) -> Result<()> {
    let messages = state.message_service.list_messages().await?;

    let (shown, footer) = match page {
        Some(page) => {
            let page = paginate(&messages, page, PAGE_SIZE);
            let footer = page_footer(page.page, page.has_previous(), page.has_next(PAGE_SIZE));
            (page.messages, Some(footer))
        }
        None => (messages.clone(), None),
    };

    if json {
        let result = serde_json::json!({
            "messages": shown,
            "count": shown.len(),
            "total": messages.len(),
            "page": page,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!();
        let notice = if messages.is_empty() {
            "There are no messages yet."
        } else {
            "There are no more messages."
        };
        println!("  {} {}", style("i").blue().bold(), notice);
        println!("     Add one with: courier messages add <username> <text>");
        println!();
        return Ok(());
    }

    println!();
    println!("  Messages ({} of {})", shown.len(), messages.len());
    println!();
    println!("{}", message_table(&shown));

    if let Some(footer) = footer {
        println!();
        println!("  {}", style(footer).dim());
    }
    println!();

    Ok(())
}

async fn add_message(state: &AppState, new: NewMessage, json: bool) -> Result<()> {
    let message = state.message_service.append_message(new).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&message)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Message from {} saved at {}",
        style("✓").green().bold(),
        style(&message.username).cyan(),
        style(&message.timestamp).dim(),
    );
    println!();

    Ok(())
}

/// Hand the write to the API server so that its in-process snapshot is
/// invalidated. Writing the store from here would leave it stale.
async fn add_message_via_server(api_url: &str, new: NewMessage, json: bool) -> Result<()> {
    let api = HttpMessageApi::new(api_url)?;
    api.append_message(&new).await.with_context(|| {
        format!(
            "could not add the message through {api_url}: start `courier serve` \
             or configure a shared cache with --cache-url"
        )
    })?;

    if json {
        let result = serde_json::json!({
            "username": new.username,
            "text": new.text,
            "server": api_url,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Message from {} sent to {}",
        style("✓").green().bold(),
        style(&new.username).cyan(),
        style(api_url).dim(),
    );
    println!();

    Ok(())
}

fn message_table(messages: &[Message]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Author").fg(Color::White),
        Cell::new("Text").fg(Color::White),
    ]);

    for message in messages {
        table.add_row(vec![
            Cell::new(&message.timestamp).fg(Color::DarkGrey),
            Cell::new(&message.username).fg(Color::Cyan),
            Cell::new(&message.text),
        ]);
    }

    table
}

fn page_footer(page: usize, has_previous: bool, has_next: bool) -> String {
    let mut footer = format!("Page {page}");
    if has_previous {
        footer.push_str(&format!(" | previous: --page {}", page - 1));
    }
    if has_next {
        footer.push_str(&format!(" | next: --page {}", page + 1));
    }
    footer
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_types::config::CourierConfig;

    use crate::http::router::serve_on_ephemeral_port;
    use crate::state::test_state;

    /// Nothing listens on the discard port.
    const UNUSED_URL: &str = "http://127.0.0.1:9";

    #[test]
    fn test_page_footer() {
        assert_eq!(page_footer(0, false, true), "Page 0 | next: --page 1");
        assert_eq!(
            page_footer(1, true, true),
            "Page 1 | previous: --page 0 | next: --page 2"
        );
        assert_eq!(page_footer(2, true, false), "Page 2 | previous: --page 1");
    }

    #[test]
    fn test_message_table_has_a_row_per_message() {
        let messages = vec![
            Message {
                username: "alice".into(),
                text: "hi".into(),
                timestamp: "2024-03-10 12:00:00".into(),
            },
            Message {
                username: "bob".into(),
                text: "hey".into(),
                timestamp: "2024-03-10 12:00:01".into(),
            },
        ];
        assert_eq!(message_table(&messages).row_iter().count(), 2);
    }

    #[tokio::test]
    async fn test_list_page_through_command() {
        let (state, _tmp) = test_state().await;
        for i in 0..6 {
            state
                .message_service
                .append_message(NewMessage::new("alice", format!("m{i}")))
                .await
                .unwrap();
        }

        handle_messages_command(MessagesCommand::List { page: Some(1) }, &state, UNUSED_URL, true)
            .await
            .unwrap();
        handle_messages_command(MessagesCommand::List { page: None }, &state, UNUSED_URL, false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_without_shared_cache_is_visible_to_running_server() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = CourierConfig::default();
        let server = AppState::init(&config, tmp.path()).await.unwrap();
        let terminal = AppState::init(&config, tmp.path()).await.unwrap();

        // The server holds a snapshot of the empty store.
        assert!(server.message_service.list_messages().await.unwrap().is_empty());
        let base_url = serve_on_ephemeral_port(server.clone()).await;

        handle_messages_command(
            MessagesCommand::Add {
                username: "alice".into(),
                text: "hi".into(),
            },
            &terminal,
            &base_url,
            true,
        )
        .await
        .unwrap();

        let messages = server.message_service.list_messages().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].username, "alice");
        assert_eq!(messages[0].text, "hi");
    }

    #[tokio::test]
    async fn test_add_without_server_fails_and_stores_nothing() {
        let (state, _tmp) = test_state().await;

        let result = handle_messages_command(
            MessagesCommand::Add {
                username: "alice".into(),
                text: "lost".into(),
            },
            &state,
            UNUSED_URL,
            false,
        )
        .await;
        assert!(result.is_err());

        assert!(state.message_service.list_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_blank_username() {
        let (state, _tmp) = test_state().await;
        let base_url = serve_on_ephemeral_port(state.clone()).await;

        let result = handle_messages_command(
            MessagesCommand::Add {
                username: " ".into(),
                text: "text".into(),
            },
            &state,
            &base_url,
            false,
        )
        .await;
        assert!(result.is_err());
        assert!(state.message_service.list_messages().await.unwrap().is_empty());
    }
}
