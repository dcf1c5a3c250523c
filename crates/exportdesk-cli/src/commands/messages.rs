//! Contact inbox commands.

use serde::Serialize;

use exportdesk_core::resources::{resolve_phone, Message, Messages, ResourceClient};
use exportdesk_core::routes::Route;

use crate::cli::MessageCommands;
use crate::commands::common;
use crate::error::CliError;
use crate::session_store::KeyringSessionStore;

pub async fn run_messages(
    api_url: Option<&str>,
    command: MessageCommands,
) -> Result<(), CliError> {
    let credentials = common::credential_store()?;
    common::require_admission(&credentials, Route::Messages)?;

    let config = common::resolve_config(api_url)?;
    let client: ResourceClient<Messages, KeyringSessionStore> =
        ResourceClient::new(config, credentials)?;

    match command {
        MessageCommands::List { json } => run_list(&client, json).await,
        MessageCommands::Delete { id, yes } => {
            if !common::confirm("Are you sure you want to delete this message?", yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            client.remove(&id).await?;
            let messages = client.list().await?;
            println!("Message deleted ({} in inbox).", messages.len());
            Ok(())
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageListItem {
    id: String,
    name: String,
    email: String,
    subject: Option<String>,
    phone: String,
    message: String,
    created_at: Option<String>,
}

async fn run_list(
    client: &ResourceClient<Messages, KeyringSessionStore>,
    as_json: bool,
) -> Result<(), CliError> {
    let messages = client.list().await?;

    if as_json {
        let items = messages
            .iter()
            .map(message_to_list_item)
            .collect::<Vec<MessageListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }
    for block in messages.iter().map(format_message_block) {
        println!("{block}");
    }
    Ok(())
}

fn message_to_list_item(message: &Message) -> MessageListItem {
    MessageListItem {
        id: message.id.clone(),
        name: message.name.clone(),
        email: message.email.clone(),
        subject: message.subject.clone(),
        phone: resolve_phone(&message.phone).display(),
        message: message.message.clone(),
        created_at: message.created_at.map(|at| at.to_rfc3339()),
    }
}

fn format_message_block(message: &Message) -> String {
    let phone = resolve_phone(&message.phone).display();
    let received = common::timestamp_column(message.created_at);
    let subject = message.subject.as_deref().unwrap_or("-");
    format!(
        "{}  {} <{}>  {received}\n    {phone}  {subject}\n    {}",
        message.id,
        message.name,
        message.email,
        common::preview(&message.message, 80),
    )
}
