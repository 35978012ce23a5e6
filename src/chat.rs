//! Chat resolution and dialog helpers

use grammers_client::types::peer::Peer;
use grammers_client::Client;

use crate::error::{Error, Result};

/// Resolve a chat by its numeric ID.
///
/// The chat must be present in the account's dialogs; IDs are the same ones
/// printed by `--list-chats`.
pub async fn resolve_by_id(client: &Client, chat_id: i64) -> Result<Peer> {
    tracing::info!("Resolving chat {}...", chat_id);

    let mut dialogs = client.iter_dialogs();

    while let Some(dialog) = dialogs.next().await? {
        if peer_id(&dialog.peer) == chat_id {
            return Ok(dialog.peer.clone());
        }
    }

    Err(Error::ChatNotFound(format!(
        "Chat {} not found in dialogs",
        chat_id
    )))
}

/// Classify a peer into channel / group / direct conversation.
pub fn classify_peer(peer: &Peer) -> &'static str {
    match peer {
        Peer::Channel(_) => "channel",
        Peer::Group(_) => "group",
        Peer::User(_) => "direct",
    }
}

/// Get the display name for a peer
pub fn peer_title(peer: &Peer) -> String {
    match peer {
        Peer::Channel(c) => c.title().to_string(),
        Peer::Group(g) => g.title().unwrap_or("Group").to_string(),
        Peer::User(u) => u.full_name(),
    }
}

/// Extract the numeric ID from a peer.
pub fn peer_id(peer: &Peer) -> i64 {
    match peer {
        Peer::Channel(c) => c.raw.id,
        Peer::Group(g) => match &g.raw {
            grammers_tl_types::enums::Chat::Empty(c) => c.id,
            grammers_tl_types::enums::Chat::Chat(c) => c.id,
            grammers_tl_types::enums::Chat::Forbidden(c) => c.id,
            grammers_tl_types::enums::Chat::Channel(c) => c.id,
            grammers_tl_types::enums::Chat::ChannelForbidden(c) => c.id,
        },
        Peer::User(u) => u.raw.id(),
    }
}
