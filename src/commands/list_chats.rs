//! List chats command
//!
//! Prints every dialog with its ID, kind and display name so the user can
//! copy the right ID into the config.

use grammers_client::Client;

use crate::chat::{classify_peer, peer_id, peer_title};
use crate::error::Result;

/// Console label for a peer kind.
fn kind_label(kind: &str) -> &'static str {
    match kind {
        "channel" => "Канал",
        "group" => "Группа",
        _ => "Личный",
    }
}

/// Print all chats reachable by the account, in the order the server
/// yields them.
pub async fn run(client: &Client) -> Result<()> {
    println!("\nВаши чаты и каналы:\n");
    println!("{:<25} {:<12} {}", "ID", "Тип", "Название");
    println!("{}", "-".repeat(70));

    let mut dialogs = client.iter_dialogs();

    while let Some(dialog) = dialogs.next().await? {
        let peer = &dialog.peer;
        println!(
            "{:<25} {:<12} {}",
            peer_id(peer),
            kind_label(classify_peer(peer)),
            peer_title(peer)
        );
    }

    println!("\nСкопируйте нужный ID в config.yml -> chat_id");

    Ok(())
}
