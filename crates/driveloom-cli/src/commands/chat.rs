use std::io::Write;

use driveloom_chat::{ChatEvent, ChatRequest, ChatService};
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    chat: &ChatService,
    folder_id: Uuid,
    tenant_id: Uuid,
    conversation_id: Option<Uuid>,
    message: String,
    agent_mode: bool,
    max_iterations: Option<u32>,
) -> anyhow::Result<()> {
    let request = ChatRequest { folder_id, tenant_id, conversation_id, message, agent_mode, max_iterations };
    let mut handle = chat.chat(request).await?;

    while let Some(event) = handle.events.recv().await {
        match event {
            ChatEvent::Token { text } => {
                print!("{text}");
                std::io::stdout().flush().ok();
            }
            ChatEvent::Status { agent_status } => {
                eprintln!("\n[{:?} iteration {}]", agent_status.phase, agent_status.iteration);
            }
            ChatEvent::Done { citations, searched_files, conversation_id } => {
                println!();
                if !citations.is_empty() {
                    println!("\ncitations:");
                    for (marker, citation) in &citations {
                        println!("  [{marker}] {} ({:?})", citation.file_name, citation.location);
                    }
                }
                if !searched_files.is_empty() {
                    println!("searched files: {}", searched_files.join(", "));
                }
                println!("conversation: {conversation_id}");
            }
            ChatEvent::Error { kind, message } => {
                anyhow::bail!("{kind}: {message}");
            }
        }
    }

    Ok(())
}
