//! Stream an answer about one policy, then compare two policies.
//!
//! Point it at a running dashboard API and run:
//!   POLICY_CHAT_BASE_URL=http://localhost:5000 cargo run --example ask -- "Am I covered for hail?"

use futures::StreamExt;
use policy_chat_stream::markup::{Block, blocks};
use policy_chat_stream::{ChatClient, ChatThread};
use policy_chat_types::StreamEvent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What does my policy exclude?".to_string());

    let client = ChatClient::from_env()?;
    let mut thread = ChatThread::new();

    let mut handle = thread.ask(&client, question, Some(1)).await;
    let mut answer = String::new();
    while let Some(event) = handle.receiver.next().await {
        thread.observe(&event);
        match event {
            StreamEvent::Render(render) => answer = render.text,
            StreamEvent::ConversationId(id) => println!("[conversation {id}]"),
            StreamEvent::Error(e) => {
                eprintln!("error: {e}");
                return Ok(());
            }
        }
    }
    print_blocks(&answer);

    let transcript = thread
        .compare(&client, "How do these two policies differ?", [1, 2])
        .await
        .collect()
        .await;
    match transcript.error {
        Some(e) => eprintln!("error: {e}"),
        None => print_blocks(&transcript.text),
    }

    for convo in client.conversations().await? {
        println!("{}  {}  ({})", convo.updated_at, convo.title, convo.workflow);
    }

    Ok(())
}

fn print_blocks(text: &str) {
    for block in blocks(text) {
        match block {
            Block::Paragraph(p) => println!("{p}\n"),
            Block::List(items) => {
                for item in items {
                    println!("  • {item}");
                }
                println!();
            }
        }
    }
}
