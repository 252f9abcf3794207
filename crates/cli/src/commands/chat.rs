//! `docchat chat` — Interactive chat with optional document retrieval.
//!
//! After every answer the user is asked whether they want more
//! information; `yes` asks the model to elaborate, `no` moves on.

use std::sync::Arc;

use docchat_agent::{
    ChatModel, ChatSession, ContextAssembler, FollowUp, FollowUpAction, FollowUpEvent,
    FollowUpState, RagChat,
};
use docchat_core::Error;
use docchat_memory::{EmbeddingRetriever, VectorCollection};
use tracing::info;

use super::{CommandResult, LineReader, connect, describe_error, load_config, stream_to_stdout};

pub async fn run(rag: bool, budget: Option<i64>, advanced: bool) -> CommandResult {
    let config = load_config()?;

    let budget = budget.unwrap_or(config.context.token_budget);
    if budget <= 0 {
        return Err(Error::invalid_configuration(format!(
            "--budget must be a positive integer, got {budget}"
        ))
        .into());
    }

    let provider = connect(&config)?;
    let assembler = ContextAssembler::from_config(&config.context)?.with_budget(budget);
    let mut chat = RagChat::new(
        ChatModel::from_config(provider.clone(), &config, advanced),
        assembler,
    )
    .with_top_k(config.retrieval.top_k)
    .with_instructions(config.context.system_prompt.as_str());

    let mut collection_info = String::from("off");
    if rag {
        let path = &config.retrieval.collection_path;
        let collection = VectorCollection::load(path).map_err(|e| {
            format!("{e}\n  Build the collection first with `docchat index`.")
        })?;
        collection_info = format!("{} ({} chunks)", collection.name, collection.len());
        info!(path = %path.display(), chunks = collection.len(), "Collection loaded");
        chat = chat.with_retriever(Arc::new(EmbeddingRetriever::new(provider, collection)));
    }

    println!();
    println!("  🤖 Chat with {}", config.model_for(advanced));
    println!();
    println!("  Budget:    {budget} tokens");
    println!("  Retrieval: {collection_info}");
    println!();
    println!("  Ask me anything! Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut session = ChatSession::new();
    let mut follow_up = FollowUp::new();
    let mut reader = LineReader::new();

    while !follow_up.is_done() {
        let label = match follow_up.state() {
            FollowUpState::AwaitingConfirmation => "  Do you want more information? (yes/no) > ",
            _ => "  You > ",
        };

        let event = match reader.prompt(label).await? {
            Some(line) => match follow_up.interpret(&line) {
                Some(event) => event,
                None => continue,
            },
            None => FollowUpEvent::Quit,
        };

        match follow_up.handle(event, &mut session) {
            FollowUpAction::Request => {
                let (tx, printer) = stream_to_stdout(budget);
                let result = chat.respond(&mut session, &tx).await;
                drop(tx);
                let _ = printer.await;

                match result {
                    Ok(_) => {
                        follow_up.handle(FollowUpEvent::AnswerDelivered, &mut session);
                    }
                    Err(e) => {
                        eprintln!("  [Error] {}", describe_error(&e));
                        if e.is_authentication_failure() {
                            follow_up.handle(FollowUpEvent::Quit, &mut session);
                        }
                    }
                }
            }
            FollowUpAction::Prompt(text) => println!("\n  Assistant > {text}\n"),
            FollowUpAction::Stop => break,
            FollowUpAction::AskForMore | FollowUpAction::Ignore => {}
        }
    }

    let summary = session.end();
    println!();
    println!("  Session ended after {} messages. Goodbye! 👋", summary.turns);
    println!();
    Ok(())
}
