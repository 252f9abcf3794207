//! Context assembly: the bounded window of history sent with each request.
//!
//! A request is one system message (instructions plus any retrieved context)
//! followed by the longest suffix of the conversation log that fits the
//! token budget:
//!
//! 1. Build the system message and count its tokens
//! 2. Walk the log newest → oldest, accumulating content tokens
//! 3. Stop at the first message that would push the total over budget
//! 4. Emit `[system, ...accepted suffix in chronological order]`
//!
//! The most recent message is always kept, even when it alone overflows the
//! budget, so the question being asked is never silently dropped.
//!
//! # Determinism
//!
//! Assembly is pure: identical inputs always produce identical outputs.
//! Nothing here reads the clock or the environment.

use crate::context::token::{ApproximateCounter, TokenCounter, counter_from_config};
use docchat_config::ContextConfig;
use docchat_core::error::Error;
use docchat_core::message::Message;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

// ── Types ─────────────────────────────────────────────────────────────────

/// All inputs required by the assembler for a single LLM call.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    /// Conversation history, oldest first. May be empty.
    pub log: &'a [Message],
    /// System instructions for this workflow.
    pub instructions: &'a str,
    /// Retrieved text for this request only; never stored in the log.
    pub retrieved_context: Option<&'a str>,
}

/// The assembled context, ready for an LLM API call.
#[derive(Debug, Clone)]
pub struct AssembledContext {
    /// System message first, then the kept history in chronological order.
    pub messages: Vec<Message>,
    /// Whether any log message was left out.
    pub truncated: bool,
    pub metadata: AssemblyMetadata,
}

/// Token accounting for one assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyMetadata {
    /// Tokens in the system message (including retrieved context).
    pub system_tokens: usize,
    /// Tokens in the kept history messages.
    pub history_tokens: usize,
    /// `system_tokens + history_tokens`.
    pub total_tokens: usize,
    /// Configured token budget.
    pub budget: usize,
    pub messages_included: usize,
    pub messages_dropped: usize,
    /// Budget utilization percentage; above 100 when the newest message
    /// alone overflows.
    pub utilization_pct: f32,
    /// Name of the token counter used.
    pub counter: String,
}

// ── Assembler ─────────────────────────────────────────────────────────────

/// The context assembler. Stateless — create one and reuse it.
#[derive(Clone)]
pub struct ContextAssembler {
    budget: i64,
    counter: Arc<dyn TokenCounter>,
}

impl ContextAssembler {
    /// Create an assembler with the given budget and counter.
    ///
    /// The budget is checked on every [`assemble`](Self::assemble) call.
    pub fn new(budget: i64, counter: Arc<dyn TokenCounter>) -> Self {
        Self { budget, counter }
    }

    /// Create an assembler using the approximate counter.
    pub fn approximate(budget: i64) -> Self {
        Self::new(budget, Arc::new(ApproximateCounter))
    }

    /// Create an assembler from the `[context]` config section.
    pub fn from_config(config: &ContextConfig) -> Result<Self, Error> {
        Ok(Self::new(config.token_budget, counter_from_config(config)?))
    }

    /// Same assembler with a different budget.
    pub fn with_budget(mut self, budget: i64) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    pub fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    /// Assemble the request messages.
    ///
    /// Fails only with [`Error::InvalidConfiguration`] for a non-positive
    /// budget; message content never causes an error.
    pub fn assemble(&self, input: &AssemblyInput<'_>) -> Result<AssembledContext, Error> {
        if self.budget <= 0 {
            return Err(Error::invalid_configuration(format!(
                "Token budget must be a positive integer, got {}",
                self.budget
            )));
        }
        let budget = usize::try_from(self.budget).unwrap_or(usize::MAX);

        let system_content = system_content(input.instructions, input.retrieved_context);
        let system_tokens = self.counter.count(&system_content);

        // ── Newest → oldest, stop at the first overflow ───────────────────
        let mut history_tokens = 0usize;
        let mut included = 0usize;
        for message in input.log.iter().rev() {
            let tokens = self.counter.count(&message.content);
            if included > 0 && system_tokens + history_tokens + tokens > budget {
                break;
            }
            history_tokens += tokens;
            included += 1;
        }

        let dropped = input.log.len() - included;
        let truncated = dropped > 0;

        let mut messages = Vec::with_capacity(included + 1);
        messages.push(Message::system(system_content));
        messages.extend_from_slice(&input.log[dropped..]);

        let total_tokens = system_tokens + history_tokens;
        let utilization_pct = (total_tokens as f32 / budget as f32) * 100.0;

        if truncated {
            debug!(
                dropped,
                included,
                total_tokens,
                budget,
                "Conversation history truncated to fit budget"
            );
        }

        Ok(AssembledContext {
            messages,
            truncated,
            metadata: AssemblyMetadata {
                system_tokens,
                history_tokens,
                total_tokens,
                budget,
                messages_included: included,
                messages_dropped: dropped,
                utilization_pct,
                counter: self.counter.name().to_string(),
            },
        })
    }
}

impl std::fmt::Debug for ContextAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAssembler")
            .field("budget", &self.budget)
            .field("counter", &self.counter.name())
            .finish()
    }
}

/// Assemble with the approximate counter.
pub fn assemble(
    log: &[Message],
    instructions: &str,
    retrieved_context: Option<&str>,
    budget: i64,
) -> Result<AssembledContext, Error> {
    ContextAssembler::approximate(budget).assemble(&AssemblyInput {
        log,
        instructions,
        retrieved_context,
    })
}

/// Join retrieval results, in the order given, into one context block.
pub fn retrieved_context_from(chunks: &[String]) -> Option<String> {
    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n\n"))
    }
}

fn system_content(instructions: &str, retrieved_context: Option<&str>) -> String {
    match retrieved_context {
        Some(context) => format!("{instructions}\n\nContext:\n{context}"),
        None => instructions.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::message::Role;

    /// One token per whitespace-separated word.
    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn name(&self) -> &str {
            "words"
        }

        fn count(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    fn words(budget: i64) -> ContextAssembler {
        ContextAssembler::new(budget, Arc::new(WordCounter))
    }

    fn run(
        assembler: &ContextAssembler,
        log: &[Message],
        instructions: &str,
        retrieved: Option<&str>,
    ) -> Result<AssembledContext, Error> {
        assembler.assemble(&AssemblyInput {
            log,
            instructions,
            retrieved_context: retrieved,
        })
    }

    fn contents(ctx: &AssembledContext) -> Vec<&str> {
        ctx.messages.iter().map(|m| m.content.as_str()).collect()
    }

    fn sample_log() -> Vec<Message> {
        vec![
            Message::user("hi"),
            Message::assistant("hello there"),
            Message::user("what is rust"),
        ]
    }

    #[test]
    fn keeps_only_last_message_when_budget_is_tight() {
        // system 2 + last 3 = 5; adding "hello there" (2) would make 7 > 6
        let ctx = run(&words(6), &sample_log(), "Be helpful", None).unwrap();

        assert_eq!(contents(&ctx), vec!["Be helpful", "what is rust"]);
        assert!(ctx.truncated);
        assert_eq!(ctx.metadata.system_tokens, 2);
        assert_eq!(ctx.metadata.history_tokens, 3);
        assert_eq!(ctx.metadata.messages_dropped, 2);
    }

    #[test]
    fn generous_budget_keeps_everything() {
        let ctx = run(&words(100), &sample_log(), "Be helpful", None).unwrap();

        assert_eq!(ctx.messages.len(), 4);
        assert_eq!(ctx.messages[0].role, Role::System);
        assert!(!ctx.truncated);
        assert_eq!(ctx.metadata.total_tokens, 8);
        assert_eq!(ctx.metadata.counter, "words");
    }

    #[test]
    fn empty_log_yields_system_only() {
        let ctx = run(&words(10), &[], "Be helpful", None).unwrap();
        assert_eq!(contents(&ctx), vec!["Be helpful"]);
        assert!(!ctx.truncated);
        assert_eq!(ctx.metadata.messages_included, 0);
    }

    #[test]
    fn exact_fit_is_included() {
        // system 2 + 3 + 2 = 7 == budget
        let ctx = run(&words(7), &sample_log(), "Be helpful", None).unwrap();
        assert_eq!(contents(&ctx), vec!["Be helpful", "hello there", "what is rust"]);
        assert!(ctx.truncated);
    }

    #[test]
    fn boundary_budget_keeps_exactly_last_message() {
        let log = sample_log();
        let ctx = run(&words(2 + 3), &log, "Be helpful", None).unwrap();
        assert_eq!(ctx.metadata.messages_included, 1);
        assert!(ctx.truncated);

        let single = vec![Message::user("what is rust")];
        let ctx = run(&words(2 + 3), &single, "Be helpful", None).unwrap();
        assert_eq!(ctx.metadata.messages_included, 1);
        assert!(!ctx.truncated);
    }

    #[test]
    fn oversized_last_message_is_still_sent() {
        let log = vec![
            Message::user("short"),
            Message::user("this question is far longer than the budget allows"),
        ];
        let ctx = run(&words(3), &log, "Be helpful", None).unwrap();

        assert_eq!(ctx.messages.len(), 2);
        assert_eq!(ctx.messages[1].content, log[1].content);
        assert!(ctx.truncated);
        assert!(ctx.metadata.utilization_pct > 100.0);
    }

    #[test]
    fn system_alone_over_budget_still_keeps_last_message() {
        let log = vec![Message::user("a"), Message::user("b")];
        let ctx = run(&words(1), &log, "you are a very helpful assistant", None).unwrap();
        assert_eq!(contents(&ctx)[1..], ["b"]);
        assert!(ctx.truncated);
    }

    #[test]
    fn stops_at_first_overflow_without_skipping() {
        // Walking back: "d" (1) fits, "big big big" (3) overflows → stop,
        // even though "a" (1) would have fit on its own.
        let log = vec![
            Message::user("a"),
            Message::assistant("big big big"),
            Message::user("d"),
        ];
        let ctx = run(&words(3), &log, "sys", None).unwrap();
        assert_eq!(contents(&ctx), vec!["sys", "d"]);
    }

    #[test]
    fn result_is_contiguous_suffix_in_order() {
        let log: Vec<Message> = (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("question {i}"))
                } else {
                    Message::assistant(format!("answer number {i}"))
                }
            })
            .collect();

        let ctx = run(&words(20), &log, "sys", None).unwrap();
        let kept = &ctx.messages[1..];
        let start = log.len() - kept.len();
        assert_eq!(kept, &log[start..]);
    }

    #[test]
    fn retrieved_context_goes_into_system_message() {
        let ctx = run(
            &words(100),
            &[Message::user("q")],
            "Answer from context",
            Some("chunk one\n\nchunk two"),
        )
        .unwrap();

        assert_eq!(
            ctx.messages[0].content,
            "Answer from context\n\nContext:\nchunk one\n\nchunk two"
        );
        // 3 + "Context:" + 4 words of chunks
        assert_eq!(ctx.metadata.system_tokens, 8);
    }

    #[test]
    fn retrieved_context_counts_against_budget() {
        let without = run(&words(6), &sample_log(), "Be helpful", None).unwrap();
        let with = run(&words(6), &sample_log(), "Be helpful", Some("lots of extra words")).unwrap();
        assert!(with.metadata.messages_included <= without.metadata.messages_included);
    }

    #[test]
    fn non_positive_budget_is_invalid_configuration() {
        for budget in [0, -1, i64::MIN] {
            let err = run(&words(budget), &sample_log(), "sys", None).unwrap_err();
            assert!(matches!(err, Error::InvalidConfiguration { .. }), "{budget}");
        }
    }

    #[test]
    fn assembly_is_deterministic() {
        let log = sample_log();
        let a = run(&words(6), &log, "Be helpful", Some("ctx")).unwrap();
        let b = run(&words(6), &log, "Be helpful", Some("ctx")).unwrap();
        assert_eq!(a.messages, b.messages);
        assert_eq!(a.truncated, b.truncated);
        assert_eq!(a.metadata, b.metadata);
    }

    #[test]
    fn larger_budget_never_includes_fewer_messages() {
        let log: Vec<Message> = (0..12)
            .map(|i| Message::user("word ".repeat(i % 4 + 1)))
            .collect();

        let mut previous = 0;
        for budget in 1..60 {
            let ctx = run(&words(budget), &log, "two words", None).unwrap();
            assert!(ctx.metadata.messages_included >= previous, "budget {budget}");
            previous = ctx.metadata.messages_included;
        }
        assert_eq!(previous, log.len());
    }

    #[test]
    fn free_function_uses_approximate_counter() {
        let log = vec![Message::user("abcd"), Message::user("efgh")];
        // "sys!" = 1 token, each message 1 token
        let ctx = assemble(&log, "sys!", None, 2).unwrap();
        assert_eq!(ctx.messages.len(), 2);
        assert!(ctx.truncated);
        assert_eq!(ctx.metadata.counter, "approximate");
    }

    #[test]
    fn retrieved_context_helper() {
        assert_eq!(retrieved_context_from(&[]), None);
        let chunks = vec!["first".to_string(), "second".to_string()];
        assert_eq!(retrieved_context_from(&chunks).as_deref(), Some("first\n\nsecond"));
    }

    #[test]
    fn from_config_uses_configured_budget() {
        let assembler = ContextAssembler::from_config(&ContextConfig::default()).unwrap();
        assert_eq!(assembler.budget(), 3000);
        assert_eq!(assembler.counter().name(), "approximate");
    }
}
