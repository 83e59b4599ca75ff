//! Prompt composition for the answering completion call.

use lantern_core::models::{ContextWindow, Query, Role, Turn};
use lantern_core::traits::CompletionRequest;

/// Fixed system instruction for grounded answering.
pub(crate) const ANSWER_SYSTEM: &str = "You answer questions using only the provided \
document context. Cite nothing beyond it. If the context does not contain the answer, \
say you do not know; never invent information.";

/// Build the completion request: system instruction, context blocks,
/// prior turns, and the question.
pub(crate) fn compose(
    query: &Query,
    context: &ContextWindow,
    temperature: f32,
    max_tokens: u32,
) -> CompletionRequest {
    let mut messages: Vec<Turn> = query.history.clone();
    messages.push(Turn {
        role: Role::User,
        content: user_prompt(query, context),
    });
    CompletionRequest {
        system: ANSWER_SYSTEM.to_string(),
        messages,
        temperature,
        max_tokens,
    }
}

fn user_prompt(query: &Query, context: &ContextWindow) -> String {
    let question = query.text.trim();
    if context.is_empty() {
        // Degraded path: no citations were retrieved.
        return format!(
            "No relevant documents were found for this question.\n\nQuestion: {question}\nAnswer:"
        );
    }

    let mut blocks = Vec::with_capacity(context.len());
    for (i, candidate) in context.candidates().enumerate() {
        blocks.push(format!(
            "[Document {}] (source: {}, relevance: {:.0}%)\n{}",
            i + 1,
            candidate.source_document_id,
            candidate.composite_score * 100.0,
            candidate.text
        ));
    }
    format!(
        "Context:\n{}\n\nQuestion: {question}\nAnswer:",
        blocks.join("\n\n")
    )
}

/// Flat text of the whole request, for token estimation when the
/// provider never reports usage.
pub(crate) fn flatten(request: &CompletionRequest) -> String {
    let mut out = request.system.clone();
    for turn in &request.messages {
        out.push('\n');
        out.push_str(&turn.content);
    }
    out
}
