//! Prompt assembly and reply extraction
//!
//! One prompt per stage: a classification prompt that returns a bare label,
//! and a generation prompt combining persona instructions, retrieved
//! context, and trimmed history. The model is instructed to wrap its reply
//! in `<response>` tags; a reply without them is a [`Error::MalformedReply`].

use crate::store::Turn;
use crate::{Error, Result};

/// System instructions for the intent classifier
pub const INTENT_SYSTEM_PROMPT: &str = "\
You are an intent detection system for a chatbot that helps elderly users \
access support services. Classify each user query into exactly one intent:

1. financial_aid: financial assistance programs, vouchers, or payouts.
   - Example (English): \"How do I apply for ComCare?\"
   - Example (Chinese): \"如何申请社区关怀计划？\"
2. healthcare: healthcare services, dementia care, or teleconsultation.
   - Example (English): \"Where can I find a doctor for dementia care?\"
   - Example (Malay): \"Di mana saya boleh mencari doktor untuk penjagaan demensia?\"
3. food_security: food banks, budget meals, or grocery assistance.
   - Example (English): \"Where is the nearest food bank?\"
   - Example (Tamil): \"அருகிலுள்ள உணவு வங்கி எங்கே?\"
4. other: any query that does not fit the above categories.

Respond with ONLY the intent name (e.g. \"financial_aid\"). If unsure, \
respond with \"other\".";

/// Persona and instructions for the generation stage
const RESPONSE_SYSTEM_PROMPT: &str = "\
The following is a helpful conversation between a social worker AI and a \
human. The AI provides detailed and accurate information based on available \
resources. If unsure, it transparently states it does not know.

Always reply in the original user language.

AI's Role:
- You are a social worker specializing in Financial Support, Medical \
Support, and Food Bank Aid in Singapore.
- Your mission is to assist users with guidance on government schemes, \
community programs, and relevant support services.
- If the user's question is unrelated, politely redirect them to relevant \
topics.

Guidelines:
1. If you don't have an answer, say: \"I'm sorry, I don't have that \
information. Would you like help with financial aid, healthcare support, \
or food assistance?\"
2. Keep responses clear, actionable, and concise.
3. Avoid generic answers; refer to specific government and non-profit \
programs when possible.
4. Keep the tone empathetic and supportive.";

/// Opening delimiter the model wraps its reply in
const RESPONSE_OPEN: &str = "<response>";
/// Closing delimiter
const RESPONSE_CLOSE: &str = "</response>";

/// User-message half of the classification prompt
#[must_use]
pub fn intent_prompt(query: &str) -> String {
    format!("Query: {query}\nIntent:")
}

/// Build the single generation prompt from context, history, and the
/// current question
#[must_use]
pub fn response_prompt(context: &[String], history: &[Turn], question: &str) -> String {
    let context_block = context.join("\n\n");
    let history_block = format_history(history);

    format!(
        "Context from knowledge base:\n<context>{context_block}</context>\n\n\
         Conversation history:\n<messages>{history_block}</messages>\n\n\
         User's current question:\n<question>{question}</question>\n\n\
         Think carefully before responding. Ensure your response is helpful, \
         specific, and relevant. Wrap your response inside \
         {RESPONSE_OPEN}...{RESPONSE_CLOSE} tags."
    )
}

/// System half of the generation prompt
#[must_use]
pub const fn response_system_prompt() -> &'static str {
    RESPONSE_SYSTEM_PROMPT
}

/// Serialize history as `role: content` lines, oldest first
fn format_history(history: &[Turn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the reply between `<response>` tags
///
/// # Errors
///
/// Returns [`Error::MalformedReply`] when either delimiter is absent or
/// they appear out of order.
pub fn extract_response(raw: &str) -> Result<String> {
    let start = raw.find(RESPONSE_OPEN).ok_or(Error::MalformedReply)? + RESPONSE_OPEN.len();
    let end = raw[start..]
        .find(RESPONSE_CLOSE)
        .ok_or(Error::MalformedReply)?
        + start;
    Ok(raw[start..end].trim().to_string())
}
