//! Chat service: user message + history → completion → reply.
//!
//! DESIGN
//! ======
//! Stateless per request. The prompt is one system entry (platform context
//! plus the current message), the trailing [`CONVERSATION_WINDOW`] turns of
//! history, and the current message as the final user entry. Without an
//! upstream client the service answers with a fixed demo reply instead of
//! failing. Upstream error details are logged, never returned.

use envelopes::{CONVERSATION_WINDOW, ChatReply, ChatRequest, ConversationTurn, ErrorClass};
use serde_json::Value;
use tracing::{info, warn};

use crate::llm::types::{LlmError, PromptMessage};
use crate::state::AppState;

const PLATFORM_CONTEXT: &str = "\
You are NexScholar AI Assistant, a helpful chatbot for students using the NexScholar scholarship platform.

ABOUT NEXSCHOLAR:
- NexScholar is a comprehensive scholarship discovery and application platform
- We help students find, apply for, and manage scholarship opportunities
- The platform includes scholarship listings, events, application tracking, and educational resources

YOUR CAPABILITIES:
1. Help students find relevant scholarships based on their profile
2. Provide guidance on scholarship application processes
3. Answer questions about deadlines, requirements, and eligibility
4. Offer tips for writing compelling scholarship essays
5. Help navigate the NexScholar platform features
6. Provide information about educational events and opportunities

PLATFORM FEATURES YOU CAN HELP WITH:
- Scholarship search and filtering
- Creating and managing student profiles
- Application tracking and deadlines
- Educational events and workshops
- Document preparation and requirements
- Application tips and best practices

TONE AND STYLE:
- Be helpful, encouraging, and supportive
- Use clear, simple language suitable for students
- Be specific and actionable in your advice
- Show empathy for the challenges of finding funding for education
- Always stay positive and motivating

LIMITATIONS:
- You cannot access real-time scholarship data or user accounts
- You cannot submit applications on behalf of users
- You cannot guarantee scholarship approval
- Always encourage users to verify information on the platform

If asked about specific scholarships, guide users to use the search function on the platform.
If technical issues arise, suggest contacting support or checking the help section.";

const RESPONSE_INSTRUCTIONS: &str = "\
Please provide a helpful, specific response. If the user is asking about finding scholarships, \
guide them to use the search features. If they need application help, provide actionable advice. \
Keep responses concise but comprehensive.";

/// Reply sent when no completion credential is configured.
pub const DEMO_MODE_RESPONSE: &str = "\
👋 Hi! I'm the NexScholar AI Assistant. I'm currently in demo mode since the API key isn't configured yet.

Once you add your Groq API key to the `.env.local` file, I'll be able to help you with:

• Finding scholarships that match your profile
• Application tips and guidance
• Deadline reminders
• General questions about the platform

To get started, please add your Groq API key to the environment variables!";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("upstream rate limited: {0}")]
    RateLimited(LlmError),
    #[error("no response from model")]
    EmptyCompletion,
    #[error("LLM error: {0}")]
    Llm(LlmError),
}

impl From<LlmError> for ChatError {
    fn from(e: LlmError) -> Self {
        if e.is_rate_limited() { Self::RateLimited(e) } else { Self::Llm(e) }
    }
}

impl ChatError {
    /// Client-facing error class.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::RateLimited(_) => ErrorClass::RateLimited,
            Self::EmptyCompletion | Self::Llm(_) => ErrorClass::Internal,
        }
    }
}

// =============================================================================
// REQUEST VALIDATION
// =============================================================================

/// Parse and validate a raw request body.
///
/// `message` must be a non-empty JSON string. `conversation` may be absent or
/// `null`; otherwise it must be an array of `{content, isUser}` turns.
///
/// # Errors
///
/// Returns [`ChatError::Validation`] for any malformed input.
pub fn parse_request(body: &[u8]) -> Result<ChatRequest, ChatError> {
    let root: Value = serde_json::from_slice(body).map_err(|e| ChatError::Validation(format!("body: {e}")))?;
    let Value::Object(mut fields) = root else {
        return Err(ChatError::Validation("body is not an object".into()));
    };

    let message = match fields.remove("message") {
        Some(Value::String(message)) if !message.is_empty() => message,
        Some(Value::String(_)) => return Err(ChatError::Validation("message is empty".into())),
        Some(_) => return Err(ChatError::Validation("message is not a string".into())),
        None => return Err(ChatError::Validation("message is missing".into())),
    };

    let conversation = match fields.remove("conversation") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => serde_json::from_value::<Vec<ConversationTurn>>(raw)
            .map_err(|e| ChatError::Validation(format!("conversation: {e}")))?,
    };

    Ok(ChatRequest { message, conversation })
}

// =============================================================================
// PROMPT ASSEMBLY
// =============================================================================

/// System prompt: platform context steered by the current message.
#[must_use]
pub fn build_system_prompt(message: &str) -> String {
    format!("{PLATFORM_CONTEXT}\n\nUSER MESSAGE: {message}\n\n{RESPONSE_INSTRUCTIONS}")
}

/// Full ordered prompt list sent to the completion service.
#[must_use]
pub fn build_prompt(message: &str, conversation: &[ConversationTurn]) -> Vec<PromptMessage> {
    let recent = &conversation[conversation.len().saturating_sub(CONVERSATION_WINDOW)..];

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(PromptMessage::system(build_system_prompt(message)));
    messages.extend(recent.iter().map(|turn| {
        if turn.is_user {
            PromptMessage::user(turn.content.clone())
        } else {
            PromptMessage::assistant(turn.content.clone())
        }
    }));
    messages.push(PromptMessage::user(message));
    messages
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Answer one chat request.
///
/// # Errors
///
/// Returns [`ChatError::RateLimited`] when the provider throttles,
/// [`ChatError::EmptyCompletion`] when it answers without text, and
/// [`ChatError::Llm`] for any other upstream failure.
pub async fn handle_chat(state: &AppState, request: &ChatRequest) -> Result<ChatReply, ChatError> {
    info!(
        message_len = request.message.len(),
        history_len = request.conversation.len(),
        "chat: request received"
    );

    let Some(llm) = &state.llm else {
        info!("chat: no completion credential, answering in demo mode");
        return Ok(ChatReply::now(DEMO_MODE_RESPONSE));
    };

    let messages = build_prompt(&request.message, &request.conversation);
    let response = llm.chat(state.params, &messages).await.map_err(|e| {
        warn!(error = %e, model = llm.model(), "chat: completion failed");
        ChatError::from(e)
    })?;

    info!(
        model = %response.model,
        finish_reason = %response.finish_reason,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        prompt_len = messages.len(),
        "chat: completion received"
    );

    let text = response
        .content
        .filter(|text| !text.trim().is_empty())
        .ok_or(ChatError::EmptyCompletion)?;
    Ok(ChatReply::now(text))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
