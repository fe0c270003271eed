const SYSTEM_PROMPT: &str = "You are a concise assistant for command-line users. \
Answer as exactly and briefly as possible. \
When your answer contains code, wrap it in a fenced code block annotated with the correct language.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Builds the conversation sent to the API. The ordering is a fixed
/// contract: system prompt, then the language hint, then the context, then
/// the user's input. Reordering changes model behavior.
pub fn build_messages(input: &str, language: Option<&str>, context: Option<&str>) -> Vec<Message> {
    let mut messages = vec![Message::system(SYSTEM_PROMPT)];

    if let Some(language) = language {
        messages.push(Message::user(format!(
            "My preferred language is {language}."
        )));
    }
    if let Some(context) = context {
        messages.push(Message::user(format!(
            "Some context that may help you answer my question is:\n{context}"
        )));
    }

    messages.push(Message::user(input));
    messages
}
