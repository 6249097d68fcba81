//! Chat transcript and submission guard.

use chrono::{DateTime, Local};

use super::text_input_state::TextInputState;

pub const GREETING: &str = "Olá! Sou o assistente de IA do Credibot. Posso ajudá-lo a consultar \
informações sobre clientes, scores de crédito e análises financeiras. Como posso ajudá-lo hoje?";

pub const FALLBACK_REPLY: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Por favor, tente novamente.";

const MAX_PROMPT_CHARS: usize = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "Você",
            Self::Assistant => "Credibot",
        }
    }
}

/// Extra facts the backend reports about how an answer was produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplyDetails {
    pub used_database: bool,
    pub sql_query: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Local>,
    pub details: Option<ReplyDetails>,
}

/// Assistant answer as returned by either chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    pub details: ReplyDetails,
}

/// Append-only, chronologically ordered message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn seeded(at: DateTime<Local>) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                content: GREETING.to_owned(),
                created_at: at,
                details: None,
            }],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

/// Text accepted for sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSubmission {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    transcript: ChatTranscript,
    input: TextInputState,
    pending: bool,
    input_focused: bool,
    scroll_from_bottom: u16,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl ChatState {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            transcript: ChatTranscript::seeded(at),
            input: TextInputState::with_max_chars(MAX_PROMPT_CHARS),
            pending: false,
            input_focused: true,
            scroll_from_bottom: 0,
        }
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn input(&self) -> &TextInputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut TextInputState {
        &mut self.input
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn set_input_focused(&mut self, focused: bool) {
        self.input_focused = focused;
    }

    /// Accepts the current input unless it is blank or a reply is pending.
    ///
    /// The user message is appended right away and stays even if the request fails.
    pub fn submit(&mut self, at: DateTime<Local>) -> Option<ChatSubmission> {
        if self.pending || self.input.is_blank() {
            return None;
        }

        let text = self.input.take();
        self.transcript.push(ChatMessage {
            role: ChatRole::User,
            content: text.clone(),
            created_at: at,
            details: None,
        });
        self.pending = true;
        self.scroll_from_bottom = 0;

        Some(ChatSubmission { text })
    }

    /// Appends the reply, or the fixed apology on failure. A result arriving
    /// while nothing is pending is ignored and `false` is returned.
    pub fn apply_reply(&mut self, result: Result<AssistantReply, String>, at: DateTime<Local>) -> bool {
        if !self.pending {
            return false;
        }

        let message = match result {
            Ok(reply) => ChatMessage {
                role: ChatRole::Assistant,
                content: reply.text,
                created_at: at,
                details: Some(reply.details),
            },
            Err(_) => ChatMessage {
                role: ChatRole::Assistant,
                content: FALLBACK_REPLY.to_owned(),
                created_at: at,
                details: None,
            },
        };

        self.transcript.push(message);
        self.pending = false;
        self.scroll_from_bottom = 0;
        true
    }

    pub fn scroll_from_bottom(&self) -> u16 {
        self.scroll_from_bottom
    }

    pub fn scroll_up(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(1);
    }
}
