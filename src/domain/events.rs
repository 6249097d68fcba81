use super::{
    chat::AssistantReply,
    customer::Customer,
    customer_list_state::{CustomerPage, PageRequest},
};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    Api(ApiOutcome),
}

/// A pressed key. Printable keys carry the character, special keys a
/// lowercase name such as `enter`, `esc`, `backspace`, `up` or `tab`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }

    /// The character for printable keys, `None` for named keys.
    pub fn as_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        let ch = chars.next()?;
        chars.next().is_none().then_some(ch)
    }
}

/// Result of a background request, carrying what it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    CustomerPage {
        request: PageRequest,
        result: Result<CustomerPage, String>,
    },
    Customer {
        customer_id: String,
        result: Result<Customer, String>,
    },
    ChatReply {
        result: Result<AssistantReply, String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_char_keys_expose_their_char() {
        assert_eq!(KeyInput::new("j", false).as_char(), Some('j'));
        assert_eq!(KeyInput::new("ç", false).as_char(), Some('ç'));
        assert_eq!(KeyInput::new("enter", false).as_char(), None);
        assert_eq!(KeyInput::new("", false).as_char(), None);
    }
}
