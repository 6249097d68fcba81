//! Wire shapes of the Credibot REST API.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::domain::{
    chat::{AssistantReply, ReplyDetails},
    customer::Customer,
    customer_list_state::CustomerPage,
    pagination::PaginationInfo,
};

use super::error::ApiError;

/// `{success, data, pagination?, message}` wrapper shared by every endpoint.
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    pub pagination: Option<PaginationInfo>,
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Unwraps `data`, turning `success: false` into a rejection.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::rejected(self.message));
        }

        self.data.ok_or_else(ApiError::decode)
    }
}

impl Envelope<Vec<Customer>> {
    pub fn into_page(self) -> Result<CustomerPage, ApiError> {
        let pagination = self.pagination;
        let customers = self.into_data()?;
        let pagination = pagination.ok_or_else(ApiError::decode)?;

        Ok(CustomerPage {
            customers,
            pagination,
        })
    }
}

/// Body of `POST /chat`. Unset options are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Body of `POST /smart-chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub model: Option<String>,
    pub usage: Option<TokenUsage>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmartChatReply {
    pub message: String,
    #[serde(default)]
    pub used_database: bool,
    pub sql_query: Option<String>,
    pub created_at: Option<String>,
}

impl From<ChatReply> for AssistantReply {
    fn from(reply: ChatReply) -> Self {
        Self {
            text: reply.message,
            details: ReplyDetails {
                used_database: false,
                sql_query: None,
                model: reply.model,
            },
        }
    }
}

impl From<SmartChatReply> for AssistantReply {
    fn from(reply: SmartChatReply) -> Self {
        Self {
            text: reply.message,
            details: ReplyDetails {
                used_database: reply.used_database,
                sql_query: reply.sql_query.filter(|sql| !sql.trim().is_empty()),
                model: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiErrorKind;

    #[test]
    fn chat_request_omits_unset_options() {
        let body = serde_json::to_value(ChatRequest {
            message: "oi".to_owned(),
            model: None,
            max_tokens: Some(256),
        })
        .expect("request must serialize");

        assert_eq!(body, serde_json::json!({"message": "oi", "max_tokens": 256}));
    }

    #[test]
    fn unsuccessful_envelope_is_rejected_with_its_message() {
        let envelope: Envelope<Customer> = serde_json::from_str(
            r#"{"success": false, "data": null, "message": "Cliente inativo"}"#,
        )
        .expect("envelope must parse");

        let error = envelope.into_data().expect_err("must be rejected");

        assert_eq!(error.kind(), ApiErrorKind::Rejected);
        assert_eq!(error.message(), "Cliente inativo");
    }

    #[test]
    fn list_envelope_requires_pagination() {
        let envelope: Envelope<Vec<Customer>> =
            serde_json::from_str(r#"{"success": true, "data": [], "message": "ok"}"#)
                .expect("envelope must parse");

        let error = envelope.into_page().expect_err("missing pagination");

        assert_eq!(error.kind(), ApiErrorKind::Decode);
    }

    #[test]
    fn list_page_with_fractional_score_still_decodes() {
        let envelope: Envelope<Vec<Customer>> = serde_json::from_str(
            r#"{"success": true,
                "data": [{"id": "c-1", "nome": "Ana", "cpf_cnpj": "123", "score_credito": 712.5,
                          "classe_risco": "Baixo", "tipo_pessoa": "PF", "ativo": true}],
                "pagination": {"page": 1, "per_page": 25, "total": 1, "total_pages": 1},
                "message": "ok"}"#,
        )
        .expect("envelope must parse");

        let page = envelope.into_page().expect("page must decode");

        assert_eq!(page.customers[0].score, 713);
    }

    #[test]
    fn smart_reply_maps_database_details() {
        let reply: SmartChatReply = serde_json::from_str(
            r#"{"message": "Há 42 clientes.", "used_database": true,
                "sql_query": "SELECT COUNT(*) FROM clientes", "created_at": "2024-05-01T10:00:00Z"}"#,
        )
        .expect("reply must parse");

        let reply = AssistantReply::from(reply);

        assert_eq!(reply.text, "Há 42 clientes.");
        assert!(reply.details.used_database);
        assert_eq!(
            reply.details.sql_query.as_deref(),
            Some("SELECT COUNT(*) FROM clientes")
        );
    }
}
