use tokio::runtime::{Builder, Runtime};

use crate::{
    domain::{
        chat::AssistantReply, customer::Customer, customer_list_state::CustomerPage,
        filters::CustomerFilters,
    },
    infra::{config::ChatConfig, error::AppError},
    usecases::lookup::CustomerSource,
};

use super::{client::ApiClient, dispatcher::ask, error::ApiError};

/// Drives `ApiClient` to completion on a current-thread runtime for the
/// one-shot subcommands.
pub struct BlockingCustomerSource {
    runtime: Runtime,
    client: ApiClient,
    chat: ChatConfig,
}

impl BlockingCustomerSource {
    pub fn new(client: ApiClient, chat: ChatConfig) -> Result<Self, AppError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AppError::RuntimeInit)?;

        Ok(Self {
            runtime,
            client,
            chat,
        })
    }
}

impl CustomerSource for BlockingCustomerSource {
    fn list_customers(
        &self,
        page: u32,
        per_page: u32,
        filters: &CustomerFilters,
    ) -> Result<CustomerPage, ApiError> {
        self.runtime
            .block_on(self.client.list_customers(page, per_page, filters))
    }

    fn get_customer(&self, customer_id: &str) -> Result<Customer, ApiError> {
        self.runtime.block_on(self.client.get_customer(customer_id))
    }

    fn ask(&self, message: String) -> Result<AssistantReply, ApiError> {
        self.runtime
            .block_on(ask(&self.client, &self.chat, message))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    #[test]
    fn blocks_until_the_customer_arrives() {
        let server_runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime must build");
        let server = server_runtime.block_on(MockServer::start());
        server_runtime.block_on(
            Mock::given(method("GET"))
                .and(path("/cliente/c7"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "success": true,
                    "data": {
                        "id": "c7",
                        "nome": "Padaria Sol",
                        "cpf_cnpj": "12.345.678/0001-90",
                        "score_credito": 455,
                        "classe_risco": "Médio",
                        "tipo_pessoa": "PJ",
                        "faturamento_anual": 1250000.0,
                        "ativo": true
                    },
                    "message": "ok"
                })))
                .mount(&server),
        );
        let client = ApiClient::new(&server.uri(), Some(Duration::from_secs(5)))
            .expect("client must build");
        let source =
            BlockingCustomerSource::new(client, ChatConfig::default()).expect("source must build");

        let customer = source.get_customer("c7").expect("customer must load");

        assert_eq!(customer.name, "Padaria Sol");
        assert_eq!(customer.score, 455);
    }
}
