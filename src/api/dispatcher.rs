use std::{future::Future, sync::mpsc::Sender};

use tokio::runtime::{Builder, Runtime};

use crate::{
    domain::{
        chat::AssistantReply,
        customer_list_state::PageRequest,
        events::{ApiOutcome, AppEvent},
    },
    infra::{
        config::{ChatConfig, ChatMode},
        error::AppError,
    },
    usecases::contracts::RequestDispatcher,
};

use super::{
    client::ApiClient,
    dto::{ChatRequest, SmartChatRequest},
    error::ApiError,
};

const API_WORKER_THREADS: usize = 2;
const API_OUTCOME_DROPPED: &str = "API_OUTCOME_DROPPED";

/// Runs API calls on a private tokio runtime and reports each result as an
/// `AppEvent::Api` on the UI channel.
pub struct ApiDispatcher {
    runtime: Option<Runtime>,
    client: ApiClient,
    chat: ChatConfig,
    events: Sender<AppEvent>,
}

impl ApiDispatcher {
    pub fn new(
        client: ApiClient,
        chat: ChatConfig,
        events: Sender<AppEvent>,
    ) -> Result<Self, AppError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(API_WORKER_THREADS)
            .thread_name("credibot-api")
            .enable_all()
            .build()
            .map_err(AppError::RuntimeInit)?;

        Ok(Self {
            runtime: Some(runtime),
            client,
            chat,
            events,
        })
    }

    fn spawn<F>(&self, request: F)
    where
        F: Future<Output = ApiOutcome> + Send + 'static,
    {
        let Some(runtime) = &self.runtime else {
            return;
        };

        let events = self.events.clone();
        runtime.spawn(async move {
            let outcome = request.await;
            if events.send(AppEvent::Api(outcome)).is_err() {
                tracing::debug!(
                    code = API_OUTCOME_DROPPED,
                    "api outcome arrived after the UI loop stopped"
                );
            }
        });
    }
}

impl RequestDispatcher for ApiDispatcher {
    fn fetch_page(&self, request: PageRequest) {
        let client = self.client.clone();
        self.spawn(async move {
            let result = client
                .list_customers(request.page, request.per_page, &request.filters)
                .await
                .map_err(|error| error.to_string());
            ApiOutcome::CustomerPage { request, result }
        });
    }

    fn fetch_customer(&self, customer_id: String) {
        let client = self.client.clone();
        self.spawn(async move {
            let result = client
                .get_customer(&customer_id)
                .await
                .map_err(|error| error.to_string());
            ApiOutcome::Customer {
                customer_id,
                result,
            }
        });
    }

    fn send_chat(&self, message: String) {
        let client = self.client.clone();
        let chat = self.chat.clone();
        self.spawn(async move {
            let result = ask(&client, &chat, message)
                .await
                .map_err(|error| error.to_string());
            ApiOutcome::ChatReply { result }
        });
    }
}

impl Drop for ApiDispatcher {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Sends `message` to the endpoint selected by `chat.mode`.
pub async fn ask(
    client: &ApiClient,
    chat: &ChatConfig,
    message: String,
) -> Result<AssistantReply, ApiError> {
    match chat.mode {
        ChatMode::Smart => client
            .smart_chat(&SmartChatRequest { message })
            .await
            .map(AssistantReply::from),
        ChatMode::Plain => client
            .chat(&ChatRequest {
                message,
                model: chat.model.clone(),
                max_tokens: chat.max_tokens,
            })
            .await
            .map(AssistantReply::from),
    }
}
