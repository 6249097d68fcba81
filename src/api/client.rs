use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{
    domain::{
        customer::Customer, customer_list_state::CustomerPage, filters::CustomerFilters,
    },
    infra::{error::AppError, secrets::mask_tax_id},
};

use super::{
    dto::{ChatReply, ChatRequest, Envelope, SmartChatReply, SmartChatRequest},
    error::ApiError,
    query::{customer_path, customers_query},
};

/// Thin async wrapper over the Credibot REST API. Every call is a fresh
/// request; nothing is retried or cached.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, request_timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(AppError::HttpClientInit)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_customers(
        &self,
        page: u32,
        per_page: u32,
        filters: &CustomerFilters,
    ) -> Result<CustomerPage, ApiError> {
        let endpoint = "/clientes";
        let request = self
            .http
            .get(self.url(endpoint))
            .query(&customers_query(page, per_page, filters));

        let envelope: Envelope<Vec<Customer>> = self.send(request, endpoint).await?;
        let page = envelope
            .into_page()
            .inspect_err(|error| log_failure(endpoint, error))?;

        tracing::debug!(
            page = page.pagination.page,
            total_pages = page.pagination.total_pages,
            received = page.customers.len(),
            "customers page received"
        );
        Ok(page)
    }

    pub async fn get_customer(&self, customer_id: &str) -> Result<Customer, ApiError> {
        let endpoint = customer_path(customer_id);
        let request = self.http.get(self.url(&endpoint));

        let envelope: Envelope<Customer> = self.send(request, &endpoint).await?;
        envelope
            .into_data()
            .inspect_err(|error| log_failure(&endpoint, error))
    }

    /// Stateless chat without database access.
    pub async fn chat(&self, body: &ChatRequest) -> Result<ChatReply, ApiError> {
        let endpoint = "/chat";
        let request = self.http.post(self.url(endpoint)).json(body);

        let envelope: Envelope<ChatReply> = self.send(request, endpoint).await?;
        envelope
            .into_data()
            .inspect_err(|error| log_failure(endpoint, error))
    }

    /// Chat that may query the customer database to answer.
    pub async fn smart_chat(&self, body: &SmartChatRequest) -> Result<SmartChatReply, ApiError> {
        let endpoint = "/smart-chat";
        let request = self.http.post(self.url(endpoint)).json(body);

        let envelope: Envelope<SmartChatReply> = self.send(request, endpoint).await?;
        envelope
            .into_data()
            .inspect_err(|error| log_failure(endpoint, error))
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|error| {
            tracing::warn!(
                code = "API_TRANSPORT_FAILED",
                endpoint = %mask_tax_id(endpoint),
                timed_out = error.is_timeout(),
                error = %mask_tax_id(&error.to_string()),
                "request failed before a response arrived"
            );
            ApiError::transport()
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            tracing::warn!(
                code = "API_TRANSPORT_FAILED",
                endpoint = %mask_tax_id(endpoint),
                status = status.as_u16(),
                error = %mask_tax_id(&error.to_string()),
                "failed to read response body"
            );
            ApiError::transport()
        })?;

        if !status.is_success() {
            let error = ApiError::from_status(status.as_u16(), &body);
            log_failure(endpoint, &error);
            return Err(error);
        }

        serde_json::from_str(&body).map_err(|error| {
            tracing::warn!(
                code = "API_DECODE_FAILED",
                endpoint = %mask_tax_id(endpoint),
                error = %error,
                "response body did not match the expected shape"
            );
            ApiError::decode()
        })
    }
}

fn log_failure(endpoint: &str, error: &ApiError) {
    tracing::warn!(
        code = error.kind().code(),
        endpoint = %mask_tax_id(endpoint),
        message = %mask_tax_id(error.message()),
        "api call failed"
    );
}
