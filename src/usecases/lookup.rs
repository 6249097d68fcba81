//! One-shot queries behind the `customers`, `customer` and `ask` subcommands.

use thiserror::Error;

use crate::{
    api::error::ApiError,
    domain::{
        chat::AssistantReply,
        customer::Customer,
        customer_list_state::CustomerPage,
        filters::CustomerFilters,
        local_view::{self, LocalCriteria, SortOrder},
        pagination::{normalized_page_size, PaginationInfo, DEFAULT_PAGE_SIZE},
    },
};

pub trait CustomerSource {
    fn list_customers(
        &self,
        page: u32,
        per_page: u32,
        filters: &CustomerFilters,
    ) -> Result<CustomerPage, ApiError>;

    fn get_customer(&self, customer_id: &str) -> Result<Customer, ApiError>;

    fn ask(&self, message: String) -> Result<AssistantReply, ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerQuery {
    pub page: u32,
    pub per_page: u32,
    pub filters: CustomerFilters,
    pub order: Option<SortOrder>,
}

impl Default for CustomerQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            filters: CustomerFilters::default(),
            order: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerListing {
    pub customers: Vec<Customer>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("customer id must not be empty")]
    EmptyCustomerId,
    #[error("message must not be empty")]
    EmptyMessage,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Fetches one page and applies the requested local sort.
pub fn list_customers(
    source: &dyn CustomerSource,
    query: &CustomerQuery,
) -> Result<CustomerListing, LookupError> {
    let page = query.page.max(1);
    let per_page = normalized_page_size(query.per_page);
    let fetched = source.list_customers(page, per_page, &query.filters)?;

    let customers = match query.order {
        None => fetched.customers,
        Some(order) => local_view::derive(&fetched.customers, &LocalCriteria::sorted_by(order))
            .into_iter()
            .cloned()
            .collect(),
    };

    Ok(CustomerListing {
        customers,
        pagination: fetched.pagination,
    })
}

pub fn customer_detail(source: &dyn CustomerSource, customer_id: &str) -> Result<Customer, LookupError> {
    let customer_id = customer_id.trim();
    if customer_id.is_empty() {
        return Err(LookupError::EmptyCustomerId);
    }

    Ok(source.get_customer(customer_id)?)
}

pub fn ask(source: &dyn CustomerSource, message: &str) -> Result<AssistantReply, LookupError> {
    if message.trim().is_empty() {
        return Err(LookupError::EmptyMessage);
    }

    Ok(source.ask(message.to_owned())?)
}
