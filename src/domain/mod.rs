//! Domain layer: customers, filters and the per-screen state machines.

pub mod chat;
pub mod customer;
pub mod customer_detail_state;
pub mod customer_list_state;
pub mod dashboard;
pub mod debounce;
pub mod events;
pub mod filters;
pub mod local_view;
pub mod pagination;
pub mod shell_state;
pub mod text_input_state;
pub mod visibility;
