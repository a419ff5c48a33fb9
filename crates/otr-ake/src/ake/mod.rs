pub mod ake_context;
pub mod ake_error;
pub mod auth_state;
pub mod config;
pub mod events;
pub mod identity;
