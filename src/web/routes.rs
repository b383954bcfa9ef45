pub mod sentiment;
pub mod users;
pub mod webhooks;
