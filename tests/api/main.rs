mod users_api;
mod webhooks_api;
