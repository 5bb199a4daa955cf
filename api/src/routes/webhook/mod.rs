pub mod pull_request_webhook_route;
pub mod webhook_response;
