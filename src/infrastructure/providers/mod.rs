pub mod helpdesk_client;

pub use helpdesk_client::HelpdeskApiClient;
