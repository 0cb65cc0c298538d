use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub helpdesk_api_url: String,
    pub helpdesk_api_token: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub custom_field_entity_type: String,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let helpdesk_api_url = env::var("HELPDESK_API_URL")
            .map_err(|_| ConfigError::MissingApiUrl)?;
        if !helpdesk_api_url.starts_with("http://") && !helpdesk_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidApiUrl(helpdesk_api_url));
        }

        let helpdesk_api_token = env::var("HELPDESK_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3100".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let custom_field_entity_type =
            env::var("CUSTOM_FIELD_ENTITY_TYPE").unwrap_or_else(|_| "ticket".to_string());

        let otel_exporter_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

        let service_name =
            env::var("SERVICE_NAME").unwrap_or_else(|_| "helpdesk-console".to_string());

        let metrics_port = env::var("METRICS_PORT")
            .unwrap_or_else(|_| "9100".to_string())
            .parse()
            .unwrap_or(9100);

        Ok(Config {
            helpdesk_api_url,
            helpdesk_api_token,
            server_host,
            server_port,
            custom_field_entity_type,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HELPDESK_API_URL environment variable not set")]
    MissingApiUrl,

    #[error("HELPDESK_API_URL must be an http(s) URL, got '{0}'")]
    InvalidApiUrl(String),

    #[error("Invalid port number")]
    InvalidPort,
}
