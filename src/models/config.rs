//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    /// Base URL of the remote ticket API.
    pub api_url: String,
    /// Base URL of the postal-code lookup service.
    pub cep_api_url: String,
    /// Externally visible base URL, used to build shareable links.
    pub public_url: String,
    pub templates_dir: String,
    pub secret: String,
}

impl ServerConfig {
    /// Public URL of the ticket creation page.
    pub fn form_page_url(&self) -> String {
        format!("{}/form", self.public_url.trim_end_matches('/'))
    }
}
