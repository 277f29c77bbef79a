//! Client for the public postal-code (CEP) lookup service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::domain::address::Address;
use crate::domain::types::PostalCode;
use crate::repository::AddressLookup;
use crate::repository::errors::RepositoryResult;

/// Looks addresses up against a BrasilAPI-compatible `/cep/v1/{cep}` endpoint.
#[derive(Clone, Debug)]
pub struct CepLookup {
    client: Client,
    base_url: String,
}

impl CepLookup {
    pub fn new(base_url: &str) -> RepositoryResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AddressLookup for CepLookup {
    async fn lookup_address(&self, cep: &PostalCode) -> RepositoryResult<Option<Address>> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, cep.as_str()))
            .send()
            .await?;

        // Anything but 200 is treated as "no address for this code".
        if response.status() != StatusCode::OK {
            log::info!("No address found for CEP {cep}: {}", response.status());
            return Ok(None);
        }

        Ok(Some(response.json::<Address>().await?))
    }
}
