use crate::domain::model::Referee;
use crate::domain::ports::{ConfigProvider, RefereeGateway};
use crate::utils::error::{RosterError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::form_urlencoded::byte_serialize;

/// `RefereeGateway` over the JSON REST service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    first_name_url: String,
    last_name_url: String,
}

impl HttpGateway {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            first_name_url: config.first_name_url().to_string(),
            last_name_url: config.last_name_url().to_string(),
        })
    }

    fn record_url(&self, id: u64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Lookup URLs are a configured prefix with the encoded name appended.
    fn lookup_url(prefix: &str, name: &str) -> String {
        let encoded: String = byte_serialize(name.as_bytes()).collect();
        format!("{}{}", prefix, encoded)
    }

    async fn get_list(&self, url: &str) -> Result<Vec<Referee>> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;

        tracing::debug!("API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(RosterError::NetworkError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    async fn list_or_empty(&self, url: &str) -> Vec<Referee> {
        match self.get_list(url).await {
            Ok(referees) => referees,
            Err(e) => {
                tracing::error!("Referee lookup failed, showing no referees: {}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl RefereeGateway for HttpGateway {
    async fn fetch_all(&self) -> Vec<Referee> {
        self.list_or_empty(&self.base_url).await
    }

    async fn find_by_first_name(&self, name: &str) -> Vec<Referee> {
        let url = Self::lookup_url(&self.first_name_url, name);
        self.list_or_empty(&url).await
    }

    async fn find_by_last_name(&self, name: &str) -> Vec<Referee> {
        let url = Self::lookup_url(&self.last_name_url, name);
        self.list_or_empty(&url).await
    }

    async fn fetch_one(&self, id: u64) -> Result<Referee> {
        let url = self.record_url(id);
        tracing::debug!("Fetching referee {} from {}", id, url);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(RosterError::NotFoundError { id }),
            status => Err(RosterError::NetworkError {
                url,
                status: status.as_u16(),
            }),
        }
    }

    async fn update(&self, id: u64, referee: &Referee) -> Result<Referee> {
        let url = self.record_url(id);
        tracing::debug!("Updating referee {} at {}", id, url);
        let response = self.client.put(&url).json(referee).send().await?;

        if !response.status().is_success() {
            return Err(RosterError::NetworkError {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
