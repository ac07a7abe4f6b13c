use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::ComputeError;
use super::types::{
    Address, ApiErrorBody, ForwardingRule, ListResponse, Network, Route, Router, Subnetwork,
};

const COMPUTE_API_BASE: &str = "https://compute.googleapis.com/compute/v1";

/// Read-only Compute Engine v1 client covering the resources the network module creates.
#[derive(Clone)]
pub struct ComputeClient {
    client: reqwest::Client,
    base_url: String,
}

impl ComputeClient {
    pub fn new(token: String) -> Result<Self, ComputeError> {
        Self::with_base_url(token, COMPUTE_API_BASE.to_string())
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(token: String, base_url: String) -> Result<Self, ComputeError> {
        let mut headers = HeaderMap::new();
        let header_value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ComputeError::Auth {
                message: "Invalid token format".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ComputeError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    pub async fn get_network(&self, project: &str, name: &str) -> Result<Network, ComputeError> {
        let url = format!(
            "{}/projects/{}/global/networks/{}",
            self.base_url, project, name
        );
        self.get_resource(&url, "network", name).await
    }

    pub async fn get_subnetwork(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<Subnetwork, ComputeError> {
        let url = format!(
            "{}/projects/{}/regions/{}/subnetworks/{}",
            self.base_url, project, region, name
        );
        self.get_resource(&url, "subnetwork", name).await
    }

    pub async fn list_routes(
        &self,
        project: &str,
        filter: &str,
    ) -> Result<Vec<Route>, ComputeError> {
        let url = format!("{}/projects/{}/global/routes", self.base_url, project);
        self.fetch_all_pages(&url, Some(filter), "routes").await
    }

    pub async fn list_routers(
        &self,
        project: &str,
        region: &str,
        filter: &str,
    ) -> Result<Vec<Router>, ComputeError> {
        let url = format!(
            "{}/projects/{}/regions/{}/routers",
            self.base_url, project, region
        );
        self.fetch_all_pages(&url, Some(filter), "routers").await
    }

    pub async fn list_global_addresses(
        &self,
        project: &str,
        filter: &str,
    ) -> Result<Vec<Address>, ComputeError> {
        let url = format!("{}/projects/{}/global/addresses", self.base_url, project);
        self.fetch_all_pages(&url, Some(filter), "global addresses")
            .await
    }

    pub async fn list_global_forwarding_rules(
        &self,
        project: &str,
        filter: &str,
    ) -> Result<Vec<ForwardingRule>, ComputeError> {
        let url = format!(
            "{}/projects/{}/global/forwardingRules",
            self.base_url, project
        );
        self.fetch_all_pages(&url, Some(filter), "global forwarding rules")
            .await
    }

    async fn get_resource<T: DeserializeOwned>(
        &self,
        url: &str,
        kind: &str,
        name: &str,
    ) -> Result<T, ComputeError> {
        tracing::debug!(kind, name, "fetching resource");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ComputeError::NotFound {
                kind: kind.to_string(),
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        response.json::<T>().await.map_err(|e| ComputeError::Decode {
            kind: kind.to_string(),
            message: e.to_string(),
        })
    }

    /// Follows `nextPageToken` until exhausted, collecting every item.
    pub async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        base_url: &str,
        filter: Option<&str>,
        kind: &str,
    ) -> Result<Vec<T>, ComputeError> {
        let mut all_results = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = Vec::new();
            if let Some(filter) = filter {
                params.push(format!("filter={}", urlencoding::encode(filter)));
            }
            if let Some(token) = &page_token {
                params.push(format!("pageToken={}", urlencoding::encode(token)));
            }
            let url = if params.is_empty() {
                base_url.to_string()
            } else {
                format!("{}?{}", base_url, params.join("&"))
            };

            let response = self.client.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            let page: ListResponse<T> =
                response.json().await.map_err(|e| ComputeError::Decode {
                    kind: kind.to_string(),
                    message: e.to_string(),
                })?;
            all_results.extend(page.items);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(kind, count = all_results.len(), "listed resources");
        Ok(all_results)
    }
}

async fn error_from_response(response: reqwest::Response) -> ComputeError {
    let status = response.status();
    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) if !body.error.message.is_empty() => body.error.message,
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ComputeError::Auth { message },
        _ => ComputeError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

impl std::fmt::Debug for ComputeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
