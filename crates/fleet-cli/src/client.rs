//! HTTP client for the deployment management API

use crate::error::{CliError, CliResult};
use fleet_types::*;
use reqwest::{Client, StatusCode};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::debug;

/// Deployments requested per page
pub const PAGE_SIZE: u32 = 100;

/// HTTP client for communicating with the management API
pub struct FleetClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

/// Filters the service applies on its side of the listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentQuery {
    pub location: Option<String>,
    pub image: Option<String>,
    pub state: Option<DeploymentState>,
    pub ipv4: Option<Ipv4Addr>,
}

impl DeploymentQuery {
    /// Query parameters for the set filters, in a stable order
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(location) = &self.location {
            params.push(("location", location.clone()));
        }
        if let Some(image) = &self.image {
            params.push(("image", image.clone()));
        }
        if let Some(state) = &self.state {
            params.push(("state", state.as_str().to_string()));
        }
        if let Some(ipv4) = &self.ipv4 {
            params.push(("ipv4", ipv4.to_string()));
        }
        params
    }
}

impl FleetClient {
    /// Create a new client
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> CliResult<Self> {
        let base_url = Url::parse(endpoint)
            .map_err(|e| CliError::InvalidInput(format!("endpoint '{}': {}", endpoint, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(CliError::InvalidInput(format!(
                "endpoint '{}' must use http or https",
                endpoint
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fleet-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    // ========== Account API ==========

    /// Account the token belongs to
    pub async fn account(&self) -> CliResult<Account> {
        self.get(&["account"], &[]).await
    }

    // ========== Deployment API ==========

    /// List deployments matching `query`, following pagination to the end
    pub async fn list_deployments(
        &self,
        query: &DeploymentQuery,
    ) -> CliResult<Vec<Record<Deployment>>> {
        let mut deployments = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen = HashSet::new();

        loop {
            let mut params = query.to_params();
            params.push(("limit", PAGE_SIZE.to_string()));
            if let Some(cursor) = &cursor {
                params.push(("cursor", cursor.clone()));
            }

            let page: DeploymentPage = self.get(&["deployments"], &params).await?;
            debug!(
                count = page.deployments.len(),
                cursor = cursor.as_deref().unwrap_or("-"),
                "fetched deployment page"
            );
            deployments.extend(page.deployments);

            match page.next_cursor.filter(|c| !c.is_empty()) {
                None => break,
                Some(next) if !seen.insert(next.clone()) => {
                    return Err(CliError::Protocol(format!(
                        "pagination cursor '{}' repeated",
                        next
                    )));
                }
                Some(next) => cursor = Some(next),
            }
        }

        Ok(deployments)
    }

    /// Get a deployment by ID
    pub async fn get_deployment(
        &self,
        deployment_id: &DeploymentId,
    ) -> CliResult<Record<Deployment>> {
        self.get(&["deployments", deployment_id.as_str()], &[])
            .await
    }

    // ========== Placement API ==========

    /// List placements of a deployment, events included
    pub async fn list_placements(
        &self,
        deployment_id: &DeploymentId,
    ) -> CliResult<Vec<Record<Placement>>> {
        self.get(&["deployments", deployment_id.as_str(), "placements"], &[])
            .await
    }

    // ========== Internal HTTP helpers ==========

    /// `/api/v1/<segments>` under the endpoint, each segment percent-encoded
    fn url(&self, segments: &[&str]) -> CliResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CliError::InvalidInput(format!("endpoint '{}' cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&'static str, String)],
    ) -> CliResult<T> {
        let url = self.url(segments)?;
        debug!(%url, ?params, "GET");

        let mut request = self.client.get(url).query(params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> CliResult<T> {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else if status == StatusCode::NOT_FOUND {
            Err(CliError::NotFound("Resource not found".into()))
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = response.text().await.unwrap_or_default();
            Err(CliError::Unauthorized(if message.is_empty() {
                "token rejected by the API".into()
            } else {
                message
            }))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(CliError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
