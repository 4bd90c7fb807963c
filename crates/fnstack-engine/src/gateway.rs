//! HTTP client for the function gateway's system API.

use std::collections::BTreeMap;
use std::time::Duration;

use fnstack_common::constants::SYSTEM_FUNCTIONS_PATH;
use fnstack_common::error::{FnstackError, Result};
use fnstack_common::types::ResolvedFunctionSpec;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::collaborator::GatewayClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployRequest<'a> {
    service: &'a str,
    image: &'a str,
    env_process: &'a str,
    network: &'a str,
    env_vars: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    function_name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    Removed,
    Absent,
}

/// [`GatewayClient`] speaking JSON over HTTP to `/system/functions`.
///
/// Every request is bounded by the timeout given at construction, so an
/// unreachable gateway fails one function instead of hanging the run.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
}

impl HttpGateway {
    /// Creates a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FnstackError::Config`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FnstackError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self::with_client(client))
    }

    /// Wraps an already configured client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn post_function(&self, spec: &ResolvedFunctionSpec) -> std::result::Result<(), String> {
        let body = DeployRequest {
            service: &spec.name,
            image: &spec.image,
            env_process: spec.fprocess.as_deref().unwrap_or_default(),
            network: &spec.network,
            env_vars: &spec.environment,
        };
        let json = serde_json::to_vec(&body).map_err(|e| e.to_string())?;
        let url = endpoint(&spec.gateway_url);
        tracing::debug!(%url, image = %spec.image, network = %spec.network, "POST function");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(json)
            .send()
            .map_err(|e| format!("request to {url} failed: {e}"))?;

        match response.status() {
            status if is_accepted(status) => Ok(()),
            status => Err(status_message(status, response.text().unwrap_or_default())),
        }
    }

    fn remove_function(
        &self,
        gateway_url: &str,
        name: &str,
    ) -> std::result::Result<Removal, String> {
        let json = serde_json::to_vec(&DeleteRequest {
            function_name: name,
        })
        .map_err(|e| e.to_string())?;
        let url = endpoint(gateway_url);
        tracing::debug!(%url, name, "DELETE function");

        let response = self
            .client
            .delete(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(json)
            .send()
            .map_err(|e| format!("request to {url} failed: {e}"))?;

        match response.status() {
            status if is_accepted(status) => Ok(Removal::Removed),
            StatusCode::NOT_FOUND => Ok(Removal::Absent),
            status => Err(status_message(status, response.text().unwrap_or_default())),
        }
    }
}

impl GatewayClient for HttpGateway {
    fn deploy(&self, spec: &ResolvedFunctionSpec) -> Result<()> {
        let deploy_error = |message: String| FnstackError::Deploy {
            name: spec.name.clone(),
            message,
        };

        if spec.replace {
            match self.remove_function(&spec.gateway_url, &spec.name) {
                Ok(Removal::Removed) => tracing::info!("removed existing function before deploy"),
                Ok(Removal::Absent) => tracing::debug!("no existing function to replace"),
                Err(message) => return Err(deploy_error(format!("replace: {message}"))),
            }
        }

        self.post_function(spec).map_err(deploy_error)?;
        tracing::info!(gateway = %spec.gateway_url, "function deployed");
        Ok(())
    }

    fn delete(&self, gateway_url: &str, name: &str) -> Result<()> {
        let delete_error = |message: String| FnstackError::Delete {
            name: name.to_string(),
            message,
        };

        match self.remove_function(gateway_url, name).map_err(delete_error)? {
            Removal::Removed => {
                tracing::info!(gateway = gateway_url, "function removed");
                Ok(())
            }
            Removal::Absent => Err(delete_error(format!(
                "no function named {name} on {gateway_url}"
            ))),
        }
    }
}

fn endpoint(gateway_url: &str) -> String {
    format!("{}{SYSTEM_FUNCTIONS_PATH}", gateway_url.trim_end_matches('/'))
}

/// Statuses the gateway answers with when a deploy or delete took effect.
fn is_accepted(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT
    )
}

fn status_message(status: StatusCode, body: String) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    }
}
