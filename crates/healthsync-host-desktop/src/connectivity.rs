//! Network connectivity probe

use async_trait::async_trait;
use healthsync_config::ConnectivitySettings;
use healthsync_host_api::Connectivity;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Checks reachability by fetching a known URL once per call
pub struct HttpConnectivity {
    client: Client,
    check_url: String,
    check_timeout: Duration,
}

impl HttpConnectivity {
    pub fn new(settings: &ConnectivitySettings) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(settings.check_timeout)
            .connect_timeout(settings.check_timeout)
            .build()?;

        Ok(Self {
            client,
            check_url: settings.check_url.clone(),
            check_timeout: settings.check_timeout,
        })
    }

    pub fn check_url(&self) -> &str {
        &self.check_url
    }
}

#[async_trait]
impl Connectivity for HttpConnectivity {
    async fn is_connected(&self) -> bool {
        check_url_reachable(&self.client, &self.check_url, self.check_timeout).await
    }
}

async fn check_url_reachable(client: &Client, url: &str, timeout: Duration) -> bool {
    debug!(url = %url, "Checking connectivity");

    match client.get(url).timeout(timeout).send().await {
        Ok(response) => {
            let status = response.status();
            let connected = status.is_success();
            debug!(url = %url, status = %status, connected, "Connectivity check complete");
            connected
        }
        Err(e) => {
            debug!(url = %url, error = %e, "Connectivity check failed");
            false
        }
    }
}
