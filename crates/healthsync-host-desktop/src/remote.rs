//! HTTP client for the remote symptoms endpoint

use async_trait::async_trait;
use chrono::NaiveDate;
use healthsync_api::{Symptoms, UpdateSymptoms};
use healthsync_config::RemoteSettings;
use healthsync_host_api::{RemoteError, RemoteResult, RemoteSymptoms, UpsertResponse};
use healthsync_util::format_day;
use reqwest::{Client, header};
use tracing::{debug, warn};

/// Upserts one symptoms record per day with `PUT {base}/symptoms?date=`
pub struct HttpSymptomsClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpSymptomsClient {
    pub fn new(base_url: impl Into<String>, settings: &RemoteSettings) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: settings.auth_token.clone(),
        })
    }

    /// Build a client from settings, or None if no endpoint is configured
    pub fn from_settings(settings: &RemoteSettings) -> reqwest::Result<Option<Self>> {
        match &settings.base_url {
            Some(base) => Self::new(base.clone(), settings).map(Some),
            None => Ok(None),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/symptoms", self.base_url)
    }
}

#[async_trait]
impl RemoteSymptoms for HttpSymptomsClient {
    async fn upsert(&self, day: NaiveDate, body: &UpdateSymptoms) -> RemoteResult<UpsertResponse> {
        let payload =
            serde_json::to_vec(body).map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        let mut request = self
            .client
            .put(self.endpoint())
            .query(&[("date", format_day(day))])
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout
            } else {
                RemoteError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        let symptoms = if status == 200 && !bytes.is_empty() {
            match serde_json::from_slice::<Symptoms>(&bytes) {
                Ok(symptoms) => Some(symptoms),
                Err(e) => {
                    warn!(error = %e, "Ignoring unparseable upsert response body");
                    None
                }
            }
        } else {
            None
        };

        debug!(day = %day, status, echoed = symptoms.is_some(), "Upsert response");
        Ok(UpsertResponse { status, symptoms })
    }
}
