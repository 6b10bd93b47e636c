//! HTTP client for GoHighLevel contact creation and webhooks.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::Serialize;
use tracing::{error, info};

use super::error::CrmError;
use super::payload::{rest_contact_body, webhook_body, ContactDetails, QuoteSummary};

pub const DEFAULT_BASE_URL: &str = "https://rest.gohighlevel.com/";
const CONTACTS_PATH: &str = "v1/contacts/";
/// Longest slice of an error body echoed back to the caller
const MAX_ERROR_BODY: usize = 500;

/// Which path a lead went out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionChannel {
    Rest,
    Webhook,
}

/// Outcome of a successful CRM call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmSubmission {
    pub channel: SubmissionChannel,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
}

#[derive(Clone)]
struct Credentials {
    api_key: String,
    location_id: String,
}

pub struct GoHighLevelClient {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
    webhook_url: Option<String>,
}

impl std::fmt::Debug for GoHighLevelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoHighLevelClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials.as_ref().map(|_| "[redacted]"))
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl GoHighLevelClient {
    /// Creates a client. Either path may be left unconfigured; calls on an
    /// unconfigured path fail with [`CrmError::NotConfigured`].
    ///
    /// # Errors
    ///
    /// [`CrmError::Http`] if the `reqwest::Client` cannot be built,
    /// [`CrmError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        timeout_secs: u64,
        base_url: &str,
        api_key: Option<String>,
        location_id: Option<String>,
        webhook_url: Option<String>,
    ) -> Result<Self, CrmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("fencequote/0.1")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|_| CrmError::InvalidBaseUrl(base_url.to_string()))?;

        let credentials = match (api_key, location_id) {
            (Some(api_key), Some(location_id)) => Some(Credentials {
                api_key,
                location_id,
            }),
            _ => None,
        };

        Ok(Self {
            client,
            base_url,
            credentials,
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn has_rest_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn has_webhook(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Create a contact through the REST API.
    ///
    /// # Errors
    ///
    /// - [`CrmError::NotConfigured`] without an API key and location id.
    /// - [`CrmError::Http`] on network failure.
    /// - [`CrmError::Status`] when the CRM answers non-2xx.
    pub async fn create_contact(
        &self,
        contact: &ContactDetails,
        quote: Option<&QuoteSummary>,
    ) -> Result<CrmSubmission, CrmError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(CrmError::NotConfigured("GHL_API_KEY / GHL_LOCATION_ID"))?;

        let url = self
            .base_url
            .join(CONTACTS_PATH)
            .map_err(|_| CrmError::InvalidBaseUrl(self.base_url.to_string()))?;
        let body = rest_contact_body(contact, &credentials.location_id, quote);

        let response = self
            .client
            .post(url)
            .bearer_auth(&credentials.api_key)
            .header("Location", &credentials.location_id)
            .json(&body)
            .send()
            .await?;
        let (status, payload) = check_status(response, SubmissionChannel::Rest).await?;
        let contact_id = payload
            .get("contact")
            .and_then(|c| c.get("id"))
            .or_else(|| payload.get("id"))
            .and_then(|id| id.as_str())
            .map(str::to_string);

        info!(status, contact_id = ?contact_id, "CRM contact created");
        Ok(CrmSubmission {
            channel: SubmissionChannel::Rest,
            status,
            contact_id,
        })
    }

    /// Post a quote lead to the webhook.
    ///
    /// # Errors
    ///
    /// - [`CrmError::NotConfigured`] without a webhook URL.
    /// - [`CrmError::Http`] on network failure or an unparseable URL.
    /// - [`CrmError::Status`] when the webhook answers non-2xx.
    pub async fn send_webhook(
        &self,
        contact: &ContactDetails,
        summary: &QuoteSummary,
    ) -> Result<CrmSubmission, CrmError> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(CrmError::NotConfigured("GHL_WEBHOOK_URL"))?;

        let response = self
            .client
            .post(url)
            .json(&webhook_body(contact, summary))
            .send()
            .await?;
        let (status, _) = check_status(response, SubmissionChannel::Webhook).await?;

        info!(status, reference = %summary.reference, "quote webhook delivered");
        Ok(CrmSubmission {
            channel: SubmissionChannel::Webhook,
            status,
            contact_id: None,
        })
    }

    /// Submit a quote lead: webhook when configured, otherwise REST.
    ///
    /// # Errors
    ///
    /// See [`Self::send_webhook`] and [`Self::create_contact`].
    pub async fn submit_quote(
        &self,
        contact: &ContactDetails,
        summary: &QuoteSummary,
    ) -> Result<CrmSubmission, CrmError> {
        if self.has_webhook() {
            self.send_webhook(contact, summary).await
        } else {
            self.create_contact(contact, Some(summary)).await
        }
    }
}

/// Turn a non-2xx response into [`CrmError::Status`]; otherwise return the
/// status with the JSON body (or `null` when the body isn't JSON).
async fn check_status(
    response: Response,
    channel: SubmissionChannel,
) -> Result<(u16, serde_json::Value), CrmError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let body: String = text.chars().take(MAX_ERROR_BODY).collect();
        error!(channel = ?channel, status = status.as_u16(), body = %body, "CRM rejected submission");
        return Err(CrmError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let payload = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
    Ok((status.as_u16(), payload))
}
