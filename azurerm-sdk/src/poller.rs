//! Long-running operation polling.
//!
//! ARM reports asynchronous work in one of three ways: an
//! `Azure-AsyncOperation` header pointing at an operation status resource, a
//! `Location` header that answers 202 until the work is done, or a
//! `provisioningState` on the resource itself.

use std::time::Duration;

use reqwest::Method;
use serde::Deserialize;

use crate::client::{ArmClient, RequestOptions, Response};
use crate::error::{Error, Result};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

#[derive(Debug, Clone)]
pub struct PollerOptions {
    /// Delay between polls when the service sends no `Retry-After`
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PollTarget {
    AsyncOperation(String),
    Location(String),
    ProvisioningState(String),
    Done,
}

#[derive(Debug, PartialEq, Eq)]
enum Status {
    InProgress,
    Succeeded,
    Failed { status: String, message: String },
}

#[derive(Deserialize, Default)]
struct OperationStatus {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<OperationError>,
}

#[derive(Deserialize)]
struct OperationError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize, Default)]
struct ResourceBody {
    #[serde(default)]
    properties: Option<ResourceProperties>,
}

#[derive(Deserialize, Default)]
struct ResourceProperties {
    #[serde(rename = "provisioningState", default)]
    provisioning_state: Option<String>,
}

fn classify(status: &str, error: Option<OperationError>) -> Status {
    match status.to_ascii_lowercase().as_str() {
        "succeeded" => Status::Succeeded,
        "failed" | "canceled" | "cancelled" => {
            let message = error
                .map(|e| {
                    format!(
                        "{}: {}",
                        e.code.unwrap_or_default(),
                        e.message.unwrap_or_default()
                    )
                })
                .unwrap_or_default();
            Status::Failed {
                status: status.to_string(),
                message,
            }
        }
        _ => Status::InProgress,
    }
}

fn provisioning_state(response: &Response) -> Option<String> {
    if !response.has_body() {
        return None;
    }
    serde_json::from_str::<ResourceBody>(&response.body)
        .ok()
        .and_then(|b| b.properties)
        .and_then(|p| p.provisioning_state)
}

/// `Retry-After` in delta-seconds
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .header("retry-after")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

pub struct Poller<'a> {
    client: &'a ArmClient,
    target: PollTarget,
    delay: Duration,
}

impl<'a> Poller<'a> {
    /// Decide how to follow an operation from its initial response
    ///
    /// `request` is the call that started the operation; its path is polled
    /// when the service only reports progress via `provisioningState`.
    pub fn new(client: &'a ArmClient, initial: &Response, request: &RequestOptions) -> Result<Self> {
        let target = if let Some(url) = initial.header("azure-asyncoperation") {
            PollTarget::AsyncOperation(url.to_string())
        } else if let Some(url) = initial.header("location")
            && matches!(initial.status, 201 | 202)
        {
            PollTarget::Location(url.to_string())
        } else if let Some(state) = provisioning_state(initial) {
            match classify(&state, None) {
                Status::Succeeded => PollTarget::Done,
                Status::Failed { status, message } => {
                    return Err(Error::OperationFailed { status, message });
                }
                Status::InProgress => {
                    let get = RequestOptions::new(Method::GET, request.path.clone(), request.api_version.clone());
                    PollTarget::ProvisioningState(client.url_for(&get)?.to_string())
                }
            }
        } else {
            PollTarget::Done
        };

        Ok(Self {
            client,
            target,
            delay: retry_after(initial).unwrap_or(client.poller_options().interval),
        })
    }

    pub fn is_done(&self) -> bool {
        self.target == PollTarget::Done
    }

    /// Poll until the operation reaches a terminal state
    pub async fn poll_until_done(mut self) -> Result<()> {
        if self.is_done() {
            return Ok(());
        }
        let options = self.client.poller_options().clone();

        for attempt in 1..=options.max_attempts {
            tokio::time::sleep(self.delay).await;

            let (response, status) = self.poll_once().await?;
            log::debug!("poll {}/{}: {:?}", attempt, options.max_attempts, status);

            match status {
                Status::Succeeded => return Ok(()),
                Status::Failed { status, message } => {
                    return Err(Error::OperationFailed { status, message });
                }
                Status::InProgress => {
                    self.delay = retry_after(&response).unwrap_or(options.interval);
                }
            }
        }

        Err(Error::PollTimeout(options.max_attempts))
    }

    async fn poll_once(&self) -> Result<(Response, Status)> {
        match &self.target {
            PollTarget::AsyncOperation(url) => {
                let response = self.client.get_url(url, &[200, 201, 202]).await?;
                let body: OperationStatus = if response.has_body() {
                    response.json()?
                } else {
                    OperationStatus::default()
                };
                let status = match body.status {
                    Some(s) => classify(&s, body.error),
                    None => Status::InProgress,
                };
                Ok((response, status))
            }
            PollTarget::Location(url) => {
                let response = self.client.get_url(url, &[200, 201, 202, 204]).await?;
                let status = if response.status == 202 {
                    Status::InProgress
                } else {
                    Status::Succeeded
                };
                Ok((response, status))
            }
            PollTarget::ProvisioningState(url) => {
                let response = self.client.get_url(url, &[200]).await?;
                let status = provisioning_state(&response)
                    .map(|s| classify(&s, None))
                    .unwrap_or(Status::Succeeded);
                Ok((response, status))
            }
            PollTarget::Done => Ok((
                Response {
                    status: 200,
                    url: String::new(),
                    headers: Default::default(),
                    body: String::new(),
                },
                Status::Succeeded,
            )),
        }
    }
}
