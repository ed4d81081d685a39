use std::fmt::Write as FmtWrite;
use std::time::{Duration, Instant};

use backoff::ExponentialBackoffBuilder;
use backoff::backoff::Backoff;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_json::{Value, json};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::Result;
use crate::config::Config;
use crate::error::{ConfigError, Error, ZbxError};

use super::rpc::{RpcEnvelope, RpcRequest, ZbxRpc, body_preview};

const MAX_ATTEMPTS: u32 = 3;
const CORRELATION_HEADER: &str = "x-correlation-id";

/// HTTP JSON-RPC session against one Zabbix frontend.
#[derive(Clone)]
pub struct ZbxClient {
    http: reqwest::Client,
    base: Url,
    token: SecretString,
    timeout: Duration,
}

/// Outcome of a single HTTP round trip.
enum Attempt<T> {
    Done(Result<T>),
    Transient {
        error: ZbxError,
        reason: &'static str,
    },
}

impl ZbxClient {
    /// Build a `ZbxClient` configured with the supplied parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTPS is required but the URL uses another scheme,
    /// or if the underlying HTTP client fails to build.
    pub fn new(
        base: Url,
        token: SecretString,
        timeout: Duration,
        connect_timeout: Duration,
        insecure_http: bool,
    ) -> Result<Self> {
        if base.scheme() != "https" && !insecure_http {
            return Err(Error::Config(ConfigError::InvalidField {
                field: "zabbix.url",
                message: "only https URLs are accepted without --insecure".to_string(),
            }));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json-rpc"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .user_agent(concat!("zbx-apps/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(30));

        if !insecure_http {
            builder = builder.https_only(true);
        }

        let http = builder
            .build()
            .map_err(|err| ZbxError::Client { source: err })?;

        Ok(Self {
            http,
            base,
            token,
            timeout,
        })
    }

    /// Build a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ZbxClient::new`].
    pub fn from_config(config: &Config, insecure_http: bool) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.token.clone(),
            config.http_request_timeout,
            config.http_connect_timeout,
            insecure_http,
        )
    }

    /// Version string reported by `apiinfo.version`.
    ///
    /// # Errors
    ///
    /// Returns the transport or API error of the call.
    pub async fn api_version(&self) -> Result<String> {
        self.call_with_auth("apiinfo.version", json!([]), None).await
    }

    pub(super) async fn call<T>(&self, method: &str, params: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.call_with_auth(method, params, Some(self.token.expose_secret()))
            .await
    }

    async fn call_with_auth<T>(&self, method: &str, params: Value, auth: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(200))
            .with_multiplier(2.0)
            .with_randomization_factor(0.25)
            .with_max_interval(Duration::from_secs(2))
            .with_max_elapsed_time(Some(self.timeout))
            .build();

        let mut attempt = 1;
        loop {
            let correlation_id = Uuid::now_v7().to_string();
            let started = Instant::now();
            let payload = RpcRequest {
                jsonrpc: "2.0",
                method,
                params: &params,
                id: u64::from(attempt),
                auth,
            };

            let (error, reason) = match self.send_once(&payload, &correlation_id).await {
                Attempt::Done(result) => {
                    if result.is_ok() {
                        debug!(
                            method,
                            %correlation_id,
                            attempt,
                            latency_ms = started.elapsed().as_millis(),
                            "zabbix call succeeded"
                        );
                    }
                    return result;
                }
                Attempt::Transient { error, reason } => (error, reason),
            };

            if attempt == MAX_ATTEMPTS {
                return Err(ZbxError::RetryExhausted {
                    source: Box::new(error),
                }
                .into());
            }
            let Some(delay) = backoff.next_backoff() else {
                return Err(error.into());
            };
            warn!(
                method,
                %correlation_id,
                attempt,
                delay_ms = delay.as_millis(),
                reason,
                error = %error,
                "retrying zabbix call"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    async fn send_once<T>(&self, payload: &RpcRequest<'_>, correlation_id: &str) -> Attempt<T>
    where
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.base.clone())
            .header(CORRELATION_HEADER, correlation_id)
            .json(payload);

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(err) => {
                return Attempt::Transient {
                    error: ZbxError::from(err),
                    reason: "transport error",
                };
            }
        };

        let status = response.status();
        if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
            return Attempt::Transient {
                error: ZbxError::HttpStatus { status },
                reason: "server error",
            };
        }
        if !status.is_success() {
            return Attempt::Done(Err(ZbxError::HttpStatus { status }.into()));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                return Attempt::Transient {
                    error: ZbxError::from(err),
                    reason: "body read error",
                };
            }
        };

        let envelope: RpcEnvelope<T> = match serde_json::from_slice(&body) {
            Ok(env) => env,
            Err(err) => {
                let mut message = format!("error decoding response body: {err}; body preview: ");
                let _ = FmtWrite::write_str(&mut message, &body_preview(&body));
                let error = ZbxError::Json { message };
                // A well-formed body of the wrong shape will not change on retry.
                return match err.classify() {
                    Category::Syntax | Category::Eof | Category::Io => Attempt::Transient {
                        error,
                        reason: "JSON decode error",
                    },
                    Category::Data => Attempt::Done(Err(error.into())),
                };
            }
        };

        if let Some(err) = envelope.error {
            let mut message = err.message;
            if let Some(data) = err.data {
                let _ = FmtWrite::write_fmt(&mut message, format_args!(" - {data}"));
            }
            return Attempt::Done(Err(ZbxError::Api {
                code: err.code,
                message,
            }
            .into()));
        }

        Attempt::Done(
            envelope
                .result
                .ok_or_else(|| ZbxError::MissingField { field: "result" }.into()),
        )
    }
}

impl ZbxRpc for ZbxClient {
    async fn invoke<T>(&self, method: &str, params: Value) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.call(method, params).await
    }
}
