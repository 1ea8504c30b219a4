use reqwest::Method;
use tracing::{debug, info, warn};

use super::endpoint::{handle_endpoint, set_handle_url};
use super::payload::HandlePayload;
use super::result::OperationResult;
use super::transport::{ClientTls, HandleRequest, HandleTransport, ReqwestTransport};
use crate::config::HandleConfig;
use crate::error::HandleError;

/// Statuses reported as success for create/update
pub const SET_ACCEPTED: &[u16] = &[200, 201];
/// Statuses reported as success for delete
pub const DELETE_ACCEPTED: &[u16] = &[200, 204];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Set,
    Delete,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Set => "set",
            Operation::Delete => "delete",
        }
    }

    fn accepted(&self) -> &'static [u16] {
        match self {
            Operation::Set => SET_ACCEPTED,
            Operation::Delete => DELETE_ACCEPTED,
        }
    }
}

/// Build the request for an operation without sending it
///
/// Fails only when the configuration is invalid or the body cannot be
/// encoded.
pub fn build_request(
    config: &HandleConfig,
    operation: Operation,
) -> Result<HandleRequest, HandleError> {
    config.ensure_valid()?;

    let (method, url, body) = match operation {
        Operation::Set => (
            Method::PUT,
            set_handle_url(config),
            Some(HandlePayload::from_config(config).to_bytes()?),
        ),
        // TODO: confirm against the Handle API whether DELETE honours ?overwrite or needs a body
        Operation::Delete => (Method::DELETE, handle_endpoint(config), None),
    };

    Ok(HandleRequest {
        method,
        url,
        headers: config.extra_headers.clone(),
        body,
        tls: ClientTls {
            key: config.key.clone(),
            cert: config.cert.clone(),
            verify_server: config.verify_tls,
        },
        timeout: config.timeout.map(|t| t.as_duration()),
    })
}

/// Creates, updates and deletes handles through a [`HandleTransport`]
///
/// Holds no per-call state, so one client can serve concurrent calls with
/// different configurations.
#[derive(Debug, Clone)]
pub struct HandleClient<T = ReqwestTransport> {
    transport: T,
}

impl HandleClient<ReqwestTransport> {
    pub fn new() -> Self {
        Self {
            transport: ReqwestTransport::new(),
        }
    }
}

impl Default for HandleClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HandleTransport> HandleClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// PUT the handle's URL and HS_ADMIN values
    ///
    /// Never fails: configuration, transport and API problems all come back
    /// as an unsuccessful [`OperationResult`].
    pub async fn set_handle(&self, config: &HandleConfig) -> OperationResult {
        self.run(config, Operation::Set).await
    }

    /// DELETE the handle
    pub async fn delete_handle(&self, config: &HandleConfig) -> OperationResult {
        self.run(config, Operation::Delete).await
    }

    async fn run(&self, config: &HandleConfig, operation: Operation) -> OperationResult {
        let handle = format!("{}/{}", config.resolved_prefix(), config.handle_name);

        match self.dispatch(config, operation).await {
            Ok(result) => {
                if result.success {
                    info!(operation = operation.name(), %handle, status = result.code, "Handle operation succeeded");
                } else {
                    warn!(operation = operation.name(), %handle, status = result.code, "Handle API returned unexpected status");
                }
                result
            }
            Err(e) => {
                warn!(operation = operation.name(), %handle, code = e.code(), error = %e, "Handle operation failed");
                e.into()
            }
        }
    }

    async fn dispatch(
        &self,
        config: &HandleConfig,
        operation: Operation,
    ) -> Result<OperationResult, HandleError> {
        let request = build_request(config, operation)?;

        debug!(operation = operation.name(), url = %request.url, "Dispatching handle request");

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(HandleError::Api {
                status: response.status,
                reason: response.reason,
            });
        }

        Ok(OperationResult::from_response(response, operation.accepted()))
    }
}
