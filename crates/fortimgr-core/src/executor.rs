// ── Retrying request executor ──
//
// Every controller read goes through here. One attempt is a full
// open → call → close cycle on a fresh session; status `-11` (FortiManager's
// spurious "no permission for the resource") is retried after a delay, any
// other non-zero status fails immediately.

use std::time::Duration;

use fortimgr_api::{Connector, GetParams, RpcReply, Session};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Status FortiManager returns intermittently for resources the caller
/// does have access to.
pub const TRANSIENT_NO_PERMISSION: i64 = -11;

/// How often and how long to wait before reissuing a `-11` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Pause before each extra attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Single attempt, no retries.
    pub fn never() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// The two request shapes. Both share the retry loop; they differ only in
/// which session method is invoked.
#[derive(Debug, Clone, Copy)]
enum Call<'a> {
    Get { url: &'a str, params: &'a GetParams },
    Execute { url: &'a str, data: &'a Value },
}

impl Call<'_> {
    fn url(&self) -> &str {
        match self {
            Self::Get { url, .. } | Self::Execute { url, .. } => url,
        }
    }
}

/// Issues controller requests with the `-11` retry policy applied.
#[derive(Debug)]
pub struct RequestExecutor<C> {
    connector: C,
    policy: RetryPolicy,
}

impl<C: Connector> RequestExecutor<C> {
    pub fn new(connector: C, policy: RetryPolicy) -> Self {
        Self { connector, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// `get` a resource; returns the reply payload on status `0`.
    pub async fn get(&self, url: &str, params: &GetParams) -> Result<Value, CoreError> {
        self.run(Call::Get { url, params }).await
    }

    /// `exec` a resource with a JSON body; returns the reply payload on status `0`.
    pub async fn execute(&self, url: &str, data: &Value) -> Result<Value, CoreError> {
        self.run(Call::Execute { url, data }).await
    }

    async fn run(&self, call: Call<'_>) -> Result<Value, CoreError> {
        let mut retries = 0;
        loop {
            let reply = self.attempt(&call).await?;

            if reply.is_success() {
                debug!(url = call.url(), attempts = retries + 1, "request succeeded");
                return Ok(reply.data);
            }

            if reply.code == TRANSIENT_NO_PERMISSION && retries < self.policy.max_retries {
                retries += 1;
                warn!(
                    url = call.url(),
                    retry = retries,
                    max_retries = self.policy.max_retries,
                    delay_ms = u64::try_from(self.policy.delay.as_millis()).unwrap_or(u64::MAX),
                    "controller returned status -11, retrying"
                );
                tokio::time::sleep(self.policy.delay).await;
                continue;
            }

            debug!(url = call.url(), code = reply.code, "request failed");
            return Err(CoreError::Upstream {
                code: reply.code,
                payload: reply.data,
            });
        }
    }

    /// One acquire → call → release cycle. The session is closed even when
    /// the call itself fails at the transport level.
    async fn attempt(&self, call: &Call<'_>) -> Result<RpcReply, CoreError> {
        let session = self.connector.open().await?;
        let result = match *call {
            Call::Get { url, params } => session.get(url, params).await,
            Call::Execute { url, data } => session.execute(url, data).await,
        };
        session.close().await;
        Ok(result?)
    }
}
