//! Transport abstraction for the settings endpoints.
//!
//! The transport owns serialization, delivery, retries, and timeouts.
//! Implementations may use HTTP or anything else; sync only needs one
//! request/response call per endpoint.

use async_trait::async_trait;

use crate::error::Result;
use crate::messages::{
    ChangeSetRequest, ChangeSetResponse, LegacySettingsRequest, LegacySettingsResponse,
};

/// Client side of the account service's settings endpoints.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait SettingsTransport: Send + Sync {
    /// Send a change-set and receive the server's view of each setting.
    async fn change_settings(&self, request: ChangeSetRequest) -> Result<ChangeSetResponse>;

    /// Send the legacy flat settings body.
    async fn legacy_named_settings(
        &self,
        request: LegacySettingsRequest,
    ) -> Result<LegacySettingsResponse>;
}

/// In-memory transports for testing.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::{DateTime, Utc};
    use serde_json::Value;
    use tokio::sync::Mutex;

    use crate::error::SyncError;
    use crate::messages::{instant, LegacyEntry, ResponseEntry};

    /// A setting as the server stores it.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ServerSetting {
        pub value: Value,
        pub modified_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Default)]
    struct ServerState {
        named: BTreeMap<String, ServerSetting>,
        legacy: BTreeMap<String, Value>,
        change_requests: Vec<ChangeSetRequest>,
        legacy_requests: Vec<LegacySettingsRequest>,
        fail_next: Option<String>,
    }

    /// An in-process account service.
    ///
    /// For change-sets it keeps the entry with the later modification
    /// instant and answers with every setting it holds. For the legacy
    /// endpoint it reports `changed` whenever its stored value differs from
    /// the one sent.
    #[derive(Debug, Default)]
    pub struct MemoryServer {
        state: Mutex<ServerState>,
    }

    impl MemoryServer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store a named setting directly, bypassing last-writer-wins.
        pub async fn seed(
            &self,
            name: &str,
            value: impl Into<Value>,
            modified_at: Option<DateTime<Utc>>,
        ) {
            let setting = ServerSetting {
                value: value.into(),
                modified_at,
            };
            self.state.lock().await.named.insert(name.to_string(), setting);
        }

        /// Store a legacy field directly.
        pub async fn seed_legacy(&self, name: &str, value: impl Into<Value>) {
            self.state
                .lock()
                .await
                .legacy
                .insert(name.to_string(), value.into());
        }

        pub async fn setting(&self, name: &str) -> Option<ServerSetting> {
            self.state.lock().await.named.get(name).cloned()
        }

        pub async fn legacy_value(&self, name: &str) -> Option<Value> {
            self.state.lock().await.legacy.get(name).cloned()
        }

        /// Make the next call on either endpoint fail with a transport error.
        pub async fn fail_next(&self, message: &str) {
            self.state.lock().await.fail_next = Some(message.to_string());
        }

        /// Change-set requests received so far.
        pub async fn change_requests(&self) -> Vec<ChangeSetRequest> {
            self.state.lock().await.change_requests.clone()
        }

        /// Legacy requests received so far.
        pub async fn legacy_requests(&self) -> Vec<LegacySettingsRequest> {
            self.state.lock().await.legacy_requests.clone()
        }
    }

    #[async_trait]
    impl SettingsTransport for MemoryServer {
        async fn change_settings(&self, request: ChangeSetRequest) -> Result<ChangeSetResponse> {
            let mut state = self.state.lock().await;
            if let Some(message) = state.fail_next.take() {
                return Err(SyncError::Transport(message));
            }
            state.change_requests.push(request.clone());

            for (name, entry) in request.iter() {
                // Unstamped entries carry no claim of recency.
                let Some(client_at) = entry.modified_at else {
                    continue;
                };
                let server_at = state.named.get(name).and_then(|s| s.modified_at);
                let keep_server = server_at.is_some_and(|server_at| server_at >= client_at);
                if !keep_server {
                    state.named.insert(
                        name.to_string(),
                        ServerSetting {
                            value: entry.value.into(),
                            modified_at: Some(client_at),
                        },
                    );
                }
            }

            let response = state
                .named
                .iter()
                .fold(ChangeSetResponse::new(), |response, (name, setting)| {
                    let entry = ResponseEntry {
                        value: setting.value.clone(),
                        modified_at: setting
                            .modified_at
                            .as_ref()
                            .map(|at| Value::String(instant::format(at))),
                    };
                    response.with_entry(name.clone(), entry)
                });
            Ok(response)
        }

        async fn legacy_named_settings(
            &self,
            request: LegacySettingsRequest,
        ) -> Result<LegacySettingsResponse> {
            let mut state = self.state.lock().await;
            if let Some(message) = state.fail_next.take() {
                return Err(SyncError::Transport(message));
            }
            state.legacy_requests.push(request.clone());

            let sent: [(&str, Value); 5] = [
                ("skipForward", request.skip_forward.into()),
                ("skipBack", request.skip_back.into()),
                ("marketingOptIn", request.marketing_opt_in.into()),
                ("freeGiftAcknowledgement", request.free_gift_acknowledgement.into()),
                ("gridOrder", request.grid_order.into()),
            ];

            let mut response = LegacySettingsResponse::new();
            for (name, client_value) in sent {
                let entry = match state.legacy.get(name).cloned() {
                    Some(server_value) if server_value != client_value => {
                        LegacyEntry::changed(server_value)
                    }
                    _ => {
                        state.legacy.insert(name.to_string(), client_value.clone());
                        LegacyEntry::unchanged(client_value)
                    }
                };
                response = response.with_entry(name, entry);
            }
            Ok(response)
        }
    }

    /// A transport that answers with canned responses and records requests.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        change_response: Option<ChangeSetResponse>,
        legacy_response: Option<LegacySettingsResponse>,
        failure: Option<String>,
        calls: Mutex<Calls>,
    }

    #[derive(Debug, Default)]
    struct Calls {
        change: Vec<ChangeSetRequest>,
        legacy: Vec<LegacySettingsRequest>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_change_response(mut self, response: ChangeSetResponse) -> Self {
            self.change_response = Some(response);
            self
        }

        pub fn with_legacy_response(mut self, response: LegacySettingsResponse) -> Self {
            self.legacy_response = Some(response);
            self
        }

        /// Fail every call with a transport error.
        pub fn failing(mut self, message: &str) -> Self {
            self.failure = Some(message.to_string());
            self
        }

        pub async fn change_requests(&self) -> Vec<ChangeSetRequest> {
            self.calls.lock().await.change.clone()
        }

        pub async fn legacy_requests(&self) -> Vec<LegacySettingsRequest> {
            self.calls.lock().await.legacy.clone()
        }

        /// Total calls across both endpoints.
        pub async fn call_count(&self) -> usize {
            let calls = self.calls.lock().await;
            calls.change.len() + calls.legacy.len()
        }
    }

    #[async_trait]
    impl SettingsTransport for ScriptedTransport {
        async fn change_settings(&self, request: ChangeSetRequest) -> Result<ChangeSetResponse> {
            self.calls.lock().await.change.push(request);
            if let Some(message) = &self.failure {
                return Err(SyncError::Transport(message.clone()));
            }
            Ok(self.change_response.clone().unwrap_or_default())
        }

        async fn legacy_named_settings(
            &self,
            request: LegacySettingsRequest,
        ) -> Result<LegacySettingsResponse> {
            self.calls.lock().await.legacy.push(request);
            if let Some(message) = &self.failure {
                return Err(SyncError::Transport(message.clone()));
            }
            Ok(self.legacy_response.clone().unwrap_or_default())
        }
    }
}
