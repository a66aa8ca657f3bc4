use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::errors::InternalError;
use crate::stores::AuditStore;
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::context::RequestContext;

/// Builder for creating audit events
///
/// Sensitive values are stored as a SHA-256 digest so events can still be
/// correlated without exposing the original value.
pub struct AuditBuilder {
    event_type: EventType,
    actor_id: Option<String>,
    target_id: Option<String>,
    ip_address: Option<String>,
    request_id: Option<String>,
    data: HashMap<String, serde_json::Value>,
    store: Arc<AuditStore>,
}

impl AuditBuilder {
    pub fn new(store: Arc<AuditStore>, event_type: impl Into<EventType>) -> Self {
        Self {
            event_type: event_type.into(),
            actor_id: None,
            target_id: None,
            ip_address: None,
            request_id: None,
            data: HashMap::new(),
            store,
        }
    }

    /// Populate actor, IP and request id from the RequestContext
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.actor_id = Some(ctx.actor_id.clone());
        self.ip_address = ctx.ip_string();
        self.request_id = Some(ctx.request_id.to_string());

        self.data.insert("source".to_string(), json!(ctx.source.to_string()));
        self.data.insert("authenticated".to_string(), json!(ctx.authenticated));
        if let Some(claims) = &ctx.claims {
            self.data.insert("jwt_id".to_string(), json!(claims.jti));
        }

        self
    }

    pub fn actor(mut self, id: impl Into<String>) -> Self {
        self.actor_id = Some(id.into());
        self
    }

    pub fn target(mut self, id: impl Into<String>) -> Self {
        self.target_id = Some(id.into());
        self
    }

    /// Add an arbitrary field, serialized to JSON
    pub fn add_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.data.insert(key.into(), json_value);
        }
        self
    }

    /// Add a sensitive field as `sha256:<hex>` of its JSON form
    pub fn add_sensitive(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(&value) {
            let mut hasher = Sha256::new();
            hasher.update(json_value.to_string().as_bytes());
            let hash_hex = format!("sha256:{:x}", hasher.finalize());

            self.data.insert(key.into(), json!(hash_hex));
        }
        self
    }

    /// Build the audit event without writing it
    pub fn build(self) -> AuditEvent {
        AuditEvent {
            event_type: self.event_type,
            actor_id: self.actor_id.unwrap_or_else(|| "unknown".to_string()),
            target_id: self.target_id,
            ip_address: self.ip_address,
            request_id: self.request_id,
            data: self.data,
        }
    }

    /// Build the event and write it to storage
    pub async fn write(self) -> Result<(), InternalError> {
        let store = self.store.clone();
        let event = self.build();
        store.write_event(event).await
    }
}
