//! Capability interfaces provided by the host content-management runtime.
//!
//! The source consumes the host through these narrow traits: permission
//! checks, translated strings, audit logging, event dispatch, persisted
//! settings, session identity for signed render URLs, and the image
//! dimension probe. None of them carry storage logic.

use async_trait::async_trait;
use std::sync::Arc;

/// Yes/no permission checks for manager actions such as `file_update`,
/// `file_remove`, `directory_create`, `file_upload`, `directory_remove`.
pub trait PermissionOracle: Send + Sync {
    fn has_permission(&self, action: &str) -> bool;
}

/// Translated string lookup. `params` are placeholder name/value pairs the
/// host substitutes into the message.
pub trait Lexicon: Send + Sync {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// Manager audit trail.
pub trait AuditLog: Send + Sync {
    fn log_action(&self, action: &str, original: &str, new: &str);
}

/// Host event bus; payloads are plain JSON values.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &str, payload: serde_json::Value);
}

/// Named string settings persisted by the host.
///
/// The typed accessors fall back to a default when the setting is unset or
/// unparsable, mirroring how the host runtime resolves options.
pub trait SettingStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&self, name: &str, value: &str);

    fn get_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn get_bool(&self, name: &str, default: bool) -> bool {
        self.get(name)
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(default)
    }

    fn get_u32(&self, name: &str, default: u32) -> u32 {
        self.get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_u64(&self, name: &str, default: u64) -> u64 {
        self.get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

/// Identity of the manager session issuing the current request; feeds the
/// `wctx` and auth-token parameters of render URLs.
pub trait SessionContext: Send + Sync {
    fn context_key(&self) -> String;
    fn user_token(&self) -> String;
}

/// Determines the natural dimensions of a remote image, typically by
/// fetching it. `None` when the probe fails.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn dimensions(&self, url: &str) -> Option<(u32, u32)>;
}

/// The full set of host collaborators a source instance holds.
#[derive(Clone)]
pub struct HostServices {
    pub permissions: Arc<dyn PermissionOracle>,
    pub lexicon: Arc<dyn Lexicon>,
    pub audit: Arc<dyn AuditLog>,
    pub events: Arc<dyn EventSink>,
    pub settings: Arc<dyn SettingStore>,
    pub session: Arc<dyn SessionContext>,
    pub probe: Arc<dyn ImageProbe>,
}
