//! Runtime configuration for form controllers.
//!
//! `FormsConfig` is plain serde data so the binary can layer it from
//! defaults, config files and environment variables. Every field has a
//! default; partial files are fine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::schema::TYPE_MISMATCH;
use crate::session::ValidationTrigger;

/// Default upper bound for one save call.
pub const DEFAULT_SAVE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Trigger used by controllers that don't pick one explicitly.
    pub validation_trigger: ValidationTrigger,
    /// `None` waits for the save handler indefinitely.
    pub save_timeout_secs: Option<u64>,
    pub messages: Messages,
}

impl FormsConfig {
    pub fn save_timeout(&self) -> Option<Duration> {
        self.save_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            validation_trigger: ValidationTrigger::default(),
            save_timeout_secs: Some(DEFAULT_SAVE_TIMEOUT_SECS),
            messages: Messages::default(),
        }
    }
}

/// User facing texts for submission-level failures.
///
/// These are shown verbatim in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// The save handler declined (`Ok(false)`) and the form has no own message.
    pub save_failed: String,
    pub network: String,
    pub timeout: String,
    /// Fallback when the handler failed without a usable message.
    pub unexpected: String,
    pub type_mismatch: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            save_failed: "保存に失敗しました".to_string(),
            network: "ネットワークエラーが発生しました。通信環境を確認してください".to_string(),
            timeout: "通信がタイムアウトしました。時間をおいて再度お試しください".to_string(),
            unexpected: "予期しないエラーが発生しました".to_string(),
            type_mismatch: TYPE_MISMATCH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: FormsConfig = serde_json::from_str(
            r#"{ "validation_trigger": "on-change", "messages": { "network": "offline" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.validation_trigger, ValidationTrigger::OnChange);
        assert_eq!(cfg.save_timeout_secs, Some(DEFAULT_SAVE_TIMEOUT_SECS));
        assert_eq!(cfg.messages.network, "offline");
        assert_eq!(cfg.messages.save_failed, Messages::default().save_failed);
    }

    #[test]
    fn zero_or_missing_timeout_disables_it() {
        let mut cfg = FormsConfig::default();
        assert_eq!(cfg.save_timeout(), Some(Duration::from_secs(30)));
        cfg.save_timeout_secs = Some(0);
        assert_eq!(cfg.save_timeout(), None);
        cfg.save_timeout_secs = None;
        assert_eq!(cfg.save_timeout(), None);
    }
}
