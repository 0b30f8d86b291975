//! HandoffNotifier trait definition.
//!
//! The external messaging capability used for human handoff. The concrete
//! implementation lives in heritagebox-infra (`SlackNotifier`).

use heritagebox_types::error::NotifyError;

/// Posts a handoff summary to the team channel.
pub trait HandoffNotifier: Send + Sync {
    /// Post the transcript summary. On success returns the created thread
    /// id when the backend produces one (`None` for fire-and-forget
    /// webhooks, in which case no reverse mapping can be registered).
    ///
    /// An unconfigured backend returns [`NotifyError::NotConfigured`]
    /// without any network call.
    fn post_handoff(
        &self,
        summary: &str,
    ) -> impl Future<Output = Result<Option<String>, NotifyError>> + Send;
}
