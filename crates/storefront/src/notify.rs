//! User-facing notices.
//!
//! The comparison store reports outcomes through a [`Notifier`] instead of a
//! concrete toast widget. The UI layer decides how a notice is shown; the
//! default [`TracingNotifier`] just emits it as a log event.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A short message for the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    /// Create a notice.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Capability to surface notices to the visitor.
pub trait Notifier: Send + Sync {
    /// Show `notice` with the given severity.
    fn notify(&self, kind: NoticeKind, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, kind: NoticeKind, notice: Notice) {
        (**self).notify(kind, notice);
    }
}

/// Notifier that writes notices to the `tracing` pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, notice: Notice) {
        match kind {
            NoticeKind::Info | NoticeKind::Success => {
                info!(kind = ?kind, title = %notice.title, "{}", notice.description);
            }
            NoticeKind::Warning => {
                warn!(title = %notice.title, "{}", notice.description);
            }
            NoticeKind::Error => {
                error!(title = %notice.title, "{}", notice.description);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Collect(Mutex<Vec<(NoticeKind, Notice)>>);

    impl Notifier for Collect {
        fn notify(&self, kind: NoticeKind, notice: Notice) {
            if let Ok(mut notices) = self.0.lock() {
                notices.push((kind, notice));
            }
        }
    }

    #[test]
    fn test_arc_forwards_to_inner() {
        let inner = Arc::new(Collect::default());
        let shared: Arc<dyn Notifier> = inner.clone();

        shared.notify(NoticeKind::Success, Notice::new("Saved", "All good."));

        let notices = inner.0.lock().map(|n| n.clone()).unwrap_or_default();
        assert_eq!(
            notices,
            vec![(NoticeKind::Success, Notice::new("Saved", "All good."))]
        );
    }

    #[test]
    fn test_tracing_notifier_accepts_every_kind() {
        for kind in [
            NoticeKind::Info,
            NoticeKind::Success,
            NoticeKind::Warning,
            NoticeKind::Error,
        ] {
            TracingNotifier.notify(kind, Notice::new("t", "d"));
        }
    }
}
