//! Notifier that keeps every notice for later assertions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stayhub_storefront::{Notice, NoticeKind, Notifier};

/// Records notices in the order they were raised.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<(NoticeKind, Notice)>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices raised so far.
    #[must_use]
    pub fn notices(&self) -> Vec<(NoticeKind, Notice)> {
        self.lock().clone()
    }

    /// The most recent notice, if any.
    #[must_use]
    pub fn last(&self) -> Option<(NoticeKind, Notice)> {
        self.lock().last().cloned()
    }

    /// Titles of notices of `kind`, in order.
    #[must_use]
    pub fn titles(&self, kind: NoticeKind) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, n)| n.title.clone())
            .collect()
    }

    /// Forget every recorded notice.
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(NoticeKind, Notice)>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, notice: Notice) {
        self.lock().push((kind, notice));
    }
}
