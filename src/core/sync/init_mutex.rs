use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};

/// Async "init-once" mutex owning a value that is only available after boot.
///
/// Callers pass a closure that runs with the guard held, so every operation
/// on the value is serialized as a whole.
pub(crate) struct InitMutex<T> {
    inner: Mutex<CriticalSectionRawMutex, Option<T>>,
}

impl<T> InitMutex<T> {
    pub(crate) const fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    pub(crate) async fn init(&self, value: T) {
        self.inner.lock().await.replace(value);
    }

    /// Run `op` with exclusive access to the value.
    ///
    /// Returns `None` if the value has not been initialized yet.
    pub(crate) async fn with<R>(&self, op: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.inner.lock().await;
        guard.as_mut().map(op)
    }
}
