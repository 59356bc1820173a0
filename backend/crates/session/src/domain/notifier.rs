//! User-facing alerts

/// Blocking, user-visible notification
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}
