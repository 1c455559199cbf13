/// User-facing notifications (toasts in the portal UI).
///
/// Fire-and-forget: implementations must not block and nothing is returned.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}
