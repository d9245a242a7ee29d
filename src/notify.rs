/// Transient user-facing notification channel. The web front end this
/// backend was built for surfaces these as toasts; the CLI prints them.
/// Contract: one message per failed call, emitted by whoever owns the
/// failure (the request wrapper for resource calls, the session store for
/// auth flows).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Prints notifications to stderr so they interleave cleanly with menu
/// output on stdout.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        eprintln!("[ok] {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("[error] {}", message);
    }
}
