//! Tests for cooperative cancellation tokens

#[cfg(test)]
mod tests {
    use pascal_ifs::cancellation::{CancellationToken, is_cancelled};
    use std::thread;

    // Tests clones share one flag
    // Verified by deriving a deep clone of the flag
    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    // Tests cancellation is visible across threads
    // Verified by storing the flag in a thread-local
    #[test]
    fn test_cancel_from_another_thread() {
        let token = CancellationToken::new();
        let remote = token.clone();
        thread::spawn(move || remote.cancel())
            .join()
            .expect("thread finished");
        assert!(token.is_cancelled());
    }

    // Tests the optional-token helper
    // Verified by treating a missing token as cancelled
    #[test]
    fn test_optional_token() {
        let token = CancellationToken::default();
        assert!(!is_cancelled(None));
        assert!(!is_cancelled(Some(&token)));
        token.cancel();
        assert!(is_cancelled(Some(&token)));
    }
}
