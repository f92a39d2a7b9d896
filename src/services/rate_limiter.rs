//! Sliding-window limiter for login traffic
//!
//! Two windows are tracked independently: failed attempts per email
//! (5 per 15 minutes) and requests per client IP (10 per minute).

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::net::IpAddr;
use tokio::sync::RwLock;

const EMAIL_MAX_FAILURES: usize = 5;
const EMAIL_WINDOW_MINUTES: i64 = 15;
const IP_MAX_REQUESTS: usize = 10;
const IP_WINDOW_MINUTES: i64 = 1;

/// Timestamps per key, pruned to a fixed window on every touch
struct Window<K> {
    hits: RwLock<HashMap<K, Vec<DateTime<Utc>>>>,
    span: Duration,
    limit: usize,
}

impl<K: Eq + Hash> Window<K> {
    fn new(span: Duration, limit: usize) -> Self {
        Self {
            hits: RwLock::new(HashMap::new()),
            span,
            limit,
        }
    }

    async fn is_limited(&self, key: K) -> bool {
        let cutoff = Utc::now() - self.span;
        let mut hits = self.hits.write().await;
        let times = hits.entry(key).or_default();
        times.retain(|t| *t > cutoff);
        times.len() >= self.limit
    }

    async fn record(&self, key: K) {
        self.hits.write().await.entry(key).or_default().push(Utc::now());
    }

    async fn clear(&self, key: &K) {
        self.hits.write().await.remove(key);
    }

    async fn prune(&self) {
        let cutoff = Utc::now() - self.span;
        self.hits.write().await.retain(|_, times| {
            times.retain(|t| *t > cutoff);
            !times.is_empty()
        });
    }
}

pub struct LoginRateLimiter {
    failures: Window<String>,
    requests: Window<IpAddr>,
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self {
            failures: Window::new(Duration::minutes(EMAIL_WINDOW_MINUTES), EMAIL_MAX_FAILURES),
            requests: Window::new(Duration::minutes(IP_WINDOW_MINUTES), IP_MAX_REQUESTS),
        }
    }

    /// Whether this email has used up its failed attempts
    pub async fn is_email_limited(&self, email: &str) -> bool {
        self.failures.is_limited(normalize(email)).await
    }

    pub async fn record_failed_attempt(&self, email: &str) {
        self.failures.record(normalize(email)).await;
    }

    /// Forget failures after a successful login
    pub async fn clear_email_attempts(&self, email: &str) {
        self.failures.clear(&normalize(email)).await;
    }

    pub async fn is_ip_limited(&self, ip: IpAddr) -> bool {
        self.requests.is_limited(ip).await
    }

    pub async fn record_ip_request(&self, ip: IpAddr) {
        self.requests.record(ip).await;
    }

    /// Drop expired entries; run periodically
    pub async fn cleanup(&self) {
        self.failures.prune().await;
        self.requests.prune().await;
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_email_limited_after_five_failures() {
        let limiter = LoginRateLimiter::new();

        for _ in 0..4 {
            limiter.record_failed_attempt("jana@example.com").await;
        }
        assert!(!limiter.is_email_limited("jana@example.com").await);

        limiter.record_failed_attempt("jana@example.com").await;
        assert!(limiter.is_email_limited("jana@example.com").await);

        limiter.clear_email_attempts("jana@example.com").await;
        assert!(!limiter.is_email_limited("jana@example.com").await);
    }

    #[tokio::test]
    async fn test_email_key_ignores_case_and_whitespace() {
        let limiter = LoginRateLimiter::new();
        for email in ["Jana@Example.com", " jana@example.com", "JANA@EXAMPLE.COM", "jana@example.com", "jana@EXAMPLE.com"] {
            limiter.record_failed_attempt(email).await;
        }
        assert!(limiter.is_email_limited("jana@example.com").await);
    }

    #[tokio::test]
    async fn test_ip_limited_after_ten_requests() {
        let limiter = LoginRateLimiter::new();
        let ip: IpAddr = "10.0.0.7".parse().unwrap();
        let other: IpAddr = "10.0.0.8".parse().unwrap();

        for _ in 0..9 {
            limiter.record_ip_request(ip).await;
        }
        assert!(!limiter.is_ip_limited(ip).await);

        limiter.record_ip_request(ip).await;
        assert!(limiter.is_ip_limited(ip).await);
        assert!(!limiter.is_ip_limited(other).await);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_fresh_entries() {
        let limiter = LoginRateLimiter::new();
        for _ in 0..5 {
            limiter.record_failed_attempt("a@b.sk").await;
        }
        limiter.cleanup().await;
        assert!(limiter.is_email_limited("a@b.sk").await);
    }
}
