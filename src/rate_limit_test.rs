use super::*;

const MAX_REQUESTS: u64 = 20;
const WINDOW_MS: i64 = 60_000;

fn limiter() -> RateLimiter {
    RateLimiter::new(MAX_REQUESTS, WINDOW_MS)
}

#[test]
fn allows_up_to_limit_with_monotonic_remaining() {
    let rl = limiter();
    let now = 0;

    for i in 0..MAX_REQUESTS {
        let decision = rl.check_at("client", now);
        assert!(decision.allowed, "request {i} should be admitted");
        assert_eq!(decision.remaining, MAX_REQUESTS - i - 1);
    }

    let denied = rl.check_at("client", now);
    assert!(!denied.allowed);
    assert_eq!(denied.remaining, 0);
    assert_eq!(denied.reset_at, WINDOW_MS);
}

#[test]
fn window_expiry_restores_full_budget() {
    let rl = limiter();

    for _ in 0..MAX_REQUESTS {
        assert!(rl.check_at("client", 0).allowed);
    }
    assert!(!rl.check_at("client", WINDOW_MS - 1).allowed);

    let renewed = rl.check_at("client", WINDOW_MS);
    assert!(renewed.allowed);
    assert_eq!(renewed.remaining, MAX_REQUESTS - 1);
}

#[test]
fn distinct_clients_do_not_interfere() {
    let rl = limiter();

    for _ in 0..MAX_REQUESTS {
        rl.check_at("a", 0);
    }
    assert!(!rl.check_at("a", 0).allowed);
    assert!(rl.check_at("b", 0).allowed);
}

#[test]
fn stats_for_unknown_client_reports_full_budget() {
    let rl = limiter();
    let usage = rl.stats("never-seen");
    assert_eq!(usage.used, 0);
    assert_eq!(usage.limit, MAX_REQUESTS);
    assert_eq!(usage.remaining, MAX_REQUESTS);
}

#[test]
fn reset_clears_the_window() {
    let rl = limiter();
    for _ in 0..MAX_REQUESTS {
        assert!(rl.check_at("client", 0).allowed);
    }
    assert!(!rl.check_at("client", 0).allowed);

    rl.reset("client");
    assert!(rl.check_at("client", 0).allowed);
}
