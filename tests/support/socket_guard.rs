//! Mock verse service startup for sandboxes without loopback networking.
//!
//! When 127.0.0.1 cannot be bound, wiremock tests print a notice and return
//! early. CI sets `VERSEBOOK_REQUIRE_SOCKET_TESTS=1` to make that a failure.

use std::net::TcpListener;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "VERSEBOOK_REQUIRE_SOCKET_TESTS";

fn loopback_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .is_ok_and(|value| {
            matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        })
}

/// True when no loopback socket can be bound here.
#[must_use]
pub fn loopback_unavailable() -> bool {
    let Err(error) = TcpListener::bind(("127.0.0.1", 0)) else {
        return false;
    };

    let notice = format!("mock verse service needs a loopback socket ({error})");
    assert!(!loopback_required(), "{notice}; unset {REQUIRE_ENV} to allow skipping");
    eprintln!("{notice}; skipping test");
    true
}

/// Starts a mock verse service, or returns `None` when the test should skip.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if loopback_unavailable() {
        return None;
    }
    Some(MockServer::start().await)
}
