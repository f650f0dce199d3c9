//! Shared constants for end-to-end tests

// ============================================================================
// Upstream
// ============================================================================

/// API key the test server is configured with
pub const TEST_API_KEY: &str = "test-api-key";

/// Path the fake collection API answers on
pub const COLLECTION_PATH: &str = "/api/en/collection";

// ============================================================================
// Server
// ============================================================================

/// Message returned by the ping endpoint of the test server
pub const TEST_PING_MESSAGE: &str = "narwhal says hi";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for a server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Poll interval when waiting for a server (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Default timeout for HTTP requests in tests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Per-page fetch timeout the test server uses (seconds)
pub const FETCH_TIMEOUT_SECS: u64 = 2;
