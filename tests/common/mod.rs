use axum_test::TestServer;
use shop_server::core::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Batch size of the test state. Large enough that every fixture page fits
/// in a single `IN` batch; the chunking itself is covered by the
/// repository tests.
pub const TEST_BATCH_FETCH_SIZE: usize = 100;

/// Creates an AppState for the tests
///
/// # Arguments
/// * `pool` - SQLite connection pool
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, TEST_BATCH_FETCH_SIZE))
}

/// Creates a TestServer for the tests
///
/// # Arguments
/// * `state` - AppState to run the server with
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = shop_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}
