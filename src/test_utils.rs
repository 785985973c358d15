#[cfg(test)]
pub mod test_utils {
    use crate::config::{Settings, app_state_with_db};
    use crate::directory::{self, NewAccount};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use access::ListingScope;
    use axum::Router;
    use axum::http::{HeaderValue, StatusCode};
    use axum_test::TestServer;
    use common::{ApiResponse, SessionDto};
    use migration::{Migrator, MigratorTrait};
    use model::entities::profile::{self, Role};
    use sea_orm::{Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Password of every seeded account.
    pub const PASSWORD: &str = "password123";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        setup_test_app_state_with(Settings::default()).await
    }

    pub async fn setup_test_app_state_with(settings: Settings) -> AppState {
        let db = setup_test_db().await;
        app_state_with_db(db, settings)
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is read from RUST_LOG and defaults to WARN.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Test server plus the state behind it, for seeding rows directly.
    pub async fn setup_test_server_with(settings: Settings) -> (TestServer, AppState) {
        let state = setup_test_app_state_with(settings).await;
        let server = TestServer::new(create_router(state.clone())).expect("Failed to start test server");
        (server, state)
    }

    pub async fn setup_test_server() -> (TestServer, AppState) {
        setup_test_server_with(Settings::default()).await
    }

    fn new_account(email: &str, fullname: &str, role: Option<Role>) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            fullname: fullname.to_string(),
            role,
        }
    }

    /// Inserts an account without a creator.
    pub async fn seed_account(state: &AppState, email: &str, fullname: &str, role: Role) -> profile::Model {
        directory::register_account(&state.db, state.identity.as_ref(), new_account(email, fullname, Some(role)))
            .await
            .expect("Failed to seed account")
    }

    /// Inserts a cashier created by `admin`.
    pub async fn seed_cashier(state: &AppState, admin: &profile::Model, email: &str, fullname: &str) -> profile::Model {
        directory::create_account(
            &state.db,
            state.identity.as_ref(),
            &ListingScope::CashiersCreatedBy(admin.id.clone()),
            &admin.id,
            new_account(email, fullname, None),
        )
        .await
        .expect("Failed to seed cashier")
    }

    /// Signs in through the API and returns the session token.
    pub async fn login(server: &TestServer, email: &str) -> String {
        let response = server
            .post("/auth/login")
            .json(&serde_json::json!({ "email": email, "password": PASSWORD }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<SessionDto> = response.json();
        body.data.token
    }

    pub fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("Invalid token header")
    }
}
