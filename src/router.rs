use crate::gate::access_gate;
use crate::handlers::{
    admin, auth, cashier,
    health::{health_check, index, not_found},
    superadmin,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use axum_prometheus::PrometheusMetricLayer;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        // Sessions and registration
        .route("/auth/login", get(auth::login_form).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/session", get(auth::session))
        // Superadmin area
        .route("/dashboard/superadmin", get(superadmin::dashboard))
        .route(
            "/dashboard/superadmin/accounts",
            get(superadmin::list_accounts).post(superadmin::create_account),
        )
        .route(
            "/dashboard/superadmin/accounts/:id",
            put(superadmin::rename_account).delete(superadmin::delete_account),
        )
        .route(
            "/dashboard/superadmin/accounts/:id/toggle-active",
            post(superadmin::toggle_account),
        )
        // Admin area
        .route("/dashboard/admin", get(admin::dashboard))
        .route(
            "/dashboard/admin/cashiers",
            get(admin::list_cashiers).post(admin::create_cashier),
        )
        .route(
            "/dashboard/admin/cashiers/:id",
            put(admin::rename_cashier).delete(admin::delete_cashier),
        )
        .route(
            "/dashboard/admin/cashiers/:id/toggle-active",
            post(admin::toggle_cashier),
        )
        // Cashier area
        .route("/dashboard/cashier", get(cashier::terminal))
        .route("/dashboard/cashier/profile", put(cashier::rename_self))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // `/dashboard`, `/protected` and unknown paths reach the gate through the fallback
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), access_gate));

    // The recorder is process-global, so metrics are opt-in.
    let router = if state.settings.metrics.enabled {
        info!("Prometheus metrics enabled on /metrics");
        let (metric_layer, metric_handle) = PrometheusMetricLayer::pair();
        router
            .route(
                "/metrics",
                get(move || {
                    let handle = metric_handle.clone();
                    async move { handle.render() }
                }),
            )
            .layer(metric_layer)
    } else {
        router
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
