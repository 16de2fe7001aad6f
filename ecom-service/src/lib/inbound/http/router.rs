use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::checkout::checkout;
use super::handlers::create_product::create_product;
use super::handlers::current_user::current_user;
use super::handlers::get_product::get_product;
use super::handlers::list_orders::list_orders;
use super::handlers::list_products::list_products;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::protect;
use super::middleware::AuthGate;
use crate::domain::order::ports::OrderServicePort;
use crate::domain::product::ports::ProductServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub product_service: Arc<dyn ProductServicePort>,
    pub order_service: Arc<dyn OrderServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    product_service: Arc<dyn ProductServicePort>,
    order_service: Arc<dyn OrderServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let gate = AuthGate::new(authenticator.clone(), user_service.clone());
    let state = AppState {
        user_service,
        product_service,
        order_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let protected_routes = protect(
        Router::new()
            .route("/users/me", get(current_user))
            .route("/products", get(list_products).post(create_product))
            .route("/products/:product_id", get(get_product))
            .route("/cart/checkout", post(checkout))
            .route("/orders", get(list_orders)),
        gate,
    );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let api = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .nest("/api/v1", api)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
