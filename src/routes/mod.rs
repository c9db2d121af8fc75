mod agents;
mod auth;
mod health;
mod orders;
mod products;
mod reviews;
mod shops;

use axum::{
    Router,
    handler::Handler,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

use crate::{AppState, middleware::auth_middleware};

pub fn create_router(state: AppState) -> Router<AppState> {
    let bearer = from_fn_with_state(state, auth_middleware);

    let api = Router::new()
        // auth
        .route("/auth/register", post(auth::register_user))
        .route("/auth/login", post(auth::login_user))
        .route("/auth/me", get(auth::me).route_layer(bearer.clone()))
        // catalog: listing is public, mutation requires a shop owner
        .route(
            "/shops",
            get(shops::list_shops).post(shops::create_shop.layer(bearer.clone())),
        )
        .route(
            "/shops/owner/my-shops",
            get(shops::my_shops).route_layer(bearer.clone()),
        )
        .route("/shops/{id}", get(shops::get_shop))
        .route(
            "/products",
            get(products::list_products).post(products::create_product.layer(bearer.clone())),
        )
        .route(
            "/products/{id}",
            put(products::update_product).route_layer(bearer.clone()),
        )
        // orders
        .route(
            "/orders",
            get(orders::get_orders)
                .post(orders::create_order)
                .route_layer(bearer.clone()),
        )
        .route(
            "/orders/{id}",
            get(orders::get_order).route_layer(bearer.clone()),
        )
        .route(
            "/orders/{id}/status",
            put(orders::update_order_status).route_layer(bearer.clone()),
        )
        .route(
            "/orders/{id}/assign",
            put(orders::assign_agent).route_layer(bearer.clone()),
        )
        // directory & reviews
        .route(
            "/delivery-agents",
            get(agents::list_delivery_agents).route_layer(bearer.clone()),
        )
        .route(
            "/reviews",
            post(reviews::create_review).route_layer(bearer),
        )
        .route("/reviews/{target_id}", get(reviews::get_reviews));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api", api)
}
