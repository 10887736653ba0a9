use axum::Router;

mod health;
mod upload;

pub fn configure_routes(router: Router) -> Router {
    router
        .merge(health::configure())
        .nest("/api", upload::configure())
}
