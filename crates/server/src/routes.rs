pub mod auth;
pub mod crud;
pub mod users;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::{Health, Message};
use service::reference::{BidRepository, CurvePointRepository, RatingRepository, RuleRepository, TradeRepository};
use service::user::UserRepository;
use service::CrudRepository;

use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::document())
}

async fn no_route() -> ApiError {
    ApiError::NotFound("No resource matches the requested path.".into())
}

/// Method routers answer 405 with an empty body; keep the `Allow` header and
/// add the usual `{"message"}`.
async fn method_not_allowed_body(resp: Response) -> Response {
    if resp.status() != StatusCode::METHOD_NOT_ALLOWED {
        return resp;
    }
    let allow = resp.headers().get(header::ALLOW).cloned();
    let mut out = (StatusCode::METHOD_NOT_ALLOWED, Json(Message::new("Method not allowed for this resource."))).into_response();
    if let Some(allow) = allow {
        out.headers_mut().insert(header::ALLOW, allow);
    }
    out
}

/// Collection and item routes for one resource, split so that the write
/// half can carry its own route layer.
fn crud_routes<R: CrudRepository>(base: &str) -> (Router<ServerState>, Router<ServerState>) {
    let item = format!("{base}/:id");
    let reads = Router::new()
        .route(base, get(crud::list::<R>))
        .route(&item, get(crud::get::<R>));
    let writes = Router::new()
        .route(base, post(crud::create::<R>))
        .route(&item, axum::routing::put(crud::update::<R>).delete(crud::delete::<R>));
    (reads, writes)
}

/// Build the full application router: public endpoints, bearer-protected
/// reads, and Admin-only writes plus user administration.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let session = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let mut reads = Router::new();
    let mut writes = Router::new();
    for (r, w) in [
        crud_routes::<BidRepository>("/bids"),
        crud_routes::<CurvePointRepository>("/curve-points"),
        crud_routes::<RatingRepository>("/ratings"),
        crud_routes::<RuleRepository>("/rules"),
        crud_routes::<TradeRepository>("/trades"),
    ] {
        reads = reads.merge(r);
        writes = writes.merge(w);
    }

    let (user_reads, user_writes) = crud_routes::<UserRepository>("/users");
    let admin = writes
        .merge(user_reads)
        .merge(user_writes)
        .route(
            "/users/:id/roles",
            get(users::user_roles)
                .post(users::add_roles)
                .put(users::set_roles)
                .delete(users::remove_role),
        )
        .route("/roles", get(users::list_roles).post(users::create_role))
        .route("/roles/:name", delete(users::delete_role))
        .route_layer(middleware::from_fn(auth::require_admin));

    public
        .merge(session)
        .merge(reads)
        .merge(admin)
        .fallback(no_route)
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
        .layer(middleware::map_response(method_not_allowed_body))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
