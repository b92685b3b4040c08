// src/routes.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn router(app_state: AppState) -> Router {
    let guard = axum_middleware::from_fn_with_state(app_state.clone(), auth_guard);

    // Cadastro de petshop e listagem são públicos; o resto de /petshop exige token
    let public_routes: Router<AppState> = Router::new()
        .route(
            "/petshop",
            post(handlers::petshop::create_petshop).merge(
                get(handlers::petshop::get_petshop)
                    .patch(handlers::petshop::update_petshop)
                    .route_layer(guard.clone()),
            ),
        )
        .route("/petshop/list", get(handlers::petshop::list_petshops));

    let petshop_routes: Router<AppState> = Router::new()
        .route("/petshop/{petshopId}", get(handlers::petshop::micro_get_petshop))
        .route(
            "/petshop/configuration",
            post(handlers::configuration::create_configuration)
                .patch(handlers::configuration::update_configuration)
                .get(handlers::configuration::get_configuration),
        )
        .route(
            "/petshop/{petshopId}/configuration",
            get(handlers::configuration::micro_get_configuration),
        )
        .route(
            "/petshop/{petshopId}/configuration/client",
            get(handlers::configuration::client_get_configuration),
        )
        .route(
            "/petshop/responsible-person",
            post(handlers::responsible_person::create_responsible_person)
                .patch(handlers::responsible_person::update_responsible_person)
                .get(handlers::responsible_person::get_responsible_person),
        )
        .route(
            "/petshop/concise-responsible-person",
            get(handlers::responsible_person::worker_get_concise_responsible_person),
        );

    let worker_routes: Router<AppState> = Router::new()
        .route(
            "/worker",
            post(handlers::worker::create_worker).get(handlers::worker::get_worker),
        )
        .route("/worker/list", get(handlers::worker::list_workers))
        .route("/worker/concise-list", get(handlers::worker::list_worker_names))
        .route("/worker/{workerId}", patch(handlers::worker::update_worker))
        .route(
            "/worker/{workerId}/petshop/{petshopId}/check",
            get(handlers::worker::micro_check_worker_petshop),
        );

    let client_routes: Router<AppState> = Router::new()
        .route(
            "/client",
            post(handlers::client::create_client)
                .patch(handlers::client::update_client_self)
                .get(handlers::client::get_client),
        )
        .route("/client/list", get(handlers::client::list_clients))
        .route("/client/schedule-data/check", post(handlers::client::check_scheduled_client_data))
        .route("/client/{clientId}", patch(handlers::client::update_client))
        .route("/client/{clientId}/cpf", patch(handlers::client::update_client_cpf))
        .route(
            "/client/{clientId}/petshop/list/check",
            get(handlers::client::micro_check_client_petshops),
        )
        .route(
            "/client/{clientId}/petshop/{petshopId}/micro",
            get(handlers::client::micro_get_client_petshop),
        );

    let email_routes: Router<AppState> = Router::new()
        .route("/user/email/is-user-blocked", get(handlers::email_block::is_user_blocked))
        .route("/user/email/blocked/list", get(handlers::email_block::list_blocked))
        .route("/user/email/block", post(handlers::email_block::block))
        .route("/user/email/release", post(handlers::email_block::release));

    let protected_routes: Router<AppState> = Router::new()
        .merge(petshop_routes)
        .merge(worker_routes)
        .merge(client_routes)
        .merge(email_routes)
        .route_layer(guard);

    let api_routes: Router<AppState> = Router::new().merge(public_routes).merge(protected_routes);

    // O front roda em outro domínio
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1/backend", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
