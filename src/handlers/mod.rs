pub mod auth_handler;
pub mod descriptive_handler;
pub mod graphql_handler;
pub mod health_handler;
pub mod pdf_handler;
pub mod result_handler;
pub mod test_handler;

use std::sync::Arc;

use actix_web::web;

use crate::{
    app_state::AppState, auth::AuthMiddleware, errors::AppError, graphql::create_schema,
};

pub use auth_handler::{login, register};
pub use descriptive_handler::{
    delete_descriptive, descriptive_history, evaluate_answer, improve_answer,
};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use pdf_handler::{delete_pdf, list_pdfs, upload_pdf};
pub use result_handler::{get_result, list_results};
pub use test_handler::{
    create_test, delete_test, generate_test, get_test, list_tests, start_test, submit_test,
    update_questions,
};

/// Public routes, mounted under `/api/auth`.
pub fn configure_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}

/// Authenticated routes, mounted under `/api`. Static segments are registered
/// ahead of `{id}` patterns that would otherwise shadow them.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(list_results)
        .service(get_result)
        .service(generate_test)
        .service(create_test)
        .service(list_tests)
        .service(get_test)
        .service(update_questions)
        .service(start_test)
        .service(submit_test)
        .service(delete_test)
        .service(upload_pdf)
        .service(list_pdfs)
        .service(delete_pdf)
        .service(evaluate_answer)
        .service(improve_answer)
        .service(descriptive_history)
        .service(delete_descriptive);
}

pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(health_check_live);
}

/// Malformed JSON bodies get the same `{error, code}` body as other
/// validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

/// Full route table as served by the binary.
pub fn configure_app(state: Arc<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let schema = create_schema((*state).clone());
        let max_pdf_bytes = state.config.max_pdf_bytes;

        cfg.app_data(web::Data::from(Arc::clone(&state.jwt_service)))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(web::Data::new(schema))
            .app_data(web::Data::new(state))
            .configure(configure_health)
            .service(web::scope("/api/auth").configure(configure_auth))
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .app_data(web::PayloadConfig::new(max_pdf_bytes + 1))
                    .configure(configure_api),
            )
            .service(
                web::resource("/graphql")
                    .wrap(AuthMiddleware)
                    .route(web::post().to(graphql_handler::graphql)),
            )
            .service(web::resource("/graphiql").route(web::get().to(graphql_handler::graphiql)));
    }
}
