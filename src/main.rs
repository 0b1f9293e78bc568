mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
pub mod request;
pub mod response;

use std::time::Duration;

use actix_files::Files;
use actix_web::web::{delete, get, post, put, resource, scope, Data};
use actix_web::{App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::database::sqlx::PgSqlxManager;
use crate::impls::tokener::jwt::JWT;
use crate::impls::uploaders::local_storage::LocalStorage;
use crate::middlewares::jwt::JWTMiddleware;
use crate::middlewares::trust::Trust;

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match PgPoolOptions::new().max_connections(config.max_connections).connect(&config.database_url).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt <= config.connect_retries => {
                log::warn!("database connection attempt {} failed: {}", attempt, e);
                tokio::time::sleep(Duration::from_secs(2u64.pow(attempt.min(5)))).await;
            }
            Err(e) => return Err(e).context("failed to connect to database"),
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info,actix_web=info"));
    let config = Config::from_env()?;
    let pool = connect(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await.context("failed to run migrations")?;
    std::fs::create_dir_all(&config.upload_path).with_context(|| format!("failed to create upload directory {}", config.upload_path))?;

    let manager = PgSqlxManager::new(pool.clone());
    let tokener = JWT::new(config.jwt_secret.as_bytes().to_vec());
    let storage = LocalStorage::new(&config.upload_path);
    let secret = config.jwt_secret.as_bytes().to_vec();
    let upload_path = config.upload_path.clone();
    log::info!("listening on {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(manager.clone()))
            .app_data(Data::new(tokener.clone()))
            .app_data(Data::new(storage.clone()))
            .service(Files::new("/uploads", &upload_path))
            .service(
                scope("securewebsite")
                    .route("register", post().to(handlers::register))
                    .route("login", post().to(handlers::login))
                    .route("logout", get().to(handlers::logout))
                    .service(
                        scope("")
                            .wrap(JWTMiddleware::new(secret.clone()))
                            .route("CheckAdmin", get().to(handlers::check_admin))
                            .route("CheckUserReturnId", get().to(handlers::check_user_return_id))
                            .route("roles", get().to(handlers::my_roles))
                            .route("user/byemail", get().to(handlers::user_by_email))
                            .route("verify-classification-quiz", get().to(handlers::verify_classification_quiz))
                            .route("verify-web-connect", get().to(handlers::verify_web_connect)),
                    ),
            )
            .service(
                scope("Admin")
                    .wrap(Trust::admin(pool.clone()))
                    .wrap(JWTMiddleware::new(secret.clone()))
                    .route("users", get().to(handlers::admin::users))
                    .service(
                        scope("users/{user_id}")
                            .route("roles", get().to(handlers::admin::roles))
                            .route("toggle-admin", post().to(handlers::admin::toggle_admin))
                            .route("toggle-web-connect", post().to(handlers::admin::toggle_web_connect))
                            .route("toggle-classification-quiz", post().to(handlers::admin::toggle_classification_quiz))
                            .route("classification-quiz-role", post().to(handlers::admin::create_classification_quiz_role))
                            .route("web-connect-role", post().to(handlers::admin::create_web_connect_role))
                            .route("verification/{kind}", post().to(handlers::admin::issue_verification)),
                    ),
            )
            .service(
                scope("QuizCreationController")
                    .route("CreateQuiz/{config_link_id}", get().to(handlers::quiz::create_quiz))
                    .route("SubmitImageAnswers", post().to(handlers::quiz::submit_image_answers)),
            )
            .service(
                scope("AnswerStatisticsController")
                    .service(resource("config/sorted").wrap(JWTMiddleware::new(secret.clone())).route(get().to(handlers::statistics::sorted)))
                    .service(resource("export/json").wrap(JWTMiddleware::new(secret.clone())).route(get().to(handlers::statistics::export_json)))
                    .service(resource("export/csv").wrap(JWTMiddleware::new(secret.clone())).route(get().to(handlers::statistics::export_csv)))
                    .service(
                        resource("user/configlink-user-count")
                            .wrap(JWTMiddleware::new(secret.clone()))
                            .route(get().to(handlers::statistics::user_counts)),
                    )
                    .route("image/{category_id}/{image_name}", get().to(handlers::statistics::image))
                    .route("config/{config_link_id}", get().to(handlers::statistics::config_link))
                    .route("category/{category_id}", get().to(handlers::statistics::category))
                    .route("{category_id}", get().to(handlers::statistics::category_images)),
            )
            .service(
                scope("categories")
                    .route("", get().to(handlers::category::list))
                    .route("featured/{is_featured}", get().to(handlers::category::featured))
                    .route("configlink/{config_link_id}", get().to(handlers::category::by_config_link))
                    .route("user/{user_id}", get().to(handlers::category::by_user))
                    .route("{category_id}", get().to(handlers::category::detail))
                    .route("{category_id}/questions", get().to(handlers::question::of_category))
                    .service(
                        scope("")
                            .wrap(Trust::classification_quiz(pool.clone()))
                            .wrap(JWTMiddleware::new(secret.clone()))
                            .route("", post().to(handlers::category::create))
                            .route("{category_id}", put().to(handlers::category::update))
                            .route("{category_id}", delete().to(handlers::category::delete))
                            .route("{category_id}/questions", post().to(handlers::question::create)),
                    ),
            )
            .service(
                scope("questions")
                    .route("{question_id}", get().to(handlers::question::detail))
                    .route("{question_id}/options", get().to(handlers::option::of_question))
                    .service(
                        scope("")
                            .wrap(Trust::classification_quiz(pool.clone()))
                            .wrap(JWTMiddleware::new(secret.clone()))
                            .route("{question_id}", put().to(handlers::question::update))
                            .route("{question_id}", delete().to(handlers::question::delete))
                            .route("{question_id}/text", put().to(handlers::question::update_text))
                            .route("{question_id}/options", post().to(handlers::option::add_opts)),
                    ),
            )
            .service(
                scope("options")
                    .route("{option_id}", get().to(handlers::option::detail))
                    .service(
                        scope("")
                            .wrap(Trust::classification_quiz(pool.clone()))
                            .wrap(JWTMiddleware::new(secret.clone()))
                            .route("", post().to(handlers::option::create))
                            .route("{option_id}", put().to(handlers::option::update))
                            .route("{option_id}", delete().to(handlers::option::delete)),
                    ),
            )
            .service(
                scope("images")
                    .route("configlink/{config_link_id}", get().to(handlers::upload::by_config_link))
                    .service(
                        scope("")
                            .wrap(JWTMiddleware::new(secret.clone()))
                            .route("{image_id}", delete().to(handlers::upload::delete))
                            .service(
                                resource("{config_link_id}")
                                    .wrap(Trust::classification_quiz(pool.clone()))
                                    .route(post().to(handlers::upload::upload)),
                            ),
                    ),
            )
            .service(
                scope("webconnections")
                    .route("", get().to(handlers::web_connection::list))
                    .route("{connection_id}", get().to(handlers::web_connection::detail))
                    .service(
                        scope("")
                            .wrap(Trust::web_connect(pool.clone()))
                            .wrap(JWTMiddleware::new(secret.clone()))
                            .route("", post().to(handlers::web_connection::create))
                            .route("{connection_id}", put().to(handlers::web_connection::update))
                            .route("{connection_id}", delete().to(handlers::web_connection::delete)),
                    ),
            )
    })
    .bind(&config.bind_address)?
    .run()
    .await?;
    Ok(())
}
