use actix_web::web::Data;
use actix_web::{middleware::Logger, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use volunify::config::Config;
use volunify::database::sqlx::PgSqlxManager;
use volunify::handlers;
use volunify::impls::tokener::jwt::JWT;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("actix_web=info,volunify=info")).init();
    let config = Config::from_env().expect("failed to load configuration");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    let manager = Data::new(PgSqlxManager::new(pool));
    let jwt = Data::new(JWT::new(config.jwt_secret.as_bytes().to_owned()));
    let addr = (config.bind_addr.clone(), config.port);
    log::info!("listening on {}:{}", addr.0, addr.1);
    let config = Data::new(config);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(manager.clone())
            .app_data(jwt.clone())
            .app_data(config.clone())
            .configure(handlers::routes(config.jwt_secret.as_bytes().to_owned()))
    })
    .bind(addr)?
    .run()
    .await
}
