use crate::{
    cors::CorsPolicy,
    error::GatewayError,
    gateway::{CheckoutGateway, RequestOrigin},
};
use actix_files::Files;
use actix_web::{
    middleware::Logger as ActixLogger, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use log::{error, info, warn};
use serde::Deserialize;
use std::{io, net::TcpListener, path::Path};

pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

async fn get_config(gateway: web::Data<CheckoutGateway>) -> Result<HttpResponse, GatewayError> {
    let config = gateway.public_config()?;
    Ok(HttpResponse::Ok().json(config))
}

async fn post_create_checkout_session(
    req: HttpRequest,
    gateway: web::Data<CheckoutGateway>,
) -> Result<HttpResponse, GatewayError> {
    let origin = {
        let info = req.connection_info();
        RequestOrigin::new(info.scheme(), info.host())
    };
    let created = gateway.create_checkout_session(&origin).await?;
    Ok(HttpResponse::Ok().json(created))
}

#[derive(Debug, Deserialize)]
pub struct SessionStatusQuery {
    pub session_id: Option<String>,
}

async fn get_session_status(
    query: web::Query<SessionStatusQuery>,
    gateway: web::Data<CheckoutGateway>,
) -> Result<HttpResponse, GatewayError> {
    let reply = gateway.session_status(query.session_id.as_deref()).await?;
    Ok(HttpResponse::Ok().json(reply))
}

/// API routes. Mount static files after these so they don't shadow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/config", web::get().to(get_config))
        .route(
            "/create-checkout-session",
            web::post().to(post_create_checkout_session),
        )
        .service(
            web::resource("/session-status")
                .app_data(session_status_query_config())
                .route(web::get().to(get_session_status)),
        );
}

/// A query that doesn't parse (e.g. `session_id` given twice) is the
/// caller's mistake, so it answers like a missing id.
fn session_status_query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let gateway_err = GatewayError::Validation("session_id");
        error!("Session status error: {} ({})", gateway_err, err);
        gateway_err.into()
    })
}

/// Only a taken port is worth hunting down its owner for.
pub fn port_in_use(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::AddrInUse
}

pub fn static_files(dir: &Path) -> Files {
    Files::new("/", dir).index_file("index.html")
}

/// Serves the gateway on an already-bound listener until shutdown.
pub async fn run(
    gateway: CheckoutGateway,
    cors: CorsPolicy,
    listener: TcpListener,
) -> io::Result<()> {
    let static_dir = gateway.config().static_dir.clone();
    let serve_static = static_dir.is_dir();
    if !serve_static {
        warn!(
            "Static directory {} not found, serving API only",
            static_dir.display()
        );
    }
    let data = web::Data::new(gateway);
    let address = listener.local_addr()?;

    let server = HttpServer::new(move || {
        let app = App::new()
            .wrap(ActixLogger::default())
            .wrap(cors.to_cors())
            .app_data(data.clone())
            .configure(configure);
        if serve_static {
            app.service(static_files(&static_dir))
        } else {
            app
        }
    })
    .listen(listener)?
    .run();

    info!("Server running on http://{}", address);
    server.await
}
