use log::{error, info, warn};
use std::{
    net::TcpListener,
    process::{exit, id as process_id, Command},
    sync::Arc,
};
use stripe_embedded_checkout::{
    config::load_env_file,
    cors::load_cors_policy,
    logger::{program_name, setup_logger},
    server, CheckoutGateway, GatewayConfig, StripeClient, VERSION,
};

/// Best effort: name whoever holds the port, if `lsof` is around.
fn report_port_owner(port: u16) {
    let lsof_available = Command::new("sh")
        .arg("-c")
        .arg("which lsof")
        .output()
        .map(|output| !output.stdout.is_empty())
        .unwrap_or(false);
    if !lsof_available {
        info!("`lsof` is not available. Please install `lsof` for more detailed diagnostics.");
        return;
    }

    let output = Command::new("sh")
        .arg("-c")
        .arg(format!("lsof -i :{} -t -sTCP:LISTEN", port))
        .output();
    match output {
        Ok(output) if !output.stdout.is_empty() => {
            let pid = String::from_utf8_lossy(&output.stdout).trim().to_string();
            info!("PID using port {}: {}", port, pid);
            let cmd = format!("ps -o user= -o comm= -p {}", pid);
            if let Ok(output) = Command::new("sh").arg("-c").arg(cmd).output() {
                info!(
                    "Process details: {}",
                    String::from_utf8_lossy(&output.stdout)
                );
            }
        }
        _ => error!("Could not determine the process using port {}", port),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    setup_logger();
    info!("{} {} PID: {}", program_name(), VERSION, process_id());

    load_env_file();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            exit(1);
        }
    };
    if !config.has_secret_key() {
        warn!("STRIPE_SECRET_KEY is not set. API calls will fail until it is provided.");
    }
    info!("Configuration: {:?}", config);

    let cors = match load_cors_policy(&config.cors_origins_file) {
        Ok(cors) => cors,
        Err(e) => {
            error!("Failed to load or validate all CORS origins: {}", e);
            exit(1);
        }
    };

    let listener = match TcpListener::bind(config.bind_address()) {
        Ok(listener) => listener,
        Err(e) if server::port_in_use(&e) => {
            error!("Port {} is already in use: {}", config.port, e);
            report_port_owner(config.port);
            exit(52);
        }
        Err(e) => {
            error!("Cannot listen on {}: {}", config.bind_address(), e);
            exit(1);
        }
    };

    let provider = match StripeClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build Stripe client: {}", e);
            exit(1);
        }
    };
    let gateway = CheckoutGateway::new(Arc::new(config), Arc::new(provider));

    let execution = server::run(gateway, cors, listener).await;
    info!("Worker stopped with PID: {}", process_id());

    if let Err(e) = execution {
        error!("Failed to start the server: {:?}", e);
        return Err(e);
    }
    Ok(())
}
