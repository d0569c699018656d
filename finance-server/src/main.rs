#[macro_use]
extern crate tracing;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::{http, App, HttpServer};
use anyhow::{bail, Context};
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, pkcs8_private_keys};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use finance_lib::auth::jwt::JWTAuth;
use finance_lib::config::{Config, SSLConfig};
use finance_lib::path::LowercasePath;

const SERVICE_NAME: &str = "finance-server";

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    let tracing_guard = tracing::subscriber::set_default(subscriber);
    info!("tracing initialized");

    let config = match get_config_file() {
        Some(config_path) => {
            info!(path = %config_path.display(), "loading config file");
            Config::from_file(config_path)?
        }
        None => {
            info!("no config file found, reading config from environment");
            Config::from_env()?
        }
    };

    let telemetry_layer = match &config.telemetry {
        Some(telemetry) => Some(finance_lib::tracing::create_opentelemetry_layer(
            SERVICE_NAME,
            telemetry,
        )?),
        None => None,
    };
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default())
        .with(telemetry_layer);
    tracing::subscriber::set_global_default(subscriber).context("Unable to set up tracing")?;
    drop(tracing_guard);

    let (user_repo, transaction_repo) =
        finance_repo::sqlx_repo::create_repos(&config.database_url, config.max_pool_size).await?;

    let jwt_auth = JWTAuth::from_config(&config.jwt);
    let app_config = finance_lib::app_config_func(
        jwt_auth,
        user_repo,
        transaction_repo,
        config.signups_enabled,
    );
    if !config.signups_enabled {
        info!("signups disabled");
    }

    let cors_allowed_origin = config.cors_allowed_origin.clone();
    let server = HttpServer::new(move || {
        let cors = match &cors_allowed_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                .allowed_headers(vec![http::header::AUTHORIZATION, http::header::CONTENT_TYPE]),
            None => Cors::default(),
        };
        App::new()
            .wrap(finance_lib::tracing::create_middleware())
            .wrap(LowercasePath)
            .wrap(Condition::new(cors_allowed_origin.is_some(), cors))
            .configure(app_config.clone())
    });

    let server = match config.ssl {
        None => {
            warn!("Using http");
            server.bind(&config.bind_address)?
        }
        Some(ssl_config) => {
            info!("Using https");
            server.bind_rustls(&config.bind_address, load_rustls_config(ssl_config)?)?
        }
    };
    info!(address = %config.bind_address, "listening");
    server.run().await?;

    Ok(())
}

fn load_rustls_config(ssl_config: SSLConfig) -> Result<ServerConfig, anyhow::Error> {
    let config = ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth();

    let mut cert_file = BufReader::new(
        File::open(ssl_config.certificate_chain_file)
            .context("Error opening certificate chain file")?,
    );
    let mut key_file = BufReader::new(
        File::open(ssl_config.private_key_file).context("Error opening private key file")?,
    );

    let cert_chain = certs(&mut cert_file)
        .context("Unable to read certificate chain file")?
        .into_iter()
        .map(Certificate)
        .collect();
    let mut keys: Vec<PrivateKey> = pkcs8_private_keys(&mut key_file)
        .context("Unable to read private key file")?
        .into_iter()
        .map(PrivateKey)
        .collect();

    if keys.is_empty() {
        bail!("No private key found in file");
    }

    config
        .with_single_cert(cert_chain, keys.remove(0))
        .context("Invalid certificate or key")
}

/// `config.toml` in the working directory, then in `$CONFIGURATION_DIRECTORY`.
fn get_config_file() -> Option<PathBuf> {
    let config_current_dir = PathBuf::from("config.toml");
    if config_current_dir.exists() {
        return Some(config_current_dir);
    }
    if let Ok(config_env) = std::env::var("CONFIGURATION_DIRECTORY") {
        let config_path = PathBuf::from(config_env).join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }
    None
}
