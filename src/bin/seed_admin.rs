use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use jobdesk::accounts::{self, RegistrationRequest};
use jobdesk::auth::jwt::JwtService;
use jobdesk::auth::Role;
use jobdesk::config::AppConfig;
use jobdesk::db;
use jobdesk::state::AppState;
use jobdesk::store::PgStore;

const USAGE: &str = "Usage: seed_admin <name> <email> <contact> <company>\n\
                     The password is read from SEED_ADMIN_PASSWORD.";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let [name, email, contact, company] = match <[String; 4]>::try_from(args) {
        Ok(values) => values,
        Err(_) => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };
    let password = env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD must be set")?;

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "seed_admin",
        database_url = %config.redacted_database_url(),
        "loaded configuration"
    );
    let pool = db::init_pool_with_size(&config.database_url, 1)?;
    let migration_pool = pool.clone();
    tokio::task::spawn_blocking(move || db::run_migrations(&migration_pool))
        .await
        .context("migration task panicked")??;

    let jwt = JwtService::from_config(&config);
    let state = AppState::new(config, Arc::new(PgStore::new(pool)), jwt);

    let request = RegistrationRequest {
        name: Some(name),
        email: Some(email),
        contact: Some(contact),
        company: Some(company),
        password: Some(password),
    };
    let admin = accounts::register(&state, Role::Admin, request)
        .await
        .map_err(|err| anyhow!("failed to create admin ({}): {}", err.status(), err.message()))?;

    println!("Created admin {} <{}>", admin.id, admin.email);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
