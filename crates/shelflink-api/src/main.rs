use anyhow::Context;
use shelflink_api::config::Config;
use shelflink_api::routes;
use shelflink_api::state::AppState;
use shelflink_core::logging::{self, Profile};
use shelflink_store::{catalog, db, schema};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(Profile::from_env());

    let config = Config::from_env().context("invalid configuration")?;
    let conn = db::open(&config.db_path).context("could not open database")?;
    schema::ensure_schema(&conn).context("could not apply schema")?;
    let registry = catalog::bookstore_registry().context("could not build relation registry")?;

    let state = AppState::new(conn, registry);
    let app = routes::router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .context("could not bind listen address")?;
    tracing::info!(
        addr = %config.bind_addr,
        db = %config.db_path.display(),
        "shelflink api listening"
    );
    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
