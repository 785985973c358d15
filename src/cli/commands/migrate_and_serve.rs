use anyhow::Result;
use tracing::{info, trace};

use super::initdb::migrate;
use super::serve::serve;
use crate::config::Settings;

pub async fn migrate_and_serve(settings: Settings) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    let db = migrate(&settings.database.url).await?;
    // The server opens its own pool.
    db.close().await?;

    serve(settings).await
}
