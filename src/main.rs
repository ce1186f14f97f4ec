use anyhow::Result;
use tracing::info;

use fitscore::logging::configure_logging;
use fitscore::vector::init_embeddings;
use fitscore::web;

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    // The embedding model is required infrastructure: refuse to serve
    // without it rather than fail per request.
    init_embeddings().await?;
    info!("Embedding model ready, starting web server");

    web::serve().await
}
