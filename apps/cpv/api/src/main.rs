//! CPV Search HTTP Service - Entry Point
//!
//! One event loop handles requests; model inference runs on the encode pool.

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    cpv_api::run().await
}
