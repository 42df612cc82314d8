use registrator::runtime::{boot, serve};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let state = boot::boot().await?;
    serve::serve(state).await
}
