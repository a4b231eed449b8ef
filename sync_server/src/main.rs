#[tokio::main]
async fn main() -> std::io::Result<()> {
    sync_server::run_with_config().await
}
