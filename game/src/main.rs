#[tokio::main]
async fn main() -> std::io::Result<()> {
    game::run_with_config().await
}
