#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mf3270::cli::run().await
}
