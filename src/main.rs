#[tokio::main]
async fn main() -> anyhow::Result<()> {
    inventory::app::run().await
}
