#[tokio::main]
async fn main() -> anyhow::Result<()> {
    freqphrase_backend::run().await
}
