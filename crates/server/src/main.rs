#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bystander_server::start().await
}
