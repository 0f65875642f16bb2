#[tokio::main]
async fn main() -> anyhow::Result<()> {
    appointment_notifier::start_web_server().await
}
