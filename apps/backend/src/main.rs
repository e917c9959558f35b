#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashcard_study_backend::run().await
}
