#[tokio::main]
async fn main() {
    roombook_backend::run().await;
}
