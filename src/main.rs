#[tokio::main]
async fn main() {
    agency_backend::run().await;
}
