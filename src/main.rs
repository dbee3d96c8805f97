#[tokio::main]
async fn main() {
    if let Err(err) = fakturoid_mcp::mcp::server::run_stdio().await {
        eprintln!("fakturoid-mcp: {}", err);
        std::process::exit(1);
    }
}
