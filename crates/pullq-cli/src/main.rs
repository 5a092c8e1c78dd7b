//! `pullq` entrypoint.

#[tokio::main]
async fn main() {
    let code = pullq_cli::run().await;
    std::process::exit(code);
}
