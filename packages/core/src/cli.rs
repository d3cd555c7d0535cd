use clap::Parser;

/// Q&A service CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "qa-service",
    version,
    about = "CRUD API for questions and their answers"
)]
pub struct Cli {
    /// Database URL (overrides DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,
}
