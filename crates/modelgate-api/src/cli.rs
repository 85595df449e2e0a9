use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "modelgate")]
#[command(author, version, about = "Serve machine learning model plugins over HTTP", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "modelgate.yaml", env = "MODELGATE_CONFIG")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Model plugin to enable (repeatable, default: all installed plugins)
    #[arg(short, long = "model")]
    pub models: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
