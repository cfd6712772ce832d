use anyhow::Result;
use clap::Parser;
use nettop_notch::{cli::Args, run};

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::Builder::from_default_env().init();
    }

    let args = Args::parse();
    run(args)
}
