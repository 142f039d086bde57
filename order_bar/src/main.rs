use clap::Parser;
use dotenvy::dotenv;
use log::*;
use order_bar::{cli::Arguments, config::BarConfig, runner::run};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let config = match BarConfig::try_from(Arguments::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    };

    info!("🚀️ Counting today's orders for {}", config.domain);
    match run(config).await {
        Ok(()) => println!("Bye!"),
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
