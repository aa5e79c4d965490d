//! rain-cli - chart the current water year's rainfall against every year on record.

use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(
    name = "rain-cli",
    version,
    about = "Cumulative rainfall by water year for Castro Valley, CA"
)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let _cli = Cli::parse();
    rain_cmd::run().await?;
    info!("Done");
    Ok(())
}
