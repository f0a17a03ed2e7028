use anyhow::Result;
use clap::Parser;
use nimbus_api::{API, NimbusApi, ServiceName};
use nimbus_main::{Cli, TopLevelCommand, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let api = NimbusApi::init(cli.config)?;

    match cli.subcommands {
        TopLevelCommand::Client { services } => {
            for service in services {
                let client = api.get_client(ServiceName::from(service)).await?;
                let region = client
                    .region()
                    .map(|region| region.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}\t{}\t{}", client.service(), client.source(), region);
            }
        }
    }

    Ok(())
}
