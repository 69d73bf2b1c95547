use clap::Parser;
use credential_gateway::config::GatewayConfig;
use std::process;

#[derive(Parser)]
struct GatewayArgs {
    /// Override bind address
    #[arg(long)]
    bind: Option<String>,
    /// Override credentials backend (memory, valkey)
    #[arg(long)]
    backend: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = real_main().await {
        eprintln!("gateway exited with error: {err:#}");
        process::exit(1);
    }
}

async fn real_main() -> anyhow::Result<()> {
    credential_gateway::telemetry::init()?;

    let args = GatewayArgs::parse();
    let mut config = GatewayConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind = bind
            .parse()
            .map_err(|err| anyhow::anyhow!("--bind is not a valid socket address: {err}"))?;
    }
    if let Some(backend) = args.backend {
        config.store.kind = backend;
    }

    credential_gateway::run(config).await
}
