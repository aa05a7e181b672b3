use anyhow::Result;
use clap::Parser;
use dashboard_composer::observability::metrics::get_metrics;
use dashboard_composer::providers::{
    CirclesInformationProvider, CompanyInformationProvider, EmployeeAddressesProvider, EmployeeCoordinatesProvider,
};
use dashboard_composer::utils::config_loader;
use dashboard_composer::utils::logging::{self, LogLevel};
use dashboard_composer::Registry;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "dashboard-composer.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Resolve the selected providers once and print their data as JSON
    #[arg(long)]
    resolve: bool,
    /// Print the Prometheus metrics collected during the run
    #[arg(long)]
    print_metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let config = config_loader::run(&args.config).await?;
    logging::run(&config.settings, args.log_level)?;

    // -------------------------------
    // 2. Compose providers and the persons client factory
    // -------------------------------

    let registry = Registry::compose(&config).await?;
    info!(
        addresses = registry.addresses().name(),
        coordinates = registry.coordinates().name(),
        "composition finished"
    );

    // -------------------------------
    // 3. Optionally resolve everything once
    // -------------------------------

    if args.resolve {
        let cancel = CancellationToken::new();
        let ctrl_c = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupted, cancelling");
                    cancel.cancel();
                }
            })
        };

        let addresses = registry.addresses().employee_addresses(&cancel).await?;
        let coordinates = registry.coordinates().employee_coordinates(&cancel).await?;
        // company and circles are optional sections
        let (company, circles) = if registry.company().is_configured() {
            (
                Some(registry.company().company_information(&cancel).await?),
                Some(registry.circles().circles_information(&cancel).await?),
            )
        } else {
            warn!("no Company section, circles are skipped");
            (None, None)
        };
        ctrl_c.abort();

        let output = json!({
            "providers": {
                "addresses": registry.addresses().name(),
                "coordinates": registry.coordinates().name(),
            },
            "addresses": addresses,
            "coordinates": coordinates,
            "company": company,
            "circles": circles,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    // -------------------------------
    // 4. Metrics
    // -------------------------------

    if args.print_metrics {
        print!("{}", get_metrics().await.encode_text()?);
    }

    Ok(())
}
