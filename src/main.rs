use azure_ipam::config::Config;
use azure_ipam::get_report;
use azure_ipam::output::{print_report_summary, report_prefix, write_csv_reports, write_json_report};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let config = Config::from_env(std::env::args().nth(1))?;
    log::info!(
        "Parent ranges: {}",
        config
            .parents
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    );

    let report = get_report(&config).await?;
    print_report_summary(&report);

    let prefix = report_prefix(config.timezone);
    let mut files = write_csv_reports(&report, &config.output_dir, &prefix)?;
    files.push(write_json_report(&report, &config.output_dir, &prefix)?);
    log::info!("#End main() wrote {} report files", files.len());

    Ok(())
}
