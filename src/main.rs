use apts_ranking_etl::utils::logger;
use apts_ranking_etl::{
    build_ranking_graph, BigQueryWarehouse, CliConfig, DirectRunner, EtlEngine, EtlError,
    GcsStorage, PipelineOptions,
};
use clap::Parser;
use gcp_bigquery_client::client_builder::ClientBuilder;

fn fail(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Pipeline failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    // Exits with a usage message when a required flag is missing.
    let config = CliConfig::parse();

    logger::init_cli_logger();
    tracing::debug!("CLI config: {:?}", config);

    let options = match PipelineOptions::resolve(config) {
        Ok(options) => options,
        Err(e) => fail(&e),
    };

    let graph = build_ranking_graph(&options.project);

    let storage = match GcsStorage::for_url(&graph.source.path) {
        Ok(storage) => storage,
        Err(e) => fail(&e),
    };
    let staging = match GcsStorage::for_url(&options.temp_location) {
        Ok(staging) => staging,
        Err(e) => fail(&e),
    };

    // Application default credentials: GOOGLE_APPLICATION_CREDENTIALS,
    // gcloud user credentials, or the metadata server.
    let client = match ClientBuilder::new()
        .build_from_application_default_credentials()
        .await
    {
        Ok(client) => client,
        Err(e) => fail(&EtlError::from(e)),
    };
    let warehouse = BigQueryWarehouse::new(client, staging, &options);

    let engine = EtlEngine::new(DirectRunner::new(storage, warehouse));

    match engine.run(&graph, &options).await {
        Ok(result) => {
            tracing::info!("✅ Job {} completed successfully", result.job_name);
            println!("✅ Job {} completed successfully", result.job_name);
        }
        Err(e) => fail(&e),
    }
}
