use tracing_subscriber::{fmt::time, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pipeline progress at info; the storage and warehouse clients only report
/// warnings unless `RUST_LOG` says otherwise.
const DEFAULT_FILTER: &str = "apts_ranking_etl=info,object_store=warn,gcp_bigquery_client=warn";

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Logs go to stderr with time since start, so stdout only carries the
/// final job line.
pub fn init_cli_logger() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(filter_from(directives.as_deref()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(time::uptime())
                .with_target(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_when_unset_or_blank() {
        assert_eq!(filter_from(None).to_string(), filter_from(Some("  ")).to_string());
        assert!(filter_from(None).to_string().contains("apts_ranking_etl=info"));
    }

    #[test]
    fn test_env_directives_override_default() {
        let filter = filter_from(Some("apts_ranking_etl=debug"));
        assert_eq!(filter.to_string(), "apts_ranking_etl=debug");
    }

    #[test]
    fn test_invalid_directives_fall_back_to_default() {
        let filter = filter_from(Some("apts_ranking_etl=loud"));
        assert!(filter.to_string().contains("gcp_bigquery_client=warn"));
    }
}
