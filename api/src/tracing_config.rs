use opentelemetry::sdk::{trace::Tracer, Resource};
use opentelemetry_otlp::WithExportConfig;
use tonic::metadata::MetadataMap;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

const HONEYCOMB_ENDPOINT: &str = "api.honeycomb.io:443";

/// Span export to Honeycomb. `dataset` becomes the service name.
pub struct HoneycombConfig {
    pub team: String,
    pub dataset: String,
}

impl HoneycombConfig {
    fn metadata(&self) -> Result<MetadataMap, anyhow::Error> {
        let mut metadata = MetadataMap::new();
        metadata.insert("x-honeycomb-team", self.team.parse()?);
        Ok(metadata)
    }

    fn tracer(self) -> Result<Tracer, anyhow::Error> {
        let exporter = opentelemetry_otlp::new_exporter()
            .tonic()
            .with_endpoint(HONEYCOMB_ENDPOINT)
            .with_metadata(self.metadata()?);

        let resource = Resource::new(vec![opentelemetry::KeyValue::new(
            "service.name",
            self.dataset,
        )]);

        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_trace_config(opentelemetry::sdk::trace::config().with_resource(resource))
            .with_exporter(exporter)
            .install_batch(opentelemetry::runtime::TokioCurrentThread)?;
        Ok(tracer)
    }
}

/// Install the global subscriber: bunyan JSON to `console_sink`, filtered by
/// the `LOG` env var, plus Honeycomb export when configured.
pub fn configure<W>(
    name: impl Into<String>,
    console_sink: W,
    honeycomb_config: Option<HoneycombConfig>,
) -> Result<(), anyhow::Error>
where
    W: for<'a> MakeWriter<'a> + 'static + Send + Sync,
{
    LogTracer::builder()
        .ignore_crate("rustls")
        .with_max_level(log::LevelFilter::Debug)
        .init()?;

    let env_filter = EnvFilter::try_from_env("LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let telemetry = honeycomb_config
        .map(HoneycombConfig::tracer)
        .transpose()?
        .map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name.into(), console_sink))
        .with(telemetry);
    set_global_default(subscriber)?;

    Ok(())
}

pub fn teardown() {
    opentelemetry::global::shutdown_tracer_provider();
}
