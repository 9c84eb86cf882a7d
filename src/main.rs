use futures::StreamExt;
use routeflow::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routeflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "routeflow starting");

    CliApp::new("routeflow").run(run_routeflow).await
}

enum Command {
    /// Stream the source into the remote bulk-write endpoint.
    Ingest { source: String },
    /// Decode the source to newline-delimited JSON on disk instead.
    Dump { source: String, output: String },
}

/// Parse and validate command-line arguments
fn parse_command(args: &[String]) -> Result<Command, AppError> {
    match args {
        [] => Ok(Command::Ingest {
            source: ROUTES_URL.to_string(),
        }),
        [source] if source != "--dump" => Ok(Command::Ingest {
            source: source.clone(),
        }),
        [flag, source, output] if flag == "--dump" => Ok(Command::Dump {
            source: source.clone(),
            output: output.clone(),
        }),
        _ => Err(AppError::InvalidArguments(
            "Usage: routeflow [SOURCE] | routeflow --dump <SOURCE> <OUTPUT>".to_string(),
        )),
    }
}

/// Main application logic - streams the dataset into the configured sink
async fn run_routeflow() -> Result<(), AppError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_command(&args)? {
        Command::Ingest { source } => ingest(&source).await,
        Command::Dump { source, output } => dump(&source, &output).await,
    }
}

async fn ingest(source: &str) -> Result<(), AppError> {
    let endpoint = bulk_endpoint_from_env()?;
    let pipeline_config = PipelineConfig::from_env();
    let sink_config = SinkConfig::from_env();

    let chunks = open_source(source).await?;
    let transport = HttpTransport::new(endpoint)?;
    let sink = BulkSink::new(transport, sink_config);

    let report = RoutePipeline::new(pipeline_config, sink).run(chunks).await?;

    if report.fully_indexed() {
        info!(
            records = report.records,
            batches = report.batches,
            indexed = report.sink.successful,
            "ingest complete"
        );
    } else {
        warn!(
            records = report.records,
            batches = report.batches,
            indexed = report.sink.successful,
            item_failures = report.sink.failed,
            rejected_requests = report.sink.rejected_requests,
            transport_failures = report.sink.transport_failures,
            "ingest complete with failures"
        );
    }
    Ok(())
}

async fn dump(source: &str, output: &str) -> Result<(), AppError> {
    let chunks = open_source(source).await?;
    let stamper = Stamper::new();
    let records = RowStream::new(chunks)
        .map(move |result| result.map(|row| stamper.stamp(decode_route(&row))));

    let file = tokio::fs::File::create(output).await?;
    let mut writer = tokio::io::BufWriter::new(file);
    let written = write_ndjson(records, &mut writer).await?;

    info!(written, output, "dump complete");
    Ok(())
}

/// Pick the byte source from the argument shape: URLs download, anything
/// else is opened as a local file.
async fn open_source(source: &str) -> Result<ChunkStream, AppError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(download(source).await?)
    } else {
        Ok(Box::pin(FileChunkStream::open(source).await?))
    }
}
