use async_trait::async_trait;
use bytes::Bytes;
use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use futures::stream;
use routeflow::prelude::*;
use tokio::runtime::Runtime;

/// Deterministic routes document with a mix of codeshares and null markers
fn synth_doc(rows: usize) -> String {
    let mut doc = String::new();
    for index in 0..rows {
        let codeshare = if index % 7 == 0 { "Y" } else { "" };
        let airport_id = if index % 11 == 0 {
            "\\N".to_string()
        } else {
            (index % 4000).to_string()
        };
        doc.push_str(&format!(
            "A{},{},JFK,{},LAX,{},{},0,73{}\n",
            index % 500,
            index % 9000,
            airport_id,
            (index + 1) % 4000,
            codeshare,
            index % 10,
        ));
    }
    doc
}

/// Benchmark row reassembly across different chunk sizes
fn bench_reassembly_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("reassembly_chunk_sizes");
    let doc = synth_doc(10_000);
    group.throughput(Throughput::Bytes(doc.len() as u64));

    for chunk_size in [64usize, 1_024, 16_384] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut assembler = RowAssembler::new();
                    let mut rows = 0usize;
                    for chunk in doc.as_bytes().chunks(chunk_size) {
                        rows += assembler.process(black_box(chunk)).unwrap().len();
                    }
                    if assembler.flush().unwrap().is_some() {
                        rows += 1;
                    }
                    black_box(rows);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark lenient decoding over pre-assembled rows
fn bench_decode_routes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_routes");
    let doc = synth_doc(10_000);

    let mut assembler = RowAssembler::new();
    let rows = assembler.process(doc.as_bytes()).unwrap();
    group.throughput(Throughput::Elements(rows.len() as u64));

    group.bench_function("decode_10k", |b| {
        b.iter(|| {
            for row in &rows {
                black_box(decode_route(black_box(row)));
            }
        });
    });

    group.finish();
}

/// Benchmark batch accumulation at the default capacity
fn bench_batch_accumulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_accumulation");
    let doc = synth_doc(10_000);

    let mut assembler = RowAssembler::new();
    let records: Vec<Route> = assembler
        .process(doc.as_bytes())
        .unwrap()
        .iter()
        .map(decode_route)
        .collect();
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("accumulate_10k", |b| {
        b.iter_batched(
            || records.clone(),
            |records| {
                let mut accumulator = BatchAccumulator::new(500);
                let mut batches = 0usize;
                for record in records {
                    if accumulator.add(record).is_some() {
                        batches += 1;
                    }
                }
                if accumulator.drain().is_some() {
                    batches += 1;
                }
                black_box(batches);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Transport that acknowledges instantly, isolating pipeline overhead
struct AckTransport;

#[async_trait]
impl SignedTransport for AckTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        let pairs = request.body.iter().filter(|&&byte| byte == b'\n').count() / 2;
        let items: Vec<String> = (0..pairs)
            .map(|_| r#"{"index":{"status":201}}"#.to_string())
            .collect();
        let body = format!(r#"{{"errors":false,"items":[{}]}}"#, items.join(","));
        Ok(WireResponse::new(200, Bytes::from(body.into_bytes())))
    }
}

/// Benchmark the full pipeline against an instant-acknowledge transport
fn bench_pipeline_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_end_to_end");
    let runtime = Runtime::new().unwrap();

    for (size_name, rows) in [("rows_1k", 1_000usize), ("rows_10k", 10_000)] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &rows, |b, &rows| {
            b.to_async(&runtime).iter_batched(
                || synth_doc(rows),
                |doc| async move {
                    let sink = BulkSink::new(AckTransport, SinkConfig::default());
                    let pipeline = RoutePipeline::new(
                        PipelineConfig {
                            max_batch: 500,
                            concurrency: 4,
                        },
                        sink,
                    );
                    let input =
                        stream::iter(vec![Ok::<_, SourceError>(Bytes::from(doc.into_bytes()))]);
                    black_box(pipeline.run(input).await.unwrap());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_reassembly_chunk_sizes,
    bench_decode_routes,
    bench_batch_accumulation,
    bench_pipeline_end_to_end
);
criterion_main!(benches);
