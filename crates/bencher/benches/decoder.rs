use std::hint::black_box;

use bencher::{BenchCase, BodyFixture};
use bytes::BytesMut;
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use micro_cgi_message::codec::Limits;
use micro_cgi_message::codec::body::{BodyDecoder, MultipartDecoder};
use tokio_util::codec::Decoder;

const FORM: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data; boundary=BenchBoundary";

static FORM_SMALL: BodyFixture = BodyFixture::new("form_small.txt", FORM, include_bytes!("../resources/body/form_small.txt"));
static FORM_LARGE: BodyFixture = BodyFixture::new("form_large.txt", FORM, include_bytes!("../resources/body/form_large.txt"));
static MULTIPART_SMALL: BodyFixture =
    BodyFixture::new("multipart_small.txt", MULTIPART, include_bytes!("../resources/body/multipart_small.txt"));
static MULTIPART_LARGE: BodyFixture =
    BodyFixture::new("multipart_large.txt", MULTIPART, include_bytes!("../resources/body/multipart_large.txt"));

fn create_bench_cases() -> Vec<BenchCase> {
    vec![
        BenchCase::small("small_form", FORM_SMALL),
        BenchCase::large("large_form", FORM_LARGE),
        BenchCase::small("small_multipart", MULTIPART_SMALL),
        BenchCase::large("large_multipart", MULTIPART_LARGE),
    ]
}

fn benchmark_body_decoder(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("body_decoder");

    for case in create_bench_cases() {
        group.throughput(Throughput::Bytes(case.fixture().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            let decoder = BodyDecoder::new(case.fixture().content_type(), Limits::default());
            b.iter(|| black_box(decoder.decode(black_box(case.fixture().content()))));
        });
    }

    group.finish();
}

// feeds the body in fixed chunks, the way it arrives on stdin
fn benchmark_multipart_chunks(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("multipart_chunks");
    let content = MULTIPART_LARGE.content();

    for chunk_size in [512, 8 * 1024] {
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &chunk_size, |b, &chunk_size| {
            b.iter_batched_ref(
                || MultipartDecoder::new("BenchBoundary", &Limits::default()),
                |decoder| {
                    let mut buffer = BytesMut::with_capacity(chunk_size * 2);
                    for chunk in content.chunks(chunk_size) {
                        buffer.extend_from_slice(chunk);
                        while let Some(part) = decoder.decode(&mut buffer).expect("fixture should be valid multipart") {
                            black_box(part);
                        }
                    }
                    while let Some(part) = decoder.decode_eof(&mut buffer).expect("fixture should be valid multipart") {
                        black_box(part);
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(decoder, benchmark_body_decoder, benchmark_multipart_chunks);
criterion_main!(decoder);
