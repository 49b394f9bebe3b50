use criterion::{criterion_group, criterion_main, Criterion};
use hanzi_grader::api::load_request;
use hanzi_grader::protocol::GradeRequest;
use hanzi_grader::Grader;
use std::hint::black_box;
use std::path::PathBuf;

fn data(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(rel)
}

fn sample(name: &str) -> GradeRequest {
    load_request(
        data(&format!("samples/{}.json", name)),
        data(&format!("samples/{}_standard.jsonl", name)),
        data(&format!("samples/{}_evaluate.jsonl", name)),
    )
    .expect("Failed to load sample")
}

fn criterion_benchmark(c: &mut Criterion) {
    let grader = Grader::load_from_file(data("rules/default.json")).expect("Failed to load rules");
    let shi = sample("shi");
    let chuan = sample("chuan");

    c.bench_function("grade 十 (stroke level)", |b| {
        b.iter(|| grader.grade(black_box(&shi)))
    });
    c.bench_function("grade 川 (component level)", |b| {
        b.iter(|| grader.grade(black_box(&chuan)))
    });
    c.bench_function("holistic 川", |b| {
        b.iter(|| grader.holistic(black_box(&chuan)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
