use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ili_align_viz::{
    Category, FeatureType, MatchedFeature, RenderOptions, RunPair, SamplingConfig, build_figure,
    render_html, sample_features,
};

fn synthetic_table(rows: usize) -> Vec<MatchedFeature> {
    let categories = ["matched", "uncertain", "new", "disappeared"];
    let types = ["Anomaly", "Bend", "Valve", "Tee", "Girth Weld"];

    (0..rows)
        .map(|i| {
            let src = 12.5 * i as f64;
            MatchedFeature::new(src, src + 3.0, Category::from_label(categories[i % 4]))
                .with_type(FeatureType::from_label(types[i % 5]))
                .with_confidence((i % 100) as f64 / 100.0)
        })
        .collect()
}

fn bench_sampling(c: &mut Criterion) {
    let table = synthetic_table(50_000);
    let config = SamplingConfig::default();

    c.bench_function("sample_50k_rows", |b| {
        b.iter(|| sample_features(black_box(&table), &config))
    });
}

fn bench_render(c: &mut Criterion) {
    let table = synthetic_table(50_000);
    let options = RenderOptions::default();

    c.bench_function("build_and_render_html", |b| {
        b.iter(|| {
            let (figure, _) =
                build_figure(black_box(&table), RunPair::Run2007To2015, &options).unwrap();
            render_html(&figure, &options.export).unwrap()
        })
    });
}

criterion_group!(benches, bench_sampling, bench_render);
criterion_main!(benches);
