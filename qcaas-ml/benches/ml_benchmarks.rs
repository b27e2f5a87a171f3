use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qcaas_ml::algorithms::SvmClassifier;
use qcaas_ml::preprocess::{Pca, StandardScaler};
use qcaas_ml::quantum::{RealAmplitudes, Sampler, ZzFeatureMap};
use qcaas_ml::training::{score, stratified_split};
use qcaas_ml::{FeatureMatrix, SvmConfig};

fn synthetic(rows: usize, cols: usize) -> (FeatureMatrix, Vec<usize>) {
    let x = FeatureMatrix::from_fn(rows, cols, |r, c| {
        let class = (r % 3) as f64;
        class * 1.5 + ((r * 31 + c * 17) % 23) as f64 / 23.0
    });
    let y = (0..rows).map(|r| r % 3).collect();
    (x, y)
}

fn bench_preprocessing(c: &mut Criterion) {
    let (x, _) = synthetic(500, 8);

    c.bench_function("standard_scaler_500x8", |b| {
        b.iter(|| StandardScaler::fit_transform(black_box(&x)))
    });

    c.bench_function("pca_500x8_to_2", |b| {
        b.iter(|| Pca::fit_transform(black_box(&x), 2))
    });
}

fn bench_svm(c: &mut Criterion) {
    let (x, y) = synthetic(150, 4);
    let svm = SvmClassifier::new(SvmConfig::default());

    c.bench_function("svm_fit_150x4_3class", |b| {
        b.iter(|| svm.fit(black_box(&x), black_box(&y)))
    });

    let Ok(model) = svm.fit(&x, &y) else {
        return;
    };
    c.bench_function("svm_predict_150x4", |b| b.iter(|| model.predict(black_box(&x))));
}

fn bench_statevector(c: &mut Criterion) {
    let Ok(feature_map) = ZzFeatureMap::new(4, 2) else {
        return;
    };
    let Ok(ansatz) = RealAmplitudes::new(4, 2) else {
        return;
    };
    let theta = vec![0.3; ansatz.num_parameters()];

    c.bench_function("zz_feature_map_plus_ansatz_4q", |b| {
        b.iter(|| {
            let mut state = feature_map.circuit(black_box(&[0.1, 0.2, 0.3, 0.4]))?.run()?;
            ansatz.circuit(&theta)?.apply(&mut state)?;
            Ok::<_, qcaas_ml::QuantumError>(state)
        })
    });

    let Ok(state) = feature_map.circuit(&[0.1, 0.2, 0.3, 0.4]).and_then(|c| c.run()) else {
        return;
    };
    c.bench_function("sampler_1024_shots_4q", |b| {
        let mut sampler = Sampler::new(1024, 42);
        b.iter(|| sampler.sample(black_box(&state)))
    });
}

fn bench_metrics_and_split(c: &mut Criterion) {
    let y_true: Vec<usize> = (0..1000).map(|i| i % 4).collect();
    let y_pred: Vec<usize> = (0..1000).map(|i| (i * 7) % 4).collect();

    c.bench_function("score_1000_4class", |b| {
        b.iter(|| score(black_box(&y_true), black_box(&y_pred)))
    });

    c.bench_function("stratified_split_1000", |b| {
        b.iter(|| stratified_split(black_box(&y_true), 0.25, 42))
    });
}

criterion_group!(
    benches,
    bench_preprocessing,
    bench_svm,
    bench_statevector,
    bench_metrics_and_split,
);
criterion_main!(benches);
