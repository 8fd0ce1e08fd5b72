use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logseq_analyzer_rs::graph;
use logseq_analyzer_rs::model::file::{LogseqFile, NodeState, PathInfo};
use logseq_analyzer_rs::model::index::FileIndex;
use logseq_analyzer_rs::model::{FeatureKey, FeatureMap, FileType};
use logseq_analyzer_rs::model::info::{BulletInfo, NamespaceInfo, SizeInfo, TimestampInfo};
use std::path::PathBuf;

fn synthetic_index(size: usize) -> FileIndex {
    let mut index = FileIndex::new();
    for i in 0..size {
        let name = format!("page{i}");
        let mut features = FeatureMap::new();
        if i > 0 {
            features.insert(FeatureKey::PageReferences, vec![format!("page{}", i - 1)]);
        }
        index.insert(LogseqFile {
            path: PathInfo {
                path: PathBuf::from(format!("/g/pages/{name}.md")),
                parent_dir: "pages".to_string(),
                suffix: "md".to_string(),
                name: name.clone(),
                file_type: FileType::Page,
                url: String::new(),
            },
            size: SizeInfo::new(100),
            timestamps: TimestampInfo::new(0, 0, 0),
            namespace: NamespaceInfo::from_logical_name(&name, "/"),
            bullets: BulletInfo::new(100, 1, 0),
            features,
            node: NodeState::default(),
            is_hls: false,
            hls_keys: Vec::new(),
            raw_text: None,
        });
    }
    index
}

fn bench_graph_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_pass");

    for size in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("analyze", size), &size, |b, &size| {
            b.iter_batched(
                || synthetic_index(size),
                |mut index| black_box(graph::analyze(&mut index)),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(name = benches; config = Criterion::default(); targets = bench_graph_pass);
criterion_main!(benches);
