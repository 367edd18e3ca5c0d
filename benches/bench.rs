use cbor_tree::buffer::VecOutput;
use cbor_tree::codec::{decode_tree, encode_tree};
use cbor_tree::model::{DynamicModel, LogicalType, Payload};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{random, thread_rng, Rng};

fn name() -> String {
    let mut arr = [0 as char; 8];
    thread_rng().fill(&mut arr[..]);
    let mut s = String::new();
    s.extend(arr.iter());
    s
}

fn build_document() -> DynamicModel<'static> {
    let mut model = DynamicModel::new_dynamic();
    {
        let mut root = model.build_root_map().unwrap();
        root.push_text_entry("type", "WorkStopped").unwrap();
        root.push_text_entry("byWhom", &name()).unwrap();
        root.add_entry("pause", LogicalType::Bool, Payload::Bool(false)).unwrap();
        let workers = root.push_array_entry_text_key("workers").unwrap();
        let mut workers = root.child_mut(workers);
        workers.push_text(&name()).unwrap();
        workers.push_text(&name()).unwrap();
        workers.push_text(&name()).unwrap();
        root.add_entry("started", LogicalType::Integer, Payload::Int(random::<u32>() as i64))
            .unwrap();
        root.add_entry("stopped", LogicalType::Integer, Payload::Int(random::<u32>() as i64))
            .unwrap();
    }
    model
}

fn encode_document(model: &DynamicModel<'_>) -> Vec<u8> {
    let mut out = VecOutput::new();
    encode_tree(&mut out, model.root().unwrap()).unwrap();
    out.into_vec()
}

fn transform(bytes: &[u8]) -> DynamicModel<'static> {
    let mut src = DynamicModel::new_dynamic();
    let root = decode_tree(&mut src, bytes).unwrap();
    let src_root = src.item(root);
    let started = src_root.entries().find(|(k, _)| k.as_text() == Some("started")).unwrap().1.as_int().unwrap();
    let stopped = src_root.entries().find(|(k, _)| k.as_text() == Some("stopped")).unwrap().1.as_int().unwrap();
    let who = src_root.entries().find(|(k, _)| k.as_text() == Some("byWhom")).unwrap().1.as_text().unwrap().to_owned();

    let mut dst = DynamicModel::new_dynamic();
    {
        let mut root = dst.build_root_map().unwrap();
        root.add_entry("start", LogicalType::Integer, Payload::Int(started)).unwrap();
        root.push_text_entry("who", &who).unwrap();
        root.add_entry("duration", LogicalType::Integer, Payload::Int(stopped - started))
            .unwrap();
    }
    dst
}

fn count_items<I: cbor_tree::alloc::ItemAllocator, B: cbor_tree::alloc::BlobAllocator>(
    item: cbor_tree::model::ItemHandle<'_, I, B>,
) -> usize {
    1 + item.children().map(count_items).sum::<usize>()
}

fn bench_suite(c: &mut Criterion) {
    c.bench_function("build document", |b| b.iter(build_document));
    c.bench_function("encode document", |b| {
        b.iter_batched_ref(build_document, |m| encode_document(m), criterion::BatchSize::SmallInput)
    });
    c.bench_function("decode document", |b| {
        b.iter_batched_ref(
            || encode_document(&build_document()),
            |bytes| {
                let mut model = DynamicModel::new_dynamic();
                decode_tree(&mut model, bytes).unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });
    c.bench_function("transform document", |b| {
        b.iter_batched_ref(
            || encode_document(&build_document()),
            |bytes| transform(bytes),
            criterion::BatchSize::SmallInput,
        )
    });
    c.bench_function("count items", |b| {
        b.iter_batched_ref(
            || encode_document(&build_document()),
            |bytes| {
                let mut model = DynamicModel::new_dynamic();
                let root = decode_tree(&mut model, bytes).unwrap();
                count_items(model.item(root))
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_suite);
criterion_main!(benches);
