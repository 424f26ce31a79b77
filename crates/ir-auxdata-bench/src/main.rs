//! Benchmark for auxiliary data serialization.
//!
//! Builds synthetic per-function tables of the kind analysis tools attach to
//! an IR graph, then times encoding and decoding them.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ir_auxdata::{Id, Node, NoNodes, Offset, Registry, UuidCache, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const BLOCKS_TYPE: &str = "mapping<UUID,sequence<Offset>>";
const NAMES_TYPE: &str = "mapping<UUID,tuple<string,uint64_t>>";

/// Stand-in for a materialized code block.
#[derive(Debug)]
struct Block {
    id: Id,
}

impl Node for Block {
    fn uuid(&self) -> Id {
        self.id
    }
}

/// `function -> [offsets of its blocks]`
fn build_block_table(functions: &[Id], blocks_per_function: u64) -> Value {
    let mut table = BTreeMap::new();
    for function in functions {
        let offsets = (0..blocks_per_function)
            .map(|i| Value::Offset(Offset::new(*function, i * 16)))
            .collect();
        table.insert(Value::Uuid(*function), Value::Sequence(offsets));
    }
    Value::Mapping(table)
}

/// `function -> (name, entry address)`
fn build_name_table(functions: &[Id]) -> Value {
    let mut table = BTreeMap::new();
    for (i, function) in functions.iter().enumerate() {
        table.insert(
            Value::Uuid(*function),
            Value::Tuple(vec![
                Value::String(format!("sub_{:x}", 0x401000 + i * 0x40)),
                Value::Uint64(0x401000 + (i as u64) * 0x40),
            ]),
        );
    }
    Value::Mapping(table)
}

fn throughput(bytes: usize, elapsed: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
}

fn bench_table(
    registry: &Registry,
    cache: &UuidCache,
    label: &str,
    type_name: &str,
    value: &Value,
) {
    let encode_start = Instant::now();
    let encoded = registry.encode_to_vec(value, type_name).expect("Failed to encode");
    let encode_time = encode_start.elapsed();

    println!("\n{} ({})", label, type_name);
    println!("  Encoded: {} bytes in {:?}", encoded.len(), encode_time);
    println!("  Throughput: {:.2} MB/s", throughput(encoded.len(), encode_time));

    let decode_start = Instant::now();
    let decoded = registry
        .decode(&encoded, type_name, &NoNodes)
        .expect("Failed to decode");
    let decode_time = decode_start.elapsed();

    println!("  Decoded (raw ids) in {:?}", decode_time);
    println!("  Throughput: {:.2} MB/s", throughput(encoded.len(), decode_time));
    assert_eq!(&decoded, value, "round trip mismatch");

    let resolve_start = Instant::now();
    let resolved = registry
        .decode(&encoded, type_name, cache)
        .expect("Failed to decode");
    let resolve_time = resolve_start.elapsed();

    println!("  Decoded (resolving {} nodes) in {:?}", cache.len(), resolve_time);

    // Resolved keys and elements sort differently, so only the size is stable.
    let reencoded = registry.encode_to_vec(&resolved, type_name).expect("Failed to re-encode");
    assert_eq!(reencoded.len(), encoded.len(), "re-encoding resolved value changed size");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let function_count: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(50_000);
    let blocks_per_function = 8;

    let functions: Vec<Id> = (0..function_count).map(|_| Uuid::now_v7()).collect();

    // Resolve every other function, as if only part of the graph was loaded.
    let mut cache = UuidCache::new();
    for function in functions.iter().step_by(2) {
        cache.insert(Arc::new(Block { id: *function }));
    }

    info!(function_count, blocks_per_function, "building tables");
    let build_start = Instant::now();
    let blocks = build_block_table(&functions, blocks_per_function);
    let names = build_name_table(&functions);
    println!("Built tables for {} functions in {:?}", function_count, build_start.elapsed());

    let registry = Registry::new();
    bench_table(&registry, &cache, "Function blocks", BLOCKS_TYPE, &blocks);
    bench_table(&registry, &cache, "Function names", NAMES_TYPE, &names);
}
