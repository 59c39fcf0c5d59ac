use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memory_modder::memory::{RegionInfo, RegionType};
use memory_modder::{Address, Comparison, MemoryEngine, MemoryResult, ProcessId, ProcessMemory};

const BASE: usize = 0x10_0000;

/// A single private region of pseudo-random words
struct SyntheticProcess {
    bytes: Vec<u8>,
}

impl SyntheticProcess {
    fn new(len: usize) -> Self {
        let mut state = 0x2545_F491u32;
        let bytes = (0..len / 4)
            .flat_map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state % 64).to_ne_bytes()
            })
            .collect();
        SyntheticProcess { bytes }
    }
}

impl ProcessMemory for SyntheticProcess {
    fn pid(&self) -> ProcessId {
        1
    }

    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        let start = address.as_usize() - BASE;
        let n = buffer.len().min(self.bytes.len().saturating_sub(start));
        buffer[..n].copy_from_slice(&self.bytes[start..start + n]);
        Ok(n)
    }

    fn write_from(&self, _address: Address, data: &[u8]) -> MemoryResult<usize> {
        Ok(data.len())
    }

    fn regions(&self) -> MemoryResult<Vec<RegionInfo>> {
        Ok(vec![RegionInfo::committed(
            Address::new(BASE),
            self.bytes.len(),
            RegionType::Private,
        )])
    }
}

fn benchmark_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [64 * 1024, 1024 * 1024] {
        let engine = MemoryEngine::new(SyntheticProcess::new(size));
        let aligned = engine.scan::<u32>(true).unwrap();
        let unaligned = engine.scan::<u32>(false).unwrap();

        group.bench_with_input(BenchmarkId::new("aligned_u32", size), &aligned, |b, list| {
            b.iter(|| engine.filter(black_box(list), Comparison::Equals, 7).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("unaligned_u32", size), &unaligned, |b, list| {
            b.iter(|| engine.filter(black_box(list), Comparison::LessThan, 3).unwrap())
        });

        // Second pass over a fragmented list
        let narrowed = engine.filter(&aligned, Comparison::Equals, 7).unwrap();
        group.bench_with_input(BenchmarkId::new("refilter_u32", size), &narrowed, |b, list| {
            b.iter(|| engine.filter(black_box(list), Comparison::Equals, 7).unwrap())
        });
    }

    group.finish();
}

fn benchmark_merge(c: &mut Criterion) {
    let engine = MemoryEngine::new(SyntheticProcess::new(1024 * 1024));
    let list = engine.scan::<u32>(true).unwrap();
    let odd = engine.filter_by(&list, |v: u32| v % 2 == 1).unwrap();

    c.bench_function("all_addresses", |b| b.iter(|| black_box(&odd).all_addresses()));
}

criterion_group!(benches, benchmark_filter, benchmark_merge);
criterion_main!(benches);
