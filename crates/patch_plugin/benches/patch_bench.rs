//! Patch manager benchmarks.
//!
//! - **change_depth**: first population of a full grid vs. re-showing a
//!   cached one
//! - **cleanup**: one bounded sweep over a large set of stale patches
//! - **node_changed**: reactive updates drained through `tick`

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use patch_plugin::{
  ManualClock, NodeChange, NullFactory, PatchConfig, PatchManager, MAX_SUPPORTED_DEPTH,
};

type BenchManager = PatchManager<NullFactory, ManualClock>;

fn manager(clock: &ManualClock) -> BenchManager {
  let config = PatchConfig {
    max_depth: MAX_SUPPORTED_DEPTH,
    ..PatchConfig::default()
  };
  match PatchManager::detached(NullFactory, clock.clone(), config) {
    Ok(manager) => manager,
    Err(error) => panic!("bench config rejected: {error}"),
  }
}

// =============================================================================
// Depth switching
// =============================================================================

fn bench_change_depth(c: &mut Criterion) {
  let mut group = c.benchmark_group("change_depth");

  for depth in [4u8, 6, 8] {
    group.bench_with_input(BenchmarkId::new("populate", depth), &depth, |b, &depth| {
      let clock = ManualClock::new();
      b.iter_batched(
        || manager(&clock),
        |mut manager| black_box(manager.change_depth(depth).ok()),
        BatchSize::LargeInput,
      )
    });

    group.bench_with_input(BenchmarkId::new("cached", depth), &depth, |b, &depth| {
      let clock = ManualClock::new();
      let mut manager = manager(&clock);
      let _ = manager.change_depth(depth);
      let _ = manager.change_depth(0);
      b.iter(|| {
        let _ = manager.change_depth(depth);
        black_box(manager.change_depth(0).ok())
      })
    });
  }

  group.finish();
}

// =============================================================================
// Cleanup
// =============================================================================

fn bench_cleanup(c: &mut Criterion) {
  let mut group = c.benchmark_group("cleanup");

  group.bench_function("stale_sweep_depth6", |b| {
    let clock = ManualClock::new();
    b.iter_batched(
      || {
        let mut manager = manager(&clock);
        let _ = manager.change_depth(6);
        let _ = manager.change_depth(0);
        clock.advance(Duration::from_secs(21));
        manager
      },
      |mut manager| black_box(manager.cleanup().evicted_count()),
      BatchSize::LargeInput,
    )
  });

  group.bench_function("visible_scan_depth6", |b| {
    let clock = ManualClock::new();
    let mut manager = manager(&clock);
    let _ = manager.change_depth(6);
    b.iter(|| black_box(manager.cleanup().scanned))
  });

  group.finish();
}

// =============================================================================
// Reactive updates
// =============================================================================

fn bench_node_changed(c: &mut Criterion) {
  c.bench_function("node_changed_toggle_256", |b| {
    let clock = ManualClock::new();
    let mut manager = manager(&clock);
    let handle = manager.handle();
    let mut visible = true;
    b.iter(|| {
      for row in 0..16 {
        for column in 0..16 {
          handle.node_changed(NodeChange::new(column, row, 4, visible));
        }
      }
      visible = !visible;
      black_box(manager.tick().messages)
    })
  });
}

criterion_group!(benches, bench_change_depth, bench_cleanup, bench_node_changed);
criterion_main!(benches);
