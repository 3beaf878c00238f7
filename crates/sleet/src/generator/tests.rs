use crate::{
    BasicIdWorker, EPOCH_MILLIS, Error, IdGenerator, MAX_BATCH_SIZE, MAX_TIMESTAMP, MonotonicClock,
    SleetId, TimeSource, WorkerBuilder, WorkerState,
};
use core::cell::Cell;
use std::collections::HashSet;
use std::sync::Mutex;
use std::thread::scope;

#[cfg(feature = "lock")]
use crate::LockIdWorker;

const T0: u64 = EPOCH_MILLIS + 42;

#[derive(Clone, Copy)]
struct FixedTime {
    millis: u64,
}

impl TimeSource for FixedTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// Replays `values` one read at a time, then repeats the last one.
struct ScriptedTime {
    values: Vec<u64>,
    index: Cell<usize>,
}

impl ScriptedTime {
    fn new(values: &[u64]) -> Self {
        Self {
            values: values.to_vec(),
            index: Cell::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.index.get()
    }
}

impl TimeSource for ScriptedTime {
    fn current_millis(&self) -> u64 {
        let i = self.index.get();
        self.index.set(i + 1);
        self.values[i.min(self.values.len() - 1)]
    }
}

/// Reports `before` for the first `switch_after` reads and `before + 1`
/// afterwards.
struct StepAfter {
    before: u64,
    switch_after: usize,
    reads: Cell<usize>,
}

impl TimeSource for StepAfter {
    fn current_millis(&self) -> u64 {
        let reads = self.reads.get() + 1;
        self.reads.set(reads);
        if reads > self.switch_after {
            self.before + 1
        } else {
            self.before
        }
    }
}

fn build<G, T>(node_id: u16, time: T) -> G
where
    G: IdGenerator<T>,
    T: TimeSource,
{
    G::try_new(node_id, time).unwrap()
}

fn run_sequence_increments_within_same_tick<G>(generator: &G)
where
    G: IdGenerator<FixedTime>,
{
    let id1 = generator.next_id().unwrap();
    let id2 = generator.next_id().unwrap();
    let id3 = generator.next_id().unwrap();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id3.timestamp(), 42);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id3.sequence(), 2);
    assert!(id1 < id2 && id2 < id3);

    assert_eq!(
        generator.state().unwrap(),
        WorkerState {
            last_timestamp: Some(T0),
            sequence: 2,
        }
    );
}

fn run_first_id_at_fresh_tick_has_sequence_zero<G>(generator: &G)
where
    G: IdGenerator<FixedTime>,
{
    assert_eq!(generator.state().unwrap(), WorkerState::new());
    let id = generator.next_id().unwrap();
    assert_eq!(id.sequence(), 0);
    assert_eq!(id.unix_millis(), T0);
}

fn run_rollover_waits_for_next_millisecond<G, T>(generator: &G, time: &StepAfter)
where
    G: IdGenerator<T>,
    T: TimeSource,
{
    for i in 0..=SleetId::max_sequence() {
        let id = generator.next_id().unwrap();
        assert_eq!(id.sequence(), i);
        assert_eq!(id.timestamp(), 42);
    }

    let id = generator.next_id().unwrap();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
    // One read for the 1025th call, one more from the wait.
    assert_eq!(time.reads.get(), 1026);
}

fn run_regression_leaves_state_unchanged<G, T>(generator: &G, time: &ScriptedTime)
where
    G: IdGenerator<T>,
    T: TimeSource,
{
    let a = generator.next_id().unwrap();
    let b = generator.next_id().unwrap();
    assert_eq!((a.sequence(), b.sequence()), (0, 1));
    let before = generator.state().unwrap();

    assert_eq!(
        generator.next_id(),
        Err(Error::ClockRegression { behind_by_ms: 5 })
    );
    assert_eq!(generator.state().unwrap(), before);

    // Clock recovers to the same millisecond: sequence picks up where it left.
    let c = generator.next_id().unwrap();
    assert_eq!(c.timestamp(), a.timestamp());
    assert_eq!(c.sequence(), 2);
    assert!(b < c);
    assert_eq!(time.reads(), 4);
}

fn run_out_of_range_timestamps<G>(make: impl Fn(u64) -> G)
where
    G: IdGenerator<FixedTime>,
{
    let before_epoch = make(EPOCH_MILLIS - 1);
    assert_eq!(
        before_epoch.next_id(),
        Err(Error::TimestampOutOfRange {
            unix_millis: EPOCH_MILLIS - 1
        })
    );
    assert_eq!(before_epoch.state().unwrap(), WorkerState::new());

    let at_epoch = make(EPOCH_MILLIS);
    let id = at_epoch.next_id().unwrap();
    assert_eq!(id.timestamp(), 0);

    let last_millisecond = make(EPOCH_MILLIS + MAX_TIMESTAMP);
    let id = last_millisecond.next_id().unwrap();
    assert_eq!(id.timestamp(), MAX_TIMESTAMP);
    assert!(id.to_i64() > 0);

    let exhausted = make(EPOCH_MILLIS + MAX_TIMESTAMP + 1);
    assert_eq!(
        exhausted.next_id(),
        Err(Error::TimestampOutOfRange {
            unix_millis: EPOCH_MILLIS + MAX_TIMESTAMP + 1
        })
    );
}

fn run_batch_sizes<G>(generator: &G)
where
    G: IdGenerator<FixedTime>,
{
    assert_eq!(generator.next_ids(0).unwrap(), Vec::new());
    assert_eq!(generator.state().unwrap(), WorkerState::new());

    let ids = generator.next_ids(MAX_BATCH_SIZE).unwrap();
    assert_eq!(ids.len(), MAX_BATCH_SIZE);
    for (i, pair) in ids.windows(2).enumerate() {
        assert!(pair[0] < pair[1]);
        assert_eq!(usize::from(pair[0].sequence()), i);
    }

    assert_eq!(
        generator.next_ids(MAX_BATCH_SIZE + 1),
        Err(Error::InvalidCount {
            count: 101,
            max: 100
        })
    );
    // The rejected request did not touch the state.
    assert_eq!(generator.state().unwrap().sequence, 99);

    let next = generator.next_id().unwrap();
    assert_eq!(next.sequence(), 100);
}

fn run_failed_batch_is_discarded<G, T>(generator: &G)
where
    G: IdGenerator<T>,
    T: TimeSource,
{
    assert_eq!(
        generator.next_ids(5),
        Err(Error::ClockRegression { behind_by_ms: 3 })
    );
    // The two identifiers issued before the failure are gone but never
    // handed out again.
    assert_eq!(
        generator.state().unwrap(),
        WorkerState {
            last_timestamp: Some(T0),
            sequence: 1,
        }
    );
    let id = generator.next_id().unwrap();
    assert_eq!(id.sequence(), 2);
}

fn run_ids_carry_identity<G>(generator: &G)
where
    G: IdGenerator<FixedTime>,
{
    assert_eq!(generator.node_id(), 511);
    assert_eq!(generator.region_id(), 31);
    for id in generator.next_ids(10).unwrap() {
        assert_eq!(id.node_id(), 511);
        assert_eq!(id.region_id(), 31);
        assert!(id.to_i64() > 0);
    }
}

fn run_generator_monotonic<G>(generator: &G)
where
    G: IdGenerator<MonotonicClock>,
{
    const TOTAL_IDS: usize = 4096 * 64;

    let mut last: Option<SleetId> = None;
    for _ in 0..TOTAL_IDS {
        let id = generator.next_id().unwrap();
        assert_eq!(id.node_id(), 1);
        if let Some(prev) = last {
            assert!(id > prev);
            if id.timestamp() == prev.timestamp() {
                assert_eq!(id.sequence(), prev.sequence() + 1);
            } else {
                assert_eq!(id.sequence(), 0);
            }
        }
        last = Some(id);
    }
}

#[test]
fn basic_generator_sequence_test() {
    let generator: BasicIdWorker<_> = build(0, FixedTime { millis: T0 });
    run_sequence_increments_within_same_tick(&generator);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_sequence_test() {
    let generator: LockIdWorker<_> = build(0, FixedTime { millis: T0 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn basic_generator_fresh_tick_test() {
    let generator: BasicIdWorker<_> = build(0, FixedTime { millis: T0 });
    run_first_id_at_fresh_tick_has_sequence_zero(&generator);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_fresh_tick_test() {
    let generator: LockIdWorker<_> = build(0, FixedTime { millis: T0 });
    run_first_id_at_fresh_tick_has_sequence_zero(&generator);
}

fn step_after_exhaustion() -> StepAfter {
    StepAfter {
        before: T0,
        switch_after: 1025,
        reads: Cell::new(0),
    }
}

#[test]
fn basic_generator_rollover_test() {
    let time = step_after_exhaustion();
    let generator = BasicIdWorker::with_clock(1, &time).unwrap();
    run_rollover_waits_for_next_millisecond(&generator, &time);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_rollover_test() {
    let time = step_after_exhaustion();
    let generator = LockIdWorker::with_clock(1, &time).unwrap();
    run_rollover_waits_for_next_millisecond(&generator, &time);
}

#[test]
fn basic_generator_regression_test() {
    let time = ScriptedTime::new(&[T0 + 10, T0 + 10, T0 + 5, T0 + 10]);
    let generator = BasicIdWorker::with_clock(1, &time).unwrap();
    run_regression_leaves_state_unchanged(&generator, &time);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_regression_test() {
    let time = ScriptedTime::new(&[T0 + 10, T0 + 10, T0 + 5, T0 + 10]);
    let generator = LockIdWorker::with_clock(1, &time).unwrap();
    run_regression_leaves_state_unchanged(&generator, &time);
}

#[test]
fn basic_generator_time_window_test() {
    run_out_of_range_timestamps(|millis| -> BasicIdWorker<_> { build(0, FixedTime { millis }) });
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_time_window_test() {
    run_out_of_range_timestamps(|millis| -> LockIdWorker<_> { build(0, FixedTime { millis }) });
}

#[test]
fn basic_generator_batch_test() {
    let generator: BasicIdWorker<_> = build(0, FixedTime { millis: T0 });
    run_batch_sizes(&generator);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_batch_test() {
    let generator: LockIdWorker<_> = build(0, FixedTime { millis: T0 });
    run_batch_sizes(&generator);
}

#[test]
fn basic_generator_failed_batch_test() {
    let time = ScriptedTime::new(&[T0, T0, T0 - 3, T0]);
    let generator = BasicIdWorker::with_clock(1, &time).unwrap();
    run_failed_batch_is_discarded(&generator);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_failed_batch_test() {
    let time = ScriptedTime::new(&[T0, T0, T0 - 3, T0]);
    let generator = LockIdWorker::with_clock(1, &time).unwrap();
    run_failed_batch_is_discarded(&generator);
}

#[test]
fn basic_generator_identity_test() {
    let generator: BasicIdWorker<_> = WorkerBuilder::new(511)
        .region_id(31)
        .clock(FixedTime { millis: T0 })
        .build()
        .unwrap();
    run_ids_carry_identity(&generator);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_identity_test() {
    let generator: LockIdWorker<_> = WorkerBuilder::new(511)
        .region_id(31)
        .clock(FixedTime { millis: T0 })
        .build()
        .unwrap();
    run_ids_carry_identity(&generator);
}

#[test]
fn node_id_out_of_range_is_rejected() {
    assert!(matches!(
        BasicIdWorker::new(512),
        Err(Error::InvalidNodeId {
            node_id: 512,
            max: 511
        })
    ));
    #[cfg(feature = "lock")]
    assert!(matches!(
        LockIdWorker::new(u16::MAX),
        Err(Error::InvalidNodeId { .. })
    ));
    let generator = BasicIdWorker::new(511).unwrap();
    let id = generator.next_id().unwrap();
    assert_eq!(id.node_id(), 511);
    assert_eq!(id.unix_millis(), generator.state().last_timestamp.unwrap());
}

#[test]
fn default_region_is_one() {
    let generator = BasicIdWorker::with_clock(3, FixedTime { millis: T0 }).unwrap();
    assert_eq!(generator.next_id().unwrap().region_id(), 1);
}

#[test]
fn basic_generator_monotonic_clock_sequence_increments() {
    let generator: BasicIdWorker<_> = build(1, MonotonicClock::default());
    run_generator_monotonic(&generator);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_monotonic_clock_sequence_increments() {
    let generator: LockIdWorker<_> = build(1, MonotonicClock::default());
    run_generator_monotonic(&generator);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_clones_share_state() {
    let a = LockIdWorker::with_clock(1, FixedTime { millis: T0 }).unwrap();
    let b = a.clone();
    assert_eq!(a.next_id().unwrap().sequence(), 0);
    assert_eq!(b.next_id().unwrap().sequence(), 1);
    assert_eq!(a.state().unwrap(), b.state().unwrap());
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_threaded_unique() {
    const IDS_PER_THREAD: usize = 4096 * 16;

    let threads = num_cpus::get().max(2);
    let generator = LockIdWorker::with_clock(0, MonotonicClock::default()).unwrap();
    let seen_ids = Mutex::new(HashSet::with_capacity(threads * IDS_PER_THREAD));

    scope(|s| {
        for _ in 0..threads {
            let generator = generator.clone();
            let seen_ids = &seen_ids;
            s.spawn(move || {
                for _ in 0..IDS_PER_THREAD {
                    let id = generator.next_id().unwrap();
                    assert!(seen_ids.lock().unwrap().insert(id));
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, threads * IDS_PER_THREAD);
}

#[cfg(feature = "lock")]
#[test]
fn lock_generator_batches_are_not_interleaved() {
    const BATCHES_PER_THREAD: usize = 200;

    let threads = num_cpus::get().max(2);
    let generator = LockIdWorker::with_clock(0, MonotonicClock::default()).unwrap();
    let batches = Mutex::new(Vec::new());

    scope(|s| {
        for t in 0..threads {
            let generator = generator.clone();
            let batches = &batches;
            s.spawn(move || {
                for i in 0..BATCHES_PER_THREAD {
                    // Mix single issuance into the batch traffic.
                    if (i + t) % 3 == 0 {
                        generator.next_id().unwrap();
                    }
                    let batch = generator.next_ids(MAX_BATCH_SIZE).unwrap();
                    batches.lock().unwrap().push(batch);
                }
            });
        }
    });

    let batches = batches.into_inner().unwrap();
    let mut all: Vec<SleetId> = batches.iter().flatten().copied().collect();
    all.sort_unstable();
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len());

    // Every batch is a contiguous run of the global order.
    for batch in &batches {
        let start = all.binary_search(&batch[0]).unwrap();
        assert_eq!(&all[start..start + batch.len()], batch.as_slice());
    }
}

#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
#[test]
fn lock_generator_reports_poisoned_lock() {
    let generator = LockIdWorker::with_clock(0, FixedTime { millis: T0 }).unwrap();

    scope(|s| {
        let handle = s.spawn(|| {
            let _guard = generator.state.lock().unwrap();
            panic!("poison the allocator lock");
        });
        assert!(handle.join().is_err());
    });

    assert_eq!(generator.next_id(), Err(Error::LockPoisoned));
    assert_eq!(generator.next_ids(1), Err(Error::LockPoisoned));
    assert_eq!(generator.state(), Err(Error::LockPoisoned));
}
