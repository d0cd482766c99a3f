//! Drives every leaderboard backend through the same synthetic workload and
//! reports per-operation latency, both as a micro benchmark over a prefilled
//! board and as a timed simulation churning a fixed share of users per
//! second. Results land on stdout and in two CSV files.

mod report;
mod stats;
mod workload;

use std::io::Result as IoResult;
use std::{
    path::Path,
    thread,
    time::{Duration, Instant},
};

use podium::{
    BucketArrayLeaderboard, Leaderboard, LinkedListLeaderboard, OsTreeLeaderboard,
    SkiplistLeaderboard, SortedArrayLeaderboard,
};

use crate::{
    report::{MicroRow, RealtimeRow},
    stats::{LatencySummary, print_summary},
    workload::{MAX_SCORE, Workload},
};


const BATCH_SIZES: &[usize] = &[5_000, 10_000, 20_000, 50_000, 100_000];
/// Operations measured per phase of the micro benchmark.
const MEASURED_OPERATIONS: usize = 1_000;
const SIMULATION_TICKS: usize = 3;
/// Share of the population updated (and searched) per simulated second.
const CHURN_RATE: f64 = 0.3;
/// The linked list's O(n) walks make larger populations impractical.
const LINKED_LIST_CAP: usize = 10_000;

const WORKLOAD_SEED: u64 = 0x1EADE12B0A12D;

const MICRO_CSV: &str = "benchmark_results.csv";
const REALTIME_CSV: &str = "realtime_benchmark_results.csv";


fn timed<R>(operation: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = operation();
    (result, start.elapsed())
}

fn prefill<L: Leaderboard>(board: &mut L, data: &[(u64, u32)]) -> f64 {
    let ((), elapsed) = timed(|| {
        for &(user, score) in data {
            board.insert(user, score).expect("workload scores stay in the declared domain");
        }
    });
    elapsed.as_secs_f64() * 1e6
}

fn run_micro<L: Leaderboard>(
    name: &'static str,
    batch_size: usize,
    mut board: L,
    workload: &mut Workload,
) -> MicroRow {
    println!("benchmarking {name} with {batch_size} elements (micro)...");

    let data = workload.unique_entries(batch_size);
    let init_total_us = prefill(&mut board, &data);
    println!("initialization took {init_total_us:.2} us (total)");

    let fresh = workload.unique_entries(MEASURED_OPERATIONS);
    let mut insert_times = Vec::with_capacity(MEASURED_OPERATIONS);
    for &(user, score) in &fresh {
        let (result, elapsed) = timed(|| board.insert(user, score));
        result.expect("workload scores stay in the declared domain");
        insert_times.push(elapsed);
    }
    let insert = LatencySummary::from_samples(&insert_times);
    print_summary(name, "insert", MEASURED_OPERATIONS, &insert);

    let all_data: Vec<(u64, u32)> = data.iter().chain(&fresh).copied().collect();

    let mut search_times = Vec::with_capacity(MEASURED_OPERATIONS);
    for &&(user, _) in &workload.sample(&all_data, MEASURED_OPERATIONS) {
        let (_, elapsed) = timed(|| board.rank(user));
        search_times.push(elapsed);
    }
    let search = LatencySummary::from_samples(&search_times);
    print_summary(name, "search", MEASURED_OPERATIONS, &search);

    let mut delete_times = Vec::with_capacity(MEASURED_OPERATIONS);
    for &&(user, _) in &workload.sample(&all_data, MEASURED_OPERATIONS) {
        let ((), elapsed) = timed(|| board.delete(user));
        delete_times.push(elapsed);
    }
    let delete = LatencySummary::from_samples(&delete_times);
    print_summary(name, "delete", MEASURED_OPERATIONS, &delete);

    MicroRow {
        name,
        batch_size,
        init_total_us,
        insert_avg_us: insert.average_us,
        insert_p99_us: insert.p99_us,
        search_avg_us: search.average_us,
        search_p99_us: search.p99_us,
        delete_avg_us: delete.average_us,
        delete_p99_us: delete.p99_us,
    }
}

fn run_realtime<L: Leaderboard>(
    name: &'static str,
    batch_size: usize,
    mut board: L,
    workload: &mut Workload,
) -> RealtimeRow {
    println!("benchmarking {name} with {batch_size} elements (realtime sim)...");

    let data = workload.unique_entries(batch_size);
    let init_total_us = prefill(&mut board, &data);
    println!("initialization took {init_total_us:.2} us (total)");

    let ops_per_tick = (batch_size as f64 * CHURN_RATE) as usize;
    let mut update_latencies = Vec::new();
    let mut search_latencies = Vec::new();

    for tick in 1..=SIMULATION_TICKS {
        let update_users: Vec<u64> =
            workload.sample(&data, ops_per_tick).iter().map(|&&(user, _)| user).collect();
        let search_users: Vec<u64> =
            workload.sample(&data, ops_per_tick).iter().map(|&&(user, _)| user).collect();

        let tick_start = Instant::now();

        for user in update_users {
            let new_score = workload.random_score();
            let (result, elapsed) = timed(|| board.update(user, new_score));
            result.expect("workload scores stay in the declared domain");
            update_latencies.push(elapsed);
        }
        for user in search_users {
            let (_, elapsed) = timed(|| board.rank(user));
            search_latencies.push(elapsed);
        }

        let tick_duration = tick_start.elapsed();
        println!(
            "  sec {tick}: processed {ops_per_tick} updates + {ops_per_tick} searches \
             in {:.4}s",
            tick_duration.as_secs_f64(),
        );

        if tick_duration < Duration::from_secs(1) {
            thread::sleep(Duration::from_secs(1) - tick_duration);
        } else {
            println!(
                "  WARNING: falling behind, tick took {:.4}s",
                tick_duration.as_secs_f64(),
            );
        }
    }

    let update = LatencySummary::from_samples(&update_latencies);
    let search = LatencySummary::from_samples(&search_latencies);
    print_summary(name, "realtime update", update_latencies.len(), &update);
    print_summary(name, "realtime search", search_latencies.len(), &search);

    RealtimeRow {
        name,
        batch_size,
        init_total_us,
        update_avg_us: update.average_us,
        update_p99_us: update.p99_us,
        search_avg_us: search.average_us,
        search_p99_us: search.p99_us,
    }
}

fn main() -> IoResult<()> {
    let mut workload = Workload::new(WORKLOAD_SEED);
    let mut micro_rows = Vec::new();
    let mut realtime_rows = Vec::new();

    for &batch_size in BATCH_SIZES {
        println!("\n==================== dataset size: {batch_size} ====================\n");

        micro_rows.push(run_micro(
            "SortedArray", batch_size, SortedArrayLeaderboard::new(), &mut workload,
        ));
        realtime_rows.push(run_realtime(
            "SortedArray", batch_size, SortedArrayLeaderboard::new(), &mut workload,
        ));

        if batch_size <= LINKED_LIST_CAP {
            micro_rows.push(run_micro(
                "LinkedList", batch_size, LinkedListLeaderboard::new(), &mut workload,
            ));
            realtime_rows.push(run_realtime(
                "LinkedList", batch_size, LinkedListLeaderboard::new(), &mut workload,
            ));
        }

        micro_rows.push(run_micro(
            "OsTree", batch_size, OsTreeLeaderboard::new(), &mut workload,
        ));
        realtime_rows.push(run_realtime(
            "OsTree", batch_size, OsTreeLeaderboard::new(), &mut workload,
        ));

        micro_rows.push(run_micro(
            "Skiplist", batch_size, SkiplistLeaderboard::new(), &mut workload,
        ));
        realtime_rows.push(run_realtime(
            "Skiplist", batch_size, SkiplistLeaderboard::new(), &mut workload,
        ));

        micro_rows.push(run_micro(
            "BucketArray", batch_size, BucketArrayLeaderboard::new(MAX_SCORE), &mut workload,
        ));
        realtime_rows.push(run_realtime(
            "BucketArray", batch_size, BucketArrayLeaderboard::new(MAX_SCORE), &mut workload,
        ));
    }

    report::write_micro_csv(Path::new(MICRO_CSV), &micro_rows)?;
    println!("\nmicro-benchmark results saved to {MICRO_CSV}");

    report::write_realtime_csv(Path::new(REALTIME_CSV), &realtime_rows)?;
    println!("realtime benchmark results saved to {REALTIME_CSV}");

    Ok(())
}
