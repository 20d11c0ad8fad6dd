//! Collectives on thread-backed ranks.

use std::time::Duration;

use les_rs::parallel::{
    CommError, Decomposition, LocalWorld, Periodicity, ProcessGroup, ReduceOp,
};

fn with_group<R, F>(npx: usize, npy: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(&ProcessGroup) -> R + Sync,
{
    LocalWorld::run(npx * npy, |comm| {
        let group = ProcessGroup::new(
            comm,
            Decomposition::from_npx_npy(npx, npy),
            Periodicity::periodic(),
        )
        .unwrap();
        f(&group)
    })
}

#[test]
fn test_sum_max_min_of_rank() {
    for (npx, npy) in [(1, 1), (2, 2), (3, 2)] {
        let n = npx * npy;
        let results = with_group(npx, npy, |group| {
            let rank = group.rank() as i64;
            let mut sum = [rank, 1];
            let mut max = [rank];
            let mut min = [rank as f64 + 0.5];
            group.sum(&mut sum).unwrap();
            group.max(&mut max).unwrap();
            group.min(&mut min).unwrap();
            (sum, max[0], min[0])
        });
        let expected_sum = (n * (n - 1) / 2) as i64;
        for (sum, max, min) in results {
            assert_eq!(sum, [expected_sum, n as i64]);
            assert_eq!(max, n as i64 - 1);
            assert_eq!(min, 0.5);
        }
    }
}

#[test]
fn test_float_sum_is_bit_identical_on_all_ranks() {
    let results = with_group(3, 2, |group| {
        let mut values = [0.1 * (group.rank() as f64 + 1.0), 1.0 / 3.0];
        group.sum(&mut values).unwrap();
        values.map(f64::to_bits)
    });
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_broadcast_from_each_root() {
    let results = with_group(2, 2, |group| {
        (0..group.nprocs())
            .map(|root| {
                let mut buf = if group.rank() == root {
                    vec![root as u64 * 10, 7]
                } else {
                    vec![0, 0]
                };
                group.broadcast(&mut buf, root).unwrap();
                buf
            })
            .collect::<Vec<_>>()
    });
    for per_rank in results {
        for (root, buf) in per_rank.into_iter().enumerate() {
            assert_eq!(buf, vec![root as u64 * 10, 7]);
        }
    }
}

#[test]
fn test_many_reductions_stay_matched() {
    let results = with_group(2, 2, |group| {
        let mut total = 0i32;
        for step in 0..50 {
            let mut value = [step * (group.rank() as i32 + 1)];
            group.all_reduce(&mut value, ReduceOp::Sum).unwrap();
            total += value[0];
            group.barrier().unwrap();
        }
        total
    });
    // sum over steps of step * (1 + 2 + 3 + 4)
    let expected: i32 = (0..50).map(|s| s * 10).sum();
    assert_eq!(results, vec![expected; 4]);
}

#[test]
fn test_wall_clock() {
    let results = with_group(2, 1, |group| {
        let t0 = group.wall_clock_time();
        std::thread::sleep(Duration::from_millis(5));
        let t1 = group.wall_clock_time();
        (t1 > t0, group.at_wall_clock_limit().unwrap())
    });
    assert_eq!(results, vec![(true, false), (true, false)]);
}

#[test]
fn test_failed_rank_ends_pending_collectives() {
    let results = with_group(3, 1, |group| {
        if group.rank() == 1 {
            return Err(CommError::InvalidRank { rank: 9, size: 3 });
        }
        let mut value = [1.0];
        group.sum(&mut value)?;
        group.barrier()
    });

    assert_eq!(results[1], Err(CommError::InvalidRank { rank: 9, size: 3 }));
    for rank in [0, 2] {
        assert!(
            matches!(results[rank], Err(CommError::Disconnected { .. })),
            "rank {} returned {:?}",
            rank,
            results[rank]
        );
    }
}
