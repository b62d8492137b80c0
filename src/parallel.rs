use crate::board::Board;
use crate::random::RandomGenerator;
use rayon::prelude::*;
use std::ops::Range;
use tracing::warn;

/// Splits an index range over a fixed number of workers and merges their results.
///
/// Every worker gets one contiguous chunk, its own generator forked from the caller's one, and
/// (through [`run_on_board`](Self::run_on_board)) its own copy of the board. A fresh thread pool is
/// built per call; collecting the workers' output is the only synchronisation point, and the
/// chunks come back in worker order.
#[derive(Debug, Clone, Copy)]
pub struct ParallelRolloutRunner {
    workers: usize,
}

impl ParallelRolloutRunner {
    /// Creates a runner. A worker count of 0 is treated as 1.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Contiguous, near-equal chunks of `0..len`, at most one per worker. Earlier chunks take
    /// the remainder. Empty chunks are never produced.
    pub fn partition(&self, len: usize) -> Vec<Range<usize>> {
        let chunks = self.workers.min(len);
        if chunks == 0 {
            return vec![];
        }

        let base = len / chunks;
        let extra = len % chunks;
        let mut start = 0;
        (0..chunks)
            .map(|i| {
                let end = start + base + usize::from(i < extra);
                let range = start..end;
                start = end;
                range
            })
            .collect()
    }

    /// Runs `job` once per chunk of `0..len` and concatenates the results in chunk order.
    pub fn run<K, T, F>(&self, len: usize, rng: &mut K, job: F) -> Vec<T>
    where
        K: RandomGenerator,
        T: Send,
        F: Fn(Range<usize>, &mut K) -> Vec<T> + Sync,
    {
        let chunks = self.partition(len);
        if chunks.len() <= 1 {
            return chunks.into_iter().flat_map(|range| job(range, rng)).collect();
        }

        let jobs: Vec<(Range<usize>, K)> = chunks.into_iter().map(|range| (range, rng.fork())).collect();
        match rayon::ThreadPoolBuilder::new().num_threads(jobs.len()).build() {
            Ok(pool) => pool
                .install(|| {
                    jobs.into_par_iter()
                        .map(|(range, mut worker_rng)| job(range, &mut worker_rng))
                        .collect::<Vec<Vec<T>>>()
                })
                .into_iter()
                .flatten()
                .collect(),
            Err(e) => {
                warn!("failed to build rollout thread pool, running sequentially: {}", e);
                jobs.into_iter()
                    .flat_map(|(range, mut worker_rng)| job(range, &mut worker_rng))
                    .collect()
            }
        }
    }

    /// Like [`run`](Self::run), but each worker first takes a private copy of `board`.
    /// The original board is only ever read.
    pub fn run_on_board<K, T, F>(&self, board: &Board, len: usize, rng: &mut K, job: F) -> Vec<T>
    where
        K: RandomGenerator,
        T: Send,
        F: Fn(&mut Board, Range<usize>, &mut K) -> Vec<T> + Sync,
    {
        self.run(len, rng, |range, worker_rng| {
            let mut copy = board.clone();
            job(&mut copy, range, worker_rng)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Coordinate;
    use crate::random::CustomNumberGenerator;

    #[test]
    fn partition_is_contiguous_and_complete() {
        let runner = ParallelRolloutRunner::new(4);
        assert_eq!(runner.partition(10), vec![0..3, 3..6, 6..8, 8..10]);
        assert_eq!(runner.partition(3), vec![0..1, 1..2, 2..3]);
        assert!(runner.partition(0).is_empty());
        assert_eq!(ParallelRolloutRunner::new(1).partition(7), vec![0..7]);
        assert_eq!(ParallelRolloutRunner::new(0).workers(), 1);
    }

    #[test]
    fn results_come_back_in_worker_order() {
        let mut rng = CustomNumberGenerator::default();
        let runner = ParallelRolloutRunner::new(3);
        let out = runner.run(10, &mut rng, |range, _| range.collect::<Vec<_>>());
        assert_eq!(out, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn workers_mutate_private_copies() {
        let board = Board::new(3);
        let mut rng = CustomNumberGenerator::default();
        let runner = ParallelRolloutRunner::new(3);
        let counts = runner.run_on_board(&board, 9, &mut rng, |copy, range, _| {
            for i in range.clone() {
                copy.play(Coordinate::new(i / 3, i % 3));
            }
            vec![copy.moves_played()]
        });
        assert_eq!(counts, vec![3, 3, 3]);
        assert_eq!(board.empty_count(), 9);
    }
}
