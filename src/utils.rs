//! Common utilities used across the crate.
//!
//! Parallelism configuration and thread pool setup for scoring passes.

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// This is a simple flag passed down to the pass driver. When `Parallel`, row
/// blocks are scored on the current rayon pool; when `Sequential`, they are
/// scored in order on the calling thread.
///
/// The actual thread pool is set up by [`run_with_threads`]; components don't
/// manage thread pools, they just respect this flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use the global rayon pool)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// If a dedicated pool cannot be built the closure runs on the global pool.
#[inline]
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    let parallelism = Parallelism::from_threads(n_threads);

    match parallelism {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel if n_threads == 0 => f(Parallelism::Parallel),
        Parallelism::Parallel => {
            match rayon::ThreadPoolBuilder::new().num_threads(n_threads).build() {
                Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
                Err(err) => {
                    tracing::warn!("failed to build {n_threads}-thread pool ({err}), using global pool");
                    f(Parallelism::Parallel)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallelism_from_threads() {
        assert!(!Parallelism::from_threads(1).is_parallel()); // 1 = sequential
        assert!(Parallelism::from_threads(2).is_parallel()); // >1 = parallel
        assert!(Parallelism::from_threads(8).is_parallel());
    }

    #[test]
    fn test_parallelism_constants() {
        assert!(Parallelism::Parallel.is_parallel());
        assert!(!Parallelism::Sequential.is_parallel());
    }

    #[test]
    fn test_run_with_threads_sequential() {
        let result = run_with_threads(1, |p| (p, 42));
        assert_eq!(result, (Parallelism::Sequential, 42));
    }

    #[test]
    fn test_run_with_threads_explicit() {
        let result = run_with_threads(2, |_| rayon::current_num_threads());
        assert_eq!(result, 2);
    }
}
