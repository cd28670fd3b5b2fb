//! Timetable search.
//!
//! # Algorithms
//!
//! - **Restart search** (`RestartSearch`): greedy assignment of one
//!   bucket's demand in shuffled order, restarted from a pool snapshot
//!   until the bucket is fully covered or the attempt budget is spent.
//! - **Run driver** (`TimetableRun`): buckets every class by school,
//!   weekday and shift and searches them sequentially, threading the
//!   instructor pool.
//!
//! # Reference
//! Kolisch & Hartmann (1999), "Heuristic Algorithms for the
//! Resource-Constrained Project Scheduling Problem", multi-pass
//! randomized priority rules.

mod restart;
mod run;

pub use restart::{BucketOutcome, Coverage, RestartSearch, UnstaffableDemand};
pub use run::{BucketSummary, InstructorWorkload, RunInput, RunReport, TimetableRun};
