//! Thread budgets and client topology.

mod cores;
mod slaves;
mod threads;

pub use cores::{count_physical_cores, number_of_physical_cores};
pub use slaves::{plan_slaves, SlavePlan, SlaveRequest, CLIENT_SCRIPT};
pub use threads::{plan_threads, ThreadPlan, POLYSELECT_THREADS, SERVER_THREADS, SIEVE_THREADS};
