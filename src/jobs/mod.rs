//! Background Jobs Module
//!
//! Jobs here are registered with the job scheduler service and run
//! unattended: idempotent, fault-tolerant, and observable through the
//! `job_runs` tracking table.

pub mod ipo_refresh_job;
