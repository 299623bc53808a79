//! Closed code tables used across the plan's records.
//!
//! Every table is a fieldless enum keyed by the small integer the plan's records
//! store, so matches over them are exhaustive.

pub mod codes;

pub use codes::{
    CommentType, EmployeeType, Enrollment, ProfitCode, UnknownCode, ZeroContributionReason,
};
