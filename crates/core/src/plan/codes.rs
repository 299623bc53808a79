//! Plan code tables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored code that does not belong to its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown {table} code: {value}")]
pub struct UnknownCode {
    /// Name of the code table.
    pub table: &'static str,
    /// The rejected value.
    pub value: u8,
}

/// Macro to generate closed code tables stored as `u8`.
macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $id:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $id),+
        }

        impl $name {
            /// Every code in the table, in id order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stored id.
            #[must_use]
            pub const fn id(self) -> u8 {
                self as u8
            }
        }

        impl From<$name> for u8 {
            fn from(code: $name) -> Self {
                code.id()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = UnknownCode;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($id => Ok(Self::$variant),)+
                    other => Err(UnknownCode { table: stringify!($name), value: other }),
                }
            }
        }
    };
}

code_table! {
    /// Why an employee received no ordinary contribution this year.
    #[derive(Default)]
    ZeroContributionReason {
        /// Ordinary participant.
        #[default]
        Normal = 0,
        /// Under 21 with at least 1000 hours: vesting credit only.
        Under21WithOver1000Hours = 1,
        /// Terminated with at least 1000 hours: gets the year vested.
        TerminatedOver1000HoursGetsYearVested = 2,
        /// Over 64 with fewer than 1000 hours: one year of vesting.
        Over64WithLessThan1000Hours1YearVesting = 3,
        /// Over 64 with fewer than 1000 hours: two years of vesting.
        Over64WithLessThan1000Hours2YearsVesting = 4,
        /// Over 64 with at least 1000 hours: three years of vesting.
        Over64WithOver1000Hours3YearsVesting = 5,
        /// 65 and over, first contribution more than 5 years ago, 100% vested.
        SixtyFiveAndOverMoreThan5Years100PercentVested = 6,
        /// Turned 64 during the year, first contribution more than 5 years ago, 100% vested.
        SixtyFourOnBirthday100PercentVested = 7,
    }
}

code_table! {
    /// Type of a ledger transaction.
    ProfitCode {
        /// Contributions, earnings and incoming forfeitures.
        IncomingContributions = 0,
        /// Partial withdrawal paid out.
        OutgoingPartialWithdrawal = 1,
        /// Forfeiture leaving the account.
        OutgoingForfeitures = 2,
        /// Direct payment.
        OutgoingDirectPayments = 3,
        /// Transfer out to a beneficiary.
        OutgoingTransferToBeneficiary = 5,
        /// QDRO transfer received as a beneficiary.
        IncomingQdroBeneficiary = 6,
        /// Earnings on the 100%-vested (ETVA) portion.
        Incoming100PercentVestedEarnings = 8,
        /// Payment out of the 100%-vested portion.
        Outgoing100PercentVestedPayment = 9,
    }
}

code_table! {
    /// Comment attached to a generated transaction record.
    CommentType {
        /// Vesting credit only.
        VOnly = 5,
        /// Earnings on the 100%-vested portion.
        OneHundredPercentEarnings = 23,
        /// Over 64, first contribution more than 5 years ago.
        SixtyFiveAndOverMoreThan5Years100PercentVested = 24,
    }
}

impl CommentType {
    /// Remark text printed for the comment.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::VOnly => "V-Only",
            Self::OneHundredPercentEarnings => "100% Earnings",
            Self::SixtyFiveAndOverMoreThan5Years100PercentVested => ">64 & >5 100%",
        }
    }
}

code_table! {
    /// Whether the employee joined during the previous plan year.
    #[derive(Default)]
    EmployeeType {
        /// Employed before the previous plan year.
        #[default]
        NotNewLastYear = 0,
        /// Hired during the previous plan year.
        NewLastYear = 1,
    }
}

code_table! {
    /// Plan enrollment status of an employee.
    #[derive(Default)]
    Enrollment {
        /// Not enrolled.
        #[default]
        NotEnrolled = 0,
        /// Old vesting plan with contributions.
        OldPlanHasContributions = 1,
        /// New vesting plan with contributions.
        NewPlanHasContributions = 2,
        /// Old vesting plan with forfeiture records.
        OldPlanHasForfeitureRecords = 3,
        /// New vesting plan with forfeiture records.
        NewPlanHasForfeitureRecords = 4,
    }
}
