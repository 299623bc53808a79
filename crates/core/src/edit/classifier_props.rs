//! Property-based tests for TransactionClassifier.
//!
//! Feature: edit-report
//! - Property 1: Empty records never reach the output

use proptest::prelude::*;
use profitshare_shared::{BadgeNumber, Psn, Ssn};
use rust_decimal::Decimal;

use super::classifier::TransactionClassifier;
use crate::plan::ZeroContributionReason;
use crate::settlement::{MemberFinancials, MemberRoles};

/// Strategy for amounts that are often exactly zero (-100.00 to 1,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        (-10_000i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2)),
    ]
}

fn roles() -> impl Strategy<Value = MemberRoles> {
    prop_oneof![
        Just(MemberRoles::Employee),
        Just(MemberRoles::Beneficiary),
        Just(MemberRoles::EmployeeAndBeneficiary),
    ]
}

fn reason() -> impl Strategy<Value = ZeroContributionReason> {
    prop::sample::select(ZeroContributionReason::ALL.to_vec())
}

prop_compose! {
    fn member()(
        roles in roles(),
        reason in reason(),
        contributions in amount(),
        incoming_forfeitures in amount(),
        all_earnings in amount(),
        etva_earnings in amount(),
        all_secondary_earnings in amount(),
        secondary_etva_earnings in amount(),
    ) -> MemberFinancials {
        MemberFinancials {
            roles,
            badge_number: BadgeNumber(700_123),
            psn: Psn(700_123),
            ssn: Ssn(123_456_789),
            name: "MEMBER".to_string(),
            zero_contribution_reason: reason,
            contributions,
            incoming_forfeitures,
            all_earnings,
            etva_earnings,
            all_secondary_earnings,
            secondary_etva_earnings,
            ..MemberFinancials::default()
        }
    }
}

proptest! {
    /// Feature: edit-report, Property 1: Empty records never reach the output
    /// No emitted record has all amounts zero and no remark, and every record with a
    /// remark carries a change summary.
    #[test]
    fn prop_empty_records_dropped(members in prop::collection::vec(member(), 0..20)) {
        let records = TransactionClassifier::classify(&members);

        for record in &records {
            prop_assert!(
                !(record.contribution_amount.is_zero()
                    && record.earning_amount.is_zero()
                    && record.forfeiture_amount.is_zero()
                    && record.remark.is_none())
            );
            if record.remark.is_some() {
                prop_assert!(record.record_change_summary.is_some());
            }
        }
    }

    /// Feature: edit-report, Property 4: Idempotence
    /// Classifying the same members twice gives the same records.
    #[test]
    fn prop_classification_is_deterministic(members in prop::collection::vec(member(), 0..20)) {
        prop_assert_eq!(
            TransactionClassifier::classify(&members),
            TransactionClassifier::classify(&members)
        );
    }

    /// Beneficiary records are always 100%-vested earnings.
    #[test]
    fn prop_beneficiary_records_are_vested_earnings(
        member in member().prop_map(|mut m| {
            m.roles = MemberRoles::Beneficiary;
            m
        })
    ) {
        for record in TransactionClassifier::classify(std::slice::from_ref(&member)) {
            prop_assert!(!record.is_employee);
            prop_assert_eq!(record.code, crate::plan::ProfitCode::Incoming100PercentVestedEarnings);
            prop_assert!(record.earning_amount > Decimal::ZERO);
        }
    }
}
