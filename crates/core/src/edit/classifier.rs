//! Turns settled members into transaction records.

use rust_decimal::Decimal;

use super::types::TransactionRecord;
use crate::plan::{CommentType, ProfitCode, ZeroContributionReason};
use crate::settlement::MemberFinancials;

/// Change summary of an under-21 member with at least 1000 hours.
pub const UNDER_21_SUMMARY: &str = "18,19,20 > 1000";

/// Change summary of a terminated member with at least 1000 hours.
pub const TERMINATED_SUMMARY: &str = "TERM > 1000 HRS";

/// Classifies members into ledger-ready records.
pub struct TransactionClassifier;

impl TransactionClassifier {
    /// Records for every member, in member order.
    #[must_use]
    pub fn classify(members: &[MemberFinancials]) -> Vec<TransactionRecord> {
        let mut records = Vec::new();
        for member in members {
            Self::classify_member(member, &mut records);
        }
        records
    }

    /// Appends the records of one member.
    pub fn classify_member(member: &MemberFinancials, records: &mut Vec<TransactionRecord>) {
        if member.is_employee() {
            Self::employee_records(member, records);
        } else {
            Self::beneficiary_records(member, records);
        }
    }

    fn employee_records(member: &MemberFinancials, records: &mut Vec<TransactionRecord>) {
        if member.zero_contribution_reason == ZeroContributionReason::Under21WithOver1000Hours {
            let mut vesting_only = TransactionRecord::for_member(member, ProfitCode::IncomingContributions)
                .with_comment(CommentType::VOnly);
            vesting_only.record_change_summary = Some(UNDER_21_SUMMARY);
            vesting_only.zero_cont_status = Some(ZeroContributionReason::Under21WithOver1000Hours);
            keep(records, vesting_only);

            if member.all_earnings <= Decimal::ZERO {
                return;
            }
        }

        if member.etva_earnings > Decimal::ZERO {
            let mut etva = TransactionRecord::for_member(member, ProfitCode::Incoming100PercentVestedEarnings)
                .with_comment(CommentType::OneHundredPercentEarnings);
            etva.earning_amount = member.etva_earnings;
            keep(records, etva);
        }

        if member.secondary_etva_earnings > Decimal::ZERO {
            let mut etva = TransactionRecord::for_member(member, ProfitCode::Incoming100PercentVestedEarnings)
                .with_comment(CommentType::OneHundredPercentEarnings)
                .secondary();
            etva.earning_amount = member.secondary_etva_earnings;
            keep(records, etva);
        }

        if member.all_secondary_earnings > Decimal::ZERO {
            let mut secondary =
                TransactionRecord::for_member(member, ProfitCode::IncomingContributions).secondary();
            secondary.earning_amount = member.all_secondary_earnings - member.secondary_etva_earnings;
            keep(records, secondary);
        }

        let mut normal = TransactionRecord::for_member(member, ProfitCode::IncomingContributions);
        normal.contribution_amount = member.contributions;
        normal.forfeiture_amount = member.incoming_forfeitures;
        normal.earning_amount = member.all_earnings - member.etva_earnings;

        match member.zero_contribution_reason {
            ZeroContributionReason::TerminatedOver1000HoursGetsYearVested => {
                normal = normal.with_comment(CommentType::VOnly);
                normal.record_change_summary = Some(TERMINATED_SUMMARY);
                normal.zero_cont_status = Some(member.zero_contribution_reason);
                keep(records, normal);
            }
            ZeroContributionReason::SixtyFiveAndOverMoreThan5Years100PercentVested => {
                if member.contributions.is_zero()
                    && normal.earning_amount.is_zero()
                    && member.incoming_forfeitures.is_zero()
                {
                    return;
                }
                normal = normal.with_comment(CommentType::SixtyFiveAndOverMoreThan5Years100PercentVested);
                normal.zero_cont_status = Some(member.zero_contribution_reason);
                keep(records, normal);
            }
            ZeroContributionReason::SixtyFourOnBirthday100PercentVested => keep(records, normal),
            ZeroContributionReason::Normal
            | ZeroContributionReason::Under21WithOver1000Hours
            | ZeroContributionReason::Over64WithLessThan1000Hours1YearVesting
            | ZeroContributionReason::Over64WithLessThan1000Hours2YearsVesting
            | ZeroContributionReason::Over64WithOver1000Hours3YearsVesting => {
                if !member.contributions.is_zero()
                    || !member.all_earnings.is_zero()
                    || !member.incoming_forfeitures.is_zero()
                {
                    keep(records, normal);
                }
            }
        }
    }

    fn beneficiary_records(member: &MemberFinancials, records: &mut Vec<TransactionRecord>) {
        if member.all_earnings > Decimal::ZERO {
            let mut earnings = TransactionRecord::for_member(member, ProfitCode::Incoming100PercentVestedEarnings)
                .with_comment(CommentType::OneHundredPercentEarnings);
            earnings.zero_cont_status = Some(ZeroContributionReason::Normal);
            earnings.earning_amount = member.all_earnings;
            keep(records, earnings);
        }

        if member.all_secondary_earnings > Decimal::ZERO {
            let mut earnings = TransactionRecord::for_member(member, ProfitCode::Incoming100PercentVestedEarnings)
                .with_comment(CommentType::OneHundredPercentEarnings)
                .secondary();
            earnings.zero_cont_status = Some(ZeroContributionReason::Normal);
            earnings.earning_amount = member.all_secondary_earnings;
            keep(records, earnings);
        }
    }
}

/// Appends a record unless it is empty, defaulting its change summary to the remark.
fn keep(records: &mut Vec<TransactionRecord>, mut record: TransactionRecord) {
    if record.is_empty() {
        return;
    }

    if record.record_change_summary.is_none() {
        record.record_change_summary = record.remark;
    }
    record.displayed_zero_cont_status = record.zero_cont_status.map_or(0, ZeroContributionReason::id);
    records.push(record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::types::SECONDARY_YEAR_EXTENSION;
    use crate::settlement::MemberRoles;
    use crate::testing::employee_member;
    use profitshare_shared::{BadgeNumber, Psn, Ssn};
    use rust_decimal_macros::dec;

    fn beneficiary(all_earnings: Decimal, all_secondary_earnings: Decimal) -> MemberFinancials {
        MemberFinancials {
            roles: MemberRoles::Beneficiary,
            badge_number: BadgeNumber(700_123),
            psn: Psn(7_001_231_000),
            ssn: Ssn(222_000_001),
            name: "ALPHA, ANN".to_string(),
            all_earnings,
            all_secondary_earnings,
            ..MemberFinancials::default()
        }
    }

    #[test]
    fn test_under_21_without_earnings_gets_vesting_record_only() {
        let mut member = employee_member(700_001, 111_000_001);
        member.zero_contribution_reason = ZeroContributionReason::Under21WithOver1000Hours;
        member.contributions = dec!(0);

        let records = TransactionClassifier::classify(std::slice::from_ref(&member));
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.code, ProfitCode::IncomingContributions);
        assert_eq!(record.remark, Some("V-Only"));
        assert_eq!(record.comment_type, Some(CommentType::VOnly));
        assert_eq!(record.record_change_summary, Some("18,19,20 > 1000"));
        assert_eq!(record.zero_cont_status, Some(ZeroContributionReason::Under21WithOver1000Hours));
        assert_eq!(record.displayed_zero_cont_status, 1);
        assert_eq!(record.contribution_amount, Decimal::ZERO);
        assert_eq!(record.earning_amount, Decimal::ZERO);
        assert_eq!(record.forfeiture_amount, Decimal::ZERO);
    }

    #[test]
    fn test_under_21_with_earnings_also_gets_normal_record() {
        let mut member = employee_member(700_002, 111_000_002);
        member.zero_contribution_reason = ZeroContributionReason::Under21WithOver1000Hours;
        member.all_earnings = dec!(12.50);

        let records = TransactionClassifier::classify(std::slice::from_ref(&member));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].remark, Some("V-Only"));
        assert_eq!(records[1].earning_amount, dec!(12.50));
        assert_eq!(records[1].remark, None);
        assert_eq!(records[1].zero_cont_status, None);
    }

    #[test]
    fn test_beneficiary_primary_earnings_only() {
        let records = TransactionClassifier::classify(&[beneficiary(dec!(250.00), Decimal::ZERO)]);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.code, ProfitCode::Incoming100PercentVestedEarnings);
        assert_eq!(record.earning_amount, dec!(250.00));
        assert_eq!(record.year_extension, 0);
        assert_eq!(record.remark, Some("100% Earnings"));
        assert_eq!(record.record_change_summary, Some("100% Earnings"));
        assert!(!record.is_employee);
    }

    #[test]
    fn test_beneficiary_secondary_earnings() {
        let records = TransactionClassifier::classify(&[beneficiary(dec!(250.00), dec!(12.00))]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].year_extension, SECONDARY_YEAR_EXTENSION);
        assert_eq!(records[1].earning_amount, dec!(12.00));
        assert_eq!(records[1].code, ProfitCode::Incoming100PercentVestedEarnings);
    }

    #[test]
    fn test_etva_earnings_split_out_of_normal_record() {
        let mut member = employee_member(700_003, 111_000_003);
        member.contributions = dec!(300);
        member.all_earnings = dec!(150);
        member.etva_earnings = dec!(50);

        let records = TransactionClassifier::classify(std::slice::from_ref(&member));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, ProfitCode::Incoming100PercentVestedEarnings);
        assert_eq!(records[0].earning_amount, dec!(50));
        assert_eq!(records[0].comment_type, Some(CommentType::OneHundredPercentEarnings));
        assert_eq!(records[1].code, ProfitCode::IncomingContributions);
        assert_eq!(records[1].earning_amount, dec!(100));
        assert_eq!(records[1].contribution_amount, dec!(300));
    }

    #[test]
    fn test_secondary_earnings_records() {
        let mut member = employee_member(700_004, 111_000_004);
        member.all_secondary_earnings = dec!(30);
        member.secondary_etva_earnings = dec!(10);

        let records = TransactionClassifier::classify(std::slice::from_ref(&member));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, ProfitCode::Incoming100PercentVestedEarnings);
        assert_eq!(records[0].year_extension, SECONDARY_YEAR_EXTENSION);
        assert_eq!(records[0].earning_amount, dec!(10));
        assert_eq!(records[1].code, ProfitCode::IncomingContributions);
        assert_eq!(records[1].year_extension, SECONDARY_YEAR_EXTENSION);
        assert_eq!(records[1].earning_amount, dec!(20));
        assert_eq!(records[1].record_change_summary, None);
    }

    #[test]
    fn test_terminated_always_gets_vesting_record() {
        let mut member = employee_member(700_005, 111_000_005);
        member.zero_contribution_reason = ZeroContributionReason::TerminatedOver1000HoursGetsYearVested;

        let records = TransactionClassifier::classify(std::slice::from_ref(&member));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].remark, Some("V-Only"));
        assert_eq!(records[0].record_change_summary, Some("TERM > 1000 HRS"));
        assert_eq!(records[0].displayed_zero_cont_status, 2);
    }

    #[test]
    fn test_sixty_five_and_over() {
        let mut member = employee_member(700_006, 111_000_006);
        member.zero_contribution_reason =
            ZeroContributionReason::SixtyFiveAndOverMoreThan5Years100PercentVested;
        member.all_earnings = dec!(40);
        member.etva_earnings = dec!(40);

        // only ETVA earnings: no normal record
        let records = TransactionClassifier::classify(std::slice::from_ref(&member));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, ProfitCode::Incoming100PercentVestedEarnings);

        member.all_earnings = dec!(60);
        let records = TransactionClassifier::classify(std::slice::from_ref(&member));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].remark, Some(">64 & >5 100%"));
        assert_eq!(records[1].comment_type.map(CommentType::id), Some(24));
        assert_eq!(records[1].earning_amount, dec!(20));
    }

    #[test]
    fn test_sixty_four_birthday_keeps_status_unset() {
        let mut member = employee_member(700_007, 111_000_007);
        member.zero_contribution_reason = ZeroContributionReason::SixtyFourOnBirthday100PercentVested;
        member.contributions = dec!(10);

        let records = TransactionClassifier::classify(std::slice::from_ref(&member));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].zero_cont_status, None);
        assert_eq!(records[0].displayed_zero_cont_status, 0);

        // nothing to post and no remark: dropped
        member.contributions = Decimal::ZERO;
        assert!(TransactionClassifier::classify(std::slice::from_ref(&member)).is_empty());
    }

    #[test]
    fn test_idle_employee_has_no_records() {
        let member = employee_member(700_008, 111_000_008);
        assert!(TransactionClassifier::classify(&[member]).is_empty());
    }
}
