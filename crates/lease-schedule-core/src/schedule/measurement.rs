use serde::{Deserialize, Serialize};

use crate::lease::LeaseTerms;
use crate::types::Money;

/// Initial ROU asset and lease liability at commencement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialMeasurement {
    pub lease_liability: Money,
    pub rou_asset: Money,
}

/// Lease liability = PV of payments.
/// ROU asset = liability + initial direct costs + prepaid rent - incentives.
///
/// `present_value` is already rounded; the adjustments are taken as stored.
pub fn measure_initial(present_value: Money, terms: &LeaseTerms) -> InitialMeasurement {
    let rou_asset = present_value + terms.initial_direct_costs + terms.prepaid_rent
        - terms.lease_incentives;
    InitialMeasurement {
        lease_liability: present_value,
        rou_asset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lease::LeaseClassification;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn terms(idc: Money, prepaid: Money, incentives: Money) -> LeaseTerms {
        LeaseTerms {
            commencement_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            classification: LeaseClassification::Operating,
            incremental_borrowing_rate: dec!(5),
            discount_rate: None,
            initial_direct_costs: idc,
            prepaid_rent: prepaid,
            lease_incentives: incentives,
            residual_value: Decimal::ZERO,
        }
    }

    #[test]
    fn test_no_adjustments_rou_equals_liability() {
        let m = measure_initial(dec!(11618.93), &terms(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        assert_eq!(m.rou_asset, m.lease_liability);
    }

    #[test]
    fn test_adjustments_flow_into_rou_only() {
        let m = measure_initial(dec!(10000), &terms(dec!(500), dec!(250), dec!(1000)));
        assert_eq!(m.lease_liability, dec!(10000));
        assert_eq!(m.rou_asset, dec!(9750));
    }
}
