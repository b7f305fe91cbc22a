use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::LeaseScheduleError;
use crate::types::{Money, Precision, Rate};
use crate::LeaseScheduleResult;

/// Round half-up (away from zero on the midpoint) to `dp` decimal places.
pub fn round_money(value: Money, dp: Precision) -> Money {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Present value of a payment stream where payment `k` (1-indexed) is
/// discounted by (1+r)^k. Returns the unrounded PV together with the final
/// discount factor (1+r)^n so callers can discount an end-of-term amount.
pub fn pv_of_payment_stream(payments: &[Money], rate: Rate) -> LeaseScheduleResult<(Money, Decimal)> {
    if rate <= Decimal::NEGATIVE_ONE {
        return Err(LeaseScheduleError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    let mut pv = Decimal::ZERO;
    let mut discount_factor = Decimal::ONE;
    let one_plus_r = Decimal::ONE + rate;

    for (k, payment) in payments.iter().enumerate() {
        discount_factor *= one_plus_r;
        if discount_factor.is_zero() {
            return Err(LeaseScheduleError::DivisionByZero {
                context: format!("discount factor at period {}", k + 1),
            });
        }
        pv += *payment / discount_factor;
    }

    Ok((pv, discount_factor))
}
