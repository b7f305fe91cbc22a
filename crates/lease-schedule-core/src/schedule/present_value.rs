use rust_decimal::Decimal;

use crate::payments::PaymentRecord;
use crate::time_value::{pv_of_payment_stream, round_money};
use crate::types::{Money, Precision, Rate};
use crate::LeaseScheduleResult;

/// Present value of a lease's payments at commencement.
///
/// Period 0 is the initial-measurement instant, so the payment of period `k`
/// (1-indexed) is discounted by (1+r)^k: the first payment is already one full
/// period away. A residual value is discounted from the end of period `n`.
/// The result is rounded half-up to `precision` decimal places.
pub fn present_value(
    payments: &[PaymentRecord],
    periodic_rate: Rate,
    residual_value: Option<Money>,
    precision: Precision,
) -> LeaseScheduleResult<Money> {
    let amounts: Vec<Money> = payments.iter().map(|p| p.amount).collect();
    let (mut pv, final_factor) = pv_of_payment_stream(&amounts, periodic_rate)?;

    if let Some(residual) = residual_value {
        if residual > Decimal::ZERO {
            pv += residual / final_factor;
        }
    }

    Ok(round_money(pv, precision))
}
