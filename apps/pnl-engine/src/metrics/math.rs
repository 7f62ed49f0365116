//! Statistical helpers over decimal series.
//!
//! Arithmetic is checked: a result outside `Decimal`'s range yields `None`.

use rust_decimal::Decimal;

use super::constants::{SQRT_MAX_ITERATIONS, TOLERANCE, TWO};

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = checked_sum(values.iter().copied())?;
    sum.checked_div(Decimal::from(values.len() as u64))
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Sample standard deviation (Bessel-corrected); `None` below two points.
pub fn std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let squares = values
        .iter()
        .map(|v| {
            let deviation = v.checked_sub(avg)?;
            deviation.checked_mul(deviation)
        })
        .collect::<Option<Vec<_>>>()?;
    let variance = checked_sum(squares.into_iter())?
        .checked_div(Decimal::from((values.len() - 1) as u64))?;

    sqrt_decimal(variance)
}

/// Root-mean-square of the negative values only; `None` when there are none.
pub fn downside_rms(values: &[Decimal]) -> Option<Decimal> {
    let negatives: Vec<Decimal> = values
        .iter()
        .filter(|v| **v < Decimal::ZERO)
        .copied()
        .collect();

    if negatives.is_empty() {
        return None;
    }

    let squares = negatives
        .iter()
        .map(|v| v.checked_mul(*v))
        .collect::<Option<Vec<_>>>()?;
    let square_sum = checked_sum(squares.into_iter())?;
    sqrt_decimal(square_sum.checked_div(Decimal::from(negatives.len() as u64))?)
}

/// Square root by Newton's method; `None` for negative input.
pub fn sqrt_decimal(value: Decimal) -> Option<Decimal> {
    if value < Decimal::ZERO {
        return None;
    }
    if value == Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    let mut guess = if value > Decimal::ONE {
        value / TWO
    } else {
        Decimal::ONE
    };

    for _ in 0..SQRT_MAX_ITERATIONS {
        let next = guess.checked_add(value / guess)? / TWO;
        if (next - guess).abs() < TOLERANCE {
            return Some(next);
        }
        guess = next;
    }

    Some(guess)
}
