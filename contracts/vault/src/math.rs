//! Fixed-point helpers. Every scale conversion in the vault goes through
//! [`mul_div`]; nothing multiplies and divides amounts inline.

use soroban_sdk::{Env, I256};

use crate::error::VaultError;

pub const BPS_DENOMINATOR: i128 = 10_000;

/// 1.0 in share-price units.
pub const PRICE_SCALE: i128 = 1_000_000_000_000_000_000; // 1e18

pub const MAX_DECIMALS_OFFSET: u32 = 18;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rounding {
    Down,
    Up,
}

/// `x * y / denominator` over a 256-bit intermediate.
///
/// Operands are non-negative amounts; a negative operand or a
/// non-positive denominator is an accounting defect, as is a quotient
/// that does not fit back into `i128`.
pub fn mul_div(
    env: &Env,
    x: i128,
    y: i128,
    denominator: i128,
    rounding: Rounding,
) -> Result<i128, VaultError> {
    if x < 0 || y < 0 || denominator <= 0 {
        return Err(VaultError::ArithmeticOverflow);
    }

    let product = I256::from_i128(env, x).mul(&I256::from_i128(env, y));
    let divisor = I256::from_i128(env, denominator);
    let mut quotient = product.div(&divisor);

    if rounding == Rounding::Up && product.rem_euclid(&divisor) != I256::from_i128(env, 0) {
        quotient = quotient.add(&I256::from_i128(env, 1));
    }

    quotient.to_i128().ok_or(VaultError::ArithmeticOverflow)
}

/// `amount * bps / 10_000`, rounded down.
pub fn apply_bps(env: &Env, amount: i128, bps: u32) -> Result<i128, VaultError> {
    mul_div(env, amount, bps as i128, BPS_DENOMINATOR, Rounding::Down)
}

/// Multiplier that lifts asset units to share units.
pub fn decimals_scale(asset_decimals: u32, share_decimals: u32) -> Result<i128, VaultError> {
    let offset = share_decimals
        .checked_sub(asset_decimals)
        .filter(|offset| *offset <= MAX_DECIMALS_OFFSET)
        .ok_or(VaultError::InvalidDecimals)?;
    10i128
        .checked_pow(offset)
        .ok_or(VaultError::InvalidDecimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_rounds_in_requested_direction() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 10, 10, 3, Rounding::Down), Ok(33));
        assert_eq!(mul_div(&env, 10, 10, 3, Rounding::Up), Ok(34));
        assert_eq!(mul_div(&env, 9, 10, 3, Rounding::Up), Ok(30));
    }

    #[test]
    fn mul_div_survives_wide_intermediate() {
        let env = Env::default();
        let big = i128::MAX / 2;
        // big * 1e18 overflows i128 but the quotient fits.
        assert_eq!(
            mul_div(&env, big, PRICE_SCALE, PRICE_SCALE, Rounding::Down),
            Ok(big)
        );
    }

    #[test]
    fn mul_div_rejects_unrepresentable_results() {
        let env = Env::default();
        assert_eq!(
            mul_div(&env, i128::MAX, 2, 1, Rounding::Down),
            Err(VaultError::ArithmeticOverflow)
        );
        assert_eq!(
            mul_div(&env, 1, 1, 0, Rounding::Down),
            Err(VaultError::ArithmeticOverflow)
        );
        assert_eq!(
            mul_div(&env, -1, 1, 1, Rounding::Down),
            Err(VaultError::ArithmeticOverflow)
        );
    }

    #[test]
    fn bps_fraction() {
        let env = Env::default();
        assert_eq!(apply_bps(&env, 10_000_0000000, 2_000), Ok(2_000_0000000));
        assert_eq!(apply_bps(&env, 3, 5_000), Ok(1));
    }

    #[test]
    fn decimals_scale_bounds() {
        assert_eq!(decimals_scale(7, 7), Ok(1));
        assert_eq!(decimals_scale(6, 18), Ok(1_000_000_000_000));
        assert_eq!(decimals_scale(18, 6), Err(VaultError::InvalidDecimals));
        assert_eq!(decimals_scale(0, 19), Err(VaultError::InvalidDecimals));
    }
}
