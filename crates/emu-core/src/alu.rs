//! Shared 8-bit ALU primitives.
//!
//! Each primitive returns an [`AluResult`] carrying the value and every flag
//! it can derive. CPUs copy across the flags their architecture defines.
//! Zero and negative always come from [`AluResult::pass`] except where a
//! decimal quirk says otherwise.

/// Result of an ALU operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AluResult {
    pub value: u8,
    /// Carry out of bit 7. For subtraction this is a borrow.
    pub carry: bool,
    pub overflow: bool,
    /// Carry out of bit 3. For subtraction this is a borrow from bit 4.
    pub half_carry: bool,
    pub zero: bool,
    pub negative: bool,
}

impl AluResult {
    /// Pass a value through, deriving Z and N and clearing everything else.
    #[must_use]
    pub const fn pass(value: u8) -> Self {
        Self {
            value,
            carry: false,
            overflow: false,
            half_carry: false,
            zero: value == 0,
            negative: value & 0x80 != 0,
        }
    }

    /// True when the value has an even number of set bits.
    #[must_use]
    pub const fn parity(self) -> bool {
        self.value.count_ones() % 2 == 0
    }

    const fn with_carry(mut self, carry: bool) -> Self {
        self.carry = carry;
        self
    }

    const fn with_half_carry(mut self, half_carry: bool) -> Self {
        self.half_carry = half_carry;
        self
    }
}

/// Decimal-mode behaviour of a particular chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalQuirks {
    /// NMOS 6502: Z from the binary sum, N and V from the half-corrected
    /// intermediate; subtraction takes every flag from the binary difference.
    Nmos,
    /// 65C02: N and Z from the decimal result, V from the intermediate.
    Cmos,
}

/// `a + b + carry`.
#[must_use]
pub fn add(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let sum = u16::from(a) + u16::from(b) + u16::from(c);
    let value = sum as u8;
    AluResult {
        overflow: !(a ^ b) & (a ^ value) & 0x80 != 0,
        ..AluResult::pass(value)
    }
    .with_carry(sum > 0xFF)
    .with_half_carry((a & 0x0F) + (b & 0x0F) + c > 0x0F)
}

/// `a - b - borrow`. `carry` in the result is the borrow out.
#[must_use]
pub fn subtract(a: u8, b: u8, borrow: bool) -> AluResult {
    let c = u8::from(borrow);
    let difference = i16::from(a) - i16::from(b) - i16::from(c);
    let value = difference as u8;
    AluResult {
        overflow: (a ^ b) & (a ^ value) & 0x80 != 0,
        ..AluResult::pass(value)
    }
    .with_carry(difference < 0)
    .with_half_carry((a & 0x0F) < (b & 0x0F) + c)
}

/// `a - b` with the result discarded by the caller; carry is the borrow.
#[must_use]
pub fn compare(a: u8, b: u8) -> AluResult {
    subtract(a, b, false)
}

#[must_use]
pub fn increment(value: u8) -> AluResult {
    let result = value.wrapping_add(1);
    AluResult {
        overflow: value == 0x7F,
        ..AluResult::pass(result)
    }
    .with_half_carry(value & 0x0F == 0x0F)
}

#[must_use]
pub fn decrement(value: u8) -> AluResult {
    let result = value.wrapping_sub(1);
    AluResult {
        overflow: value == 0x80,
        ..AluResult::pass(result)
    }
    .with_half_carry(value & 0x0F == 0)
}

/// Shift left; bit 7 goes to carry, bit 0 becomes 0.
#[must_use]
pub fn shift_left(value: u8) -> AluResult {
    AluResult::pass(value << 1).with_carry(value & 0x80 != 0)
}

/// Shift right; bit 0 goes to carry, bit 7 becomes 0.
#[must_use]
pub fn shift_right(value: u8) -> AluResult {
    AluResult::pass(value >> 1).with_carry(value & 0x01 != 0)
}

/// Rotate left through `carry`.
#[must_use]
pub fn rotate_left(value: u8, carry: bool) -> AluResult {
    AluResult::pass((value << 1) | u8::from(carry)).with_carry(value & 0x80 != 0)
}

/// Rotate right through `carry`.
#[must_use]
pub fn rotate_right(value: u8, carry: bool) -> AluResult {
    AluResult::pass((value >> 1) | (u8::from(carry) << 7)).with_carry(value & 0x01 != 0)
}

#[must_use]
pub fn and(a: u8, b: u8) -> AluResult {
    AluResult::pass(a & b)
}

#[must_use]
pub fn or(a: u8, b: u8) -> AluResult {
    AluResult::pass(a | b)
}

#[must_use]
pub fn xor(a: u8, b: u8) -> AluResult {
    AluResult::pass(a ^ b)
}

/// Decimal `a + b + carry`, treating each nibble as one BCD digit.
#[must_use]
pub fn add_decimal(a: u8, b: u8, carry: bool, quirks: DecimalQuirks) -> AluResult {
    let c = u16::from(carry);
    let (a16, b16) = (u16::from(a), u16::from(b));

    let mut lo = (a16 & 0x0F) + (b16 & 0x0F) + c;
    if lo > 0x09 {
        lo = ((lo + 0x06) & 0x0F) + 0x10;
    }
    let mut sum = (a16 & 0xF0) + (b16 & 0xF0) + lo;
    let intermediate = sum as u8;
    let overflow = !(a ^ b) & (a ^ intermediate) & 0x80 != 0;
    if sum > 0x9F {
        sum += 0x60;
    }
    let value = sum as u8;

    let flags = match quirks {
        DecimalQuirks::Nmos => AluResult {
            zero: a.wrapping_add(b).wrapping_add(carry.into()) == 0,
            negative: intermediate & 0x80 != 0,
            ..AluResult::pass(value)
        },
        DecimalQuirks::Cmos => AluResult::pass(value),
    };
    AluResult { overflow, ..flags }
        .with_carry(sum > 0xFF)
        .with_half_carry((a & 0x0F) + (b & 0x0F) + u8::from(carry) > 0x0F)
}

/// Decimal `a - b - borrow`. `carry` in the result is the borrow out.
#[must_use]
pub fn subtract_decimal(a: u8, b: u8, borrow: bool, quirks: DecimalQuirks) -> AluResult {
    let binary = subtract(a, b, borrow);
    let c = i16::from(borrow);
    let (a16, b16) = (i16::from(a), i16::from(b));

    let value = match quirks {
        DecimalQuirks::Nmos => {
            let mut lo = (a16 & 0x0F) - (b16 & 0x0F) - c;
            if lo < 0 {
                lo = ((lo - 0x06) & 0x0F) - 0x10;
            }
            let mut difference = (a16 & 0xF0) - (b16 & 0xF0) + lo;
            if difference < 0 {
                difference -= 0x60;
            }
            difference as u8
        }
        DecimalQuirks::Cmos => {
            let lo = (a16 & 0x0F) - (b16 & 0x0F) - c;
            let mut difference = a16 - b16 - c;
            if difference < 0 {
                difference -= 0x60;
            }
            if lo < 0 {
                difference -= 0x06;
            }
            difference as u8
        }
    };

    match quirks {
        DecimalQuirks::Nmos => AluResult { value, ..binary },
        DecimalQuirks::Cmos => AluResult {
            carry: binary.carry,
            overflow: binary.overflow,
            half_carry: binary.half_carry,
            ..AluResult::pass(value)
        },
    }
}

/// Intel decimal adjust (DAA). `half_carry`/`carry` are the AC/CY flags
/// left by the previous addition.
#[must_use]
pub fn decimal_adjust(a: u8, half_carry: bool, carry: bool) -> AluResult {
    let mut correction = 0u8;
    let mut carry_out = carry;
    if half_carry || a & 0x0F > 0x09 {
        correction |= 0x06;
    }
    if carry || a > 0x99 {
        correction |= 0x60;
        carry_out = true;
    }
    add(a, correction, false).with_carry(carry_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn add_derives_every_flag() {
        let r = add(0x3A, 0x7C, true);
        assert_eq!(r.value, 0xB7);
        assert!(!r.zero);
        assert!(r.half_carry);
        assert!(r.overflow);
        assert!(r.negative);
        assert!(!r.carry);
    }

    #[test]
    fn subtract_reports_borrow() {
        let r = subtract(0x00, 0x01, false);
        assert_eq!(r.value, 0xFF);
        assert!(r.carry);
        assert!(r.half_carry);
        assert!(!r.overflow);

        let r = subtract(0x80, 0x01, false);
        assert_eq!(r.value, 0x7F);
        assert!(r.overflow);
        assert!(!r.carry);
    }

    #[test]
    fn rotates_move_carry_through() {
        let r = rotate_left(0x80, true);
        assert_eq!(r.value, 0x01);
        assert!(r.carry);
        let r = rotate_right(0x01, false);
        assert_eq!(r.value, 0x00);
        assert!(r.carry);
        assert!(r.zero);
    }

    #[rstest]
    #[case(0x58, 0x46, false, 0x04, true)]
    #[case(0x12, 0x34, false, 0x46, false)]
    #[case(0x15, 0x26, false, 0x41, false)]
    #[case(0x81, 0x92, false, 0x73, true)]
    #[case(0x99, 0x00, true, 0x00, true)]
    #[case(0x09, 0x01, false, 0x10, false)]
    fn decimal_add_pairs(
        #[case] a: u8,
        #[case] b: u8,
        #[case] carry: bool,
        #[case] expected: u8,
        #[case] carry_out: bool,
    ) {
        for quirks in [DecimalQuirks::Nmos, DecimalQuirks::Cmos] {
            let r = add_decimal(a, b, carry, quirks);
            assert_eq!(r.value, expected, "{a:02X}+{b:02X} ({quirks:?})");
            assert_eq!(r.carry, carry_out, "{a:02X}+{b:02X} ({quirks:?})");
        }
    }

    #[rstest]
    #[case(0x46, 0x12, false, 0x34, false)]
    #[case(0x40, 0x13, false, 0x27, false)]
    #[case(0x32, 0x02, true, 0x29, false)]
    #[case(0x12, 0x21, false, 0x91, true)]
    #[case(0x21, 0x34, false, 0x87, true)]
    #[case(0x00, 0x00, true, 0x99, true)]
    fn decimal_subtract_pairs(
        #[case] a: u8,
        #[case] b: u8,
        #[case] borrow: bool,
        #[case] expected: u8,
        #[case] borrow_out: bool,
    ) {
        for quirks in [DecimalQuirks::Nmos, DecimalQuirks::Cmos] {
            let r = subtract_decimal(a, b, borrow, quirks);
            assert_eq!(r.value, expected, "{a:02X}-{b:02X} ({quirks:?})");
            assert_eq!(r.carry, borrow_out, "{a:02X}-{b:02X} ({quirks:?})");
        }
    }

    #[test]
    fn nmos_decimal_zero_comes_from_binary_sum() {
        // 99 + 01 = 00 decimal, but the binary sum is $9A
        let nmos = add_decimal(0x99, 0x01, false, DecimalQuirks::Nmos);
        assert_eq!(nmos.value, 0x00);
        assert!(!nmos.zero);
        let cmos = add_decimal(0x99, 0x01, false, DecimalQuirks::Cmos);
        assert!(cmos.zero);
        assert!(!cmos.negative);
    }

    #[test]
    fn decimal_overflow_differs_from_binary() {
        // 79 + 00 + 1: intermediate $80 flips sign; binary $7A does not
        let r = add_decimal(0x79, 0x00, true, DecimalQuirks::Nmos);
        assert_eq!(r.value, 0x80);
        assert!(r.overflow);
        assert!(!add(0x79, 0x00, true).overflow);
    }

    #[rstest]
    #[case(0x9B, false, false, 0x01, true)]
    #[case(0x15, true, false, 0x1B, false)]
    #[case(0x42, false, true, 0xA2, true)]
    #[case(0x00, false, false, 0x00, false)]
    fn decimal_adjust_table(
        #[case] a: u8,
        #[case] half_carry: bool,
        #[case] carry: bool,
        #[case] expected: u8,
        #[case] carry_out: bool,
    ) {
        let r = decimal_adjust(a, half_carry, carry);
        assert_eq!(r.value, expected);
        assert_eq!(r.carry, carry_out);
    }

    proptest! {
        #[test]
        fn add_matches_integer_arithmetic(a: u8, b: u8, carry: bool) {
            let r = add(a, b, carry);
            let wide = u16::from(a) + u16::from(b) + u16::from(carry);
            prop_assert_eq!(r.value, wide as u8);
            prop_assert_eq!(r.carry, wide > 0xFF);
            prop_assert_eq!(r.zero, r.value == 0);
            prop_assert_eq!(r.negative, r.value >= 0x80);
            let signed = i16::from(a as i8) + i16::from(b as i8) + i16::from(carry);
            prop_assert_eq!(r.overflow, !(-128..=127).contains(&signed));
        }

        #[test]
        fn subtract_matches_integer_arithmetic(a: u8, b: u8, borrow: bool) {
            let r = subtract(a, b, borrow);
            let wide = i16::from(a) - i16::from(b) - i16::from(borrow);
            prop_assert_eq!(r.value, wide as u8);
            prop_assert_eq!(r.carry, wide < 0);
            let signed = i16::from(a as i8) - i16::from(b as i8) - i16::from(borrow);
            prop_assert_eq!(r.overflow, !(-128..=127).contains(&signed));
        }

        #[test]
        fn half_carry_ignores_high_nibbles(a: u8, b: u8, carry: bool) {
            let low = add(a & 0x0F, b & 0x0F, carry);
            prop_assert_eq!(add(a, b, carry).half_carry, low.value > 0x0F);
        }

        #[test]
        fn valid_bcd_addition_is_decimal(x in 0u8..100, y in 0u8..100, carry in any::<bool>()) {
            let bcd = |n: u8| ((n / 10) << 4) | (n % 10);
            let total = u16::from(x) + u16::from(y) + u16::from(carry);
            let r = add_decimal(bcd(x), bcd(y), carry, DecimalQuirks::Cmos);
            prop_assert_eq!(r.value, bcd((total % 100) as u8));
            prop_assert_eq!(r.carry, total > 99);
        }
    }
}
