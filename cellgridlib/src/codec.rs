//! The `codec` module converts between integer cell values and their text form in the
//! base, width, and signedness of the current [`ViewSettings`].
//!
//! Formatting rules:
//! - Hex is zero-padded to `2 * width` digits, octal to the per-width digit table.
//!   Signed negative values get a leading `-` followed by the absolute value.
//! - Decimal is unpadded and ignores the `signed` flag: a negative value renders as its
//!   32-bit unsigned representation (`-1` becomes `4294967295`). Values formatted this way
//!   do not parse back to the same negative number, only to the same stored bits.
//!
//! Parsing never fails. It reads an optional sign and then digits of the base until the
//! first invalid character, using positional accumulation (`n * base + digit`).

use crate::settings::{Base, ViewSettings};
use std::ops::RangeInclusive;

/// Octal digit count per element width (1, 2, 3, 4 bytes)
const OCT_DIGITS: [usize; 4] = [3, 6, 8, 11];
/// Maximum unsigned decimal digit count per element width
const DEC_DIGITS: [usize; 4] = [3, 5, 8, 10];
/// Decimal digits of the largest 32-bit unsigned value (negative values render as those)
const DEC_DIGITS_NEGATIVE: usize = 10;

/// Format the cell value as text according to the view settings.
///
/// # Example
/// ```
/// use cellgridlib::{Base, ElementWidth, ViewSettings, codec};
///
/// let settings = ViewSettings::hex_default().with_width(ElementWidth::Byte);
/// assert_eq!(codec::format(0x1A, &settings), "1A");
///
/// let signed = settings.with_signed(true);
/// assert_eq!(codec::format(-2, &signed), "-02");
/// assert_eq!(codec::format(-2, &signed.with_base(Base::Decimal)), "4294967294");
/// ```
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn format(value: i64, settings: &ViewSettings) -> String {
    if settings.base == Base::Decimal {
        return format_decimal(value);
    }

    // Sign prefix only for signed views, unsigned views wrap into the element width
    let (sign, magnitude) = if settings.signed && value < 0 {
        ("-", value.unsigned_abs())
    } else if value < 0 {
        ("", value as u64 & width_mask(settings))
    } else {
        ("", value as u64)
    };

    let digits = digit_count(settings);
    if settings.base == Base::Octal {
        format!("{sign}{magnitude:0digits$o}")
    } else {
        format!("{sign}{magnitude:0digits$X}")
    }
}

#[allow(clippy::cast_sign_loss)]
fn format_decimal(value: i64) -> String {
    // Negative 32-bit values show their two's complement bits as an unsigned number.
    // Wider values (spreadsheet totals) print in full.
    match i32::try_from(value) {
        Ok(narrow) if narrow < 0 => (narrow as u32).to_string(),
        _ => value.to_string(),
    }
}

/// Padded digit count for octal and hex (no sign)
const fn digit_count(settings: &ViewSettings) -> usize {
    match settings.base {
        Base::Octal => OCT_DIGITS[settings.width.index()],
        Base::Decimal => 0,
        Base::Hex => settings.width.bytes() * 2,
    }
}

const fn width_mask(settings: &ViewSettings) -> u64 {
    (1u64 << (settings.width.bytes() * 8)) - 1
}

/// Display width in characters of the longest text [`format`] can produce for a cell
/// under the view settings. Used to size columns and to cap the overlay input.
///
/// # Example
/// ```
/// use cellgridlib::{Base, ElementWidth, ViewSettings, codec};
///
/// let settings = ViewSettings::hex_default().with_width(ElementWidth::Long);
/// assert_eq!(codec::col_chars(&settings), 8);
/// assert_eq!(codec::col_chars(&settings.with_signed(true)), 9);
/// assert_eq!(codec::col_chars(&settings.with_base(Base::Octal)), 11);
/// ```
#[must_use]
pub const fn col_chars(settings: &ViewSettings) -> usize {
    match settings.base {
        Base::Decimal => {
            if settings.signed {
                DEC_DIGITS_NEGATIVE
            } else {
                DEC_DIGITS[settings.width.index()]
            }
        }
        Base::Octal | Base::Hex => digit_count(settings) + if settings.signed { 1 } else { 0 },
    }
}

/// Parse user-typed text into an integer in the given base.
///
/// Leading whitespace and one `+` or `-` sign are accepted. Digits are case-insensitive
/// and parsing stops at the first character that is not a digit of the base.
/// An empty or invalid prefix yields 0.
///
/// # Example
/// ```
/// use cellgridlib::{Base, codec};
///
/// assert_eq!(codec::parse("2b", Base::Hex), 0x2B);
/// assert_eq!(codec::parse("81", Base::Hex), 129);
/// assert_eq!(codec::parse("-17xyz", Base::Decimal), -17);
/// assert_eq!(codec::parse("zz", Base::Octal), 0);
/// ```
#[must_use]
pub fn parse(text: &str, base: Base) -> i64 {
    let radix = base.radix();
    let mut chars = text.trim_start().chars().peekable();

    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let mut n: i64 = 0;
    for ch in chars {
        let Some(digit) = ch.to_digit(radix) else {
            break;
        };
        n = n
            .wrapping_mul(i64::from(radix))
            .wrapping_add(i64::from(digit));
    }

    if negative { n.wrapping_neg() } else { n }
}

/// Check if a typed character starts an edit of the focused cell
#[must_use]
pub fn is_edit_start_char(ch: char, base: Base) -> bool {
    ch == '+' || ch == '-' || ch.to_digit(base.radix()).is_some()
}

/// Range of values representable by one cell under the view settings
#[must_use]
pub fn value_range(settings: &ViewSettings) -> RangeInclusive<i64> {
    let bits = settings.width.bytes() * 8;
    if settings.signed {
        let half = 1i64 << (bits - 1);
        -half..=half - 1
    } else {
        0..=(1i64 << bits) - 1
    }
}
