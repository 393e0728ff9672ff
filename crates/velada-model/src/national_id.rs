use crate::fields::ParseError;
use serde::{Deserialize, Serialize};

pub const NATIONAL_ID_LEN: usize = 10;
pub const REGION_CODE_MIN: u32 = 1;
pub const REGION_CODE_MAX: u32 = 24;

/// Ecuadorian cedula: ten ASCII digits whose first two encode a
/// province and whose last digit is a checksum over the first nine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct NationalId(String);

impl NationalId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty("national id"));
        }
        if input.len() != NATIONAL_ID_LEN || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat(
                "national id must be exactly 10 digits",
            ));
        }
        let digits: Vec<u32> = input.bytes().map(|b| u32::from(b - b'0')).collect();
        let region = digits[0] * 10 + digits[1];
        if !(REGION_CODE_MIN..=REGION_CODE_MAX).contains(&region) {
            return Err(ParseError::InvalidFormat(
                "national id region code must be between 01 and 24",
            ));
        }
        if check_digit(&digits[..9]) != digits[9] {
            return Err(ParseError::InvalidFormat(
                "national id check digit does not match",
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Digits at even 0-based positions are doubled, subtracting nine when
/// the double exceeds nine; odd positions are summed as-is. The check
/// digit lifts the total to the next multiple of ten, and is zero when
/// the total already is one.
fn check_digit(first_nine: &[u32]) -> u32 {
    let mut total = 0;
    for (position, &digit) in first_nine.iter().enumerate() {
        if position % 2 == 0 {
            let doubled = digit * 2;
            total += if doubled > 9 { doubled - 9 } else { doubled };
        } else {
            total += digit;
        }
    }
    total.div_ceil(10) * 10 - total
}
