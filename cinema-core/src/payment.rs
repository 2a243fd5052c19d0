use serde::{Deserialize, Serialize};
use cinema_shared::Masked;

pub const MIN_CARD_DIGITS: usize = 16;
pub const MIN_CVV_DIGITS: usize = 3;

/// Card details as typed into the checkout form. Nothing is charged; the
/// values are only checked for shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    #[serde(default)]
    pub card_name: String,
    #[serde(default)]
    pub card_number: Masked<String>,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: Masked<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Please fill in all payment details")]
    MissingFields,

    #[error("Please enter a valid card number")]
    InvalidCardNumber,

    #[error("Please enter a valid CVV")]
    InvalidCvv,
}

impl PaymentForm {
    /// Apply the input masks of the form fields: card number in groups of
    /// four, expiry as `MM/YY`, CVV digits only.
    pub fn normalized(&self) -> Self {
        Self {
            card_name: self.card_name.clone(),
            card_number: Masked(format_card_number(self.card_number.expose())),
            expiry_date: format_expiry(&self.expiry_date),
            cvv: Masked(digits_only(self.cvv.expose())),
        }
    }

    /// Shape checks only. No Luhn, no expiry-in-the-future check.
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.card_name.is_empty()
            || self.card_number.expose().is_empty()
            || self.expiry_date.is_empty()
            || self.cvv.expose().is_empty()
        {
            return Err(PaymentError::MissingFields);
        }

        let compact: String = self
            .card_number
            .expose()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if compact.chars().count() < MIN_CARD_DIGITS {
            return Err(PaymentError::InvalidCardNumber);
        }

        if self.cvv.expose().chars().count() < MIN_CVV_DIGITS {
            return Err(PaymentError::InvalidCvv);
        }

        Ok(())
    }
}

pub fn format_card_number(raw: &str) -> String {
    let compact: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_expiry(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() >= 2 {
        let month = &digits[..2];
        let year: String = digits[2..].chars().take(2).collect();
        format!("{}/{}", month, year)
    } else {
        digits
    }
}

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, number: &str, expiry: &str, cvv: &str) -> PaymentForm {
        PaymentForm {
            card_name: name.to_string(),
            card_number: Masked::from(number),
            expiry_date: expiry.to_string(),
            cvv: Masked::from(cvv),
        }
    }

    #[test]
    fn test_valid_form() {
        let f = form("Jane Doe", "4111 1111 1111 1111", "12/29", "123");
        assert_eq!(f.validate(), Ok(()));
    }

    #[test]
    fn test_missing_field_blocks() {
        let f = form("", "4111 1111 1111 1111", "12/29", "123");
        assert_eq!(f.validate(), Err(PaymentError::MissingFields));
    }

    #[test]
    fn test_short_card_number_blocks() {
        let f = form("Jane Doe", "4111 1111 1111 111", "12/29", "123");
        assert_eq!(f.validate(), Err(PaymentError::InvalidCardNumber));
        assert_eq!(PaymentError::InvalidCardNumber.to_string(), "Please enter a valid card number");
    }

    #[test]
    fn test_short_cvv_blocks() {
        let f = form("Jane Doe", "4111111111111111", "12/29", "12");
        assert_eq!(f.validate(), Err(PaymentError::InvalidCvv));
    }

    #[test]
    fn test_input_masks() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("41 11 1"), "4111 1");
        assert_eq!(format_expiry("1229"), "12/29");
        assert_eq!(format_expiry("12/2030"), "12/20");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(digits_only("1a2b3"), "123");

        let f = form("Jane", "4111111111111111", "0130", "9x99").normalized();
        assert_eq!(f.card_number.expose(), "4111 1111 1111 1111");
        assert_eq!(f.expiry_date, "01/30");
        assert_eq!(f.cvv.expose(), "999");
    }

    #[test]
    fn test_debug_masks_card() {
        let f = form("Jane", "4111111111111111", "01/30", "999");
        let debug = format!("{:?}", f);
        assert!(!debug.contains("4111"));
        assert!(!debug.contains("999"));
    }
}
