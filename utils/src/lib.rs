//! Display helpers shared by the front end: ko-KR number formatting and
//! Korean mobile phone number validation.

pub mod number;
pub mod phone;

pub use number::{number_formatting, NumberInput};
pub use phone::is_valid_phone_number;
