//! Fairway Domain Concerns

pub mod checkout;
pub mod donations;
pub mod orders;
