pub mod amortization;

pub use amortization::{
    calculate_emi, calculate_emi_with_policy, AmortizationRow, EmiInput, EmiResult,
};
