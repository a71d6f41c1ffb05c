pub mod emi;
pub mod pricing;
pub mod quote;
