//! Calculation steps of the gross-to-net pipeline.
//!
//! Each step lives in its own module and can be used on its own;
//! [`NetPayCalculator`] chains them for a full breakdown.

pub mod common;
pub mod comparison;
pub mod expenses;
pub mod family_minimum;
pub mod payroll;
pub mod scale;
pub mod social_security;
pub mod withholding;
pub mod work_reduction;

pub use comparison::{
    ConceptAmount, NetPayIncrement, SalaryBlock, SharePoint, SweepError, increment,
    salary_blocks, share_curve,
};
pub use family_minimum::FamilyMinimumCalculator;
pub use payroll::{NetPayCalculator, PayrollError};
pub use social_security::SocialSecurityCalculator;
pub use withholding::{
    WithholdingCalculator, WithholdingContract, WithholdingInput, WithholdingResult,
};
