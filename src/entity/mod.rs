//! SeaORM entity definitions.

pub mod audit;
pub mod case;
pub mod check_result;
pub mod page;
pub mod retest;
pub mod retest_check_result;
pub mod retest_page;
pub mod retest_statement_check_result;
pub mod statement_check;
pub mod statement_check_result;
pub mod wcag_definition;
