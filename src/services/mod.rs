//! Business logic services.
//!
//! Public functions take the pool and run their writes in one transaction;
//! `pub(crate)` helpers take any connection so they can join a caller's
//! transaction.

pub mod audits;
pub mod cases;
pub mod check_results;
pub mod reference;
pub mod retests;
pub mod statements;
pub mod summary;
pub mod wizard;

pub use check_results::CheckResultUpdate;
pub use retests::RetestSnapshot;
pub use wizard::WizardCursor;
