pub mod cashflow;
pub mod outcome;
pub mod terms;

pub use cashflow::{CashFlowStep, CashFlowWaterfall, Measure};
pub use outcome::{compute, evaluate_ipo_outcome, IpoOutcome, IpoOutcomeInput};
pub use terms::{DealTerms, NoteTerms, SecondaryTerms};
