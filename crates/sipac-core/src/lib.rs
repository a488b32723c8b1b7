//! sipac-core: máquina de pasos, validación y análisis del proceso SIPAC.
pub mod analysis;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod flow;
pub mod hashing;
pub mod payload;
pub mod ports;
pub mod step;
pub mod validate;

pub use analysis::{analyze_assets, analyze_budget, AssetAnalysis, AssetKind, BudgetAnalysis, BudgetInput};
pub use engine::{Progress, RetryState, SessionEngine, SessionState};
pub use errors::CoreError;
pub use event::{EventStore, InMemoryEventStore, SessionEvent, SessionEventKind};
pub use flow::{flow_conjunto, flow_desglosado};
pub use payload::{FailureDetail, FinalReport, SessionOutcome, StepPayload};
pub use ports::{AnswerSource, PresentationSink, SourceError};
pub use step::{build_flow_definition, FlowDefinition, StepDefinition, StepText, ValidationRule};
pub use validate::Rejection;
