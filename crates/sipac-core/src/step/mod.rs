mod definition;
mod registry;

pub use definition::{StepDefinition, StepText, ValidationRule};
pub use registry::{build_flow_definition, FlowDefinition};
