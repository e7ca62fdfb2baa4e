mod engine;
mod types;

pub use engine::{
    SCENARIO_HIGHER_RATE, SCENARIO_LOWER_RATE, SCENARIO_NO_CONTRIBUTIONS,
    build_comparison_scenarios, project, project_closed_form,
};
pub use types::{
    CompoundingFrequency, InvalidInput, ProjectionInputs, ProjectionResult, ScenarioResult,
    YearlyCheckpoint,
};
