//! Build orchestration.

pub mod build;

pub use build::{
    ensure_output_dir, report_command_result, BuildOutcome, BuildPipeline, BuildPlan,
    BuildReport, StepRecord, StepStatus, REMEDIATION,
};
