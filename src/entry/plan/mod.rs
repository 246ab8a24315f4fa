mod build;
mod execute;
mod types;

pub(crate) use build::build_plan;
#[cfg(test)]
pub(crate) use build::resolve_settings;
pub(crate) use execute::execute_plan;
#[cfg(test)]
pub(crate) use types::RunPlan;
