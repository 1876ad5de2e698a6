mod build;
mod execute;
mod types;


pub(super) use build::{apply_config_file, build_plan};
pub(super) use execute::execute_plan;
