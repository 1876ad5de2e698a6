use clap::Parser;

use crate::error::{AppError, AppResult};

use super::BeesArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<BeesArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    BeesArgs::try_parse_from(args).map_err(AppError::from)
}
