use clap::Parser;

use super::SliderArgs;
use crate::error::{AppError, AppResult};

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<SliderArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    SliderArgs::try_parse_from(args).map_err(AppError::from)
}
