use clap::Parser;

use crate::error::{AppError, AppResult};

use super::ServerArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<ServerArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    ServerArgs::try_parse_from(args).map_err(AppError::from)
}
