mod headless;
mod plan;

#[cfg(test)]
mod tests;

use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::SliderArgs;
use crate::config::{apply_config, load_config};
use crate::error::AppResult;
use crate::time::SystemClock;
use plan::{build_plan, execute_plan};

/// Binary entry point: parse flags, merge the config file, then run the
/// panel or the headless stream on a multi-thread runtime.
///
/// # Errors
///
/// Returns an error when arguments or config are invalid, the runtime
/// cannot start, or the run itself fails.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    crate::system::logger::init_logging(args.verbose, args.no_color, !args.no_ui);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<(SliderArgs, ArgMatches)> {
    let raw_args: Vec<OsString> = std::env::args_os().collect();
    let matches = SliderArgs::command().get_matches_from(raw_args);
    let args = SliderArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: SliderArgs) -> AppResult<()> {
    let plan = build_plan(args, &SystemClock)?;
    execute_plan(plan).await
}
