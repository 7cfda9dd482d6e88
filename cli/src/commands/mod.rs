use clap::{ArgMatches, Command};

pub(crate) fn cli() -> Vec<Command> {
    vec![decode::cli(), info::cli(), list::cli()]
}

pub(crate) fn dispatch(matches: ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("decode", args)) => decode::exec(args),
        Some(("info", args)) => info::exec(args),
        Some(("list", args)) => list::exec(args),
        _ => unreachable!(),
    }
}

pub(crate) mod decode;
pub(crate) mod info;
pub(crate) mod list;
