use std::path::PathBuf;

use clap::{ArgMatches, Command, arg};

use crate::cli;

pub(crate) fn cli() -> Command {
    Command::new("decode")
        .about("Decode and dump the value grid of one message")
        .arg(arg!(<FILE> "Target file").value_parser(clap::value_parser!(PathBuf)))
        .arg(arg!(<INDEX> "Message index").value_parser(clap::value_parser!(usize)))
}

pub(crate) fn exec(args: &ArgMatches) -> anyhow::Result<()> {
    let file_name = args.get_one::<PathBuf>("FILE").unwrap();
    let index = *args.get_one::<usize>("INDEX").unwrap();

    let messages = cli::messages(file_name)?;
    let message = messages
        .get(index)
        .ok_or_else(|| anyhow::anyhow!("no message with index {index}"))?;

    let values = message.values()?;
    for row in values.rows() {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!("{line}");
    }
    Ok(())
}
