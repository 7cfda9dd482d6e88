use std::path::PathBuf;

use clap::{ArgMatches, Command, arg};

use crate::cli;

pub(crate) fn cli() -> Command {
    Command::new("list")
        .about("List messages in the file")
        .arg(arg!(<FILE> "Target file").value_parser(clap::value_parser!(PathBuf)))
}

pub(crate) fn exec(args: &ArgMatches) -> anyhow::Result<()> {
    let file_name = args.get_one::<PathBuf>("FILE").unwrap();
    println!("{:>5}  {:>7}  {:>9}  {}", "index", "edition", "octets", "reference time");
    for (index, message) in cli::messages(file_name)?.iter().enumerate() {
        println!(
            "{:>5}  {:>7}  {:>9}  {}",
            index,
            message.edition(),
            message.as_bytes().len(),
            cli::time_string(message)
        );
    }
    Ok(())
}
