use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use clap::{ArgMatches, Command, arg};
use rugrib::Message;

use crate::cli;

pub(crate) fn cli() -> Command {
    Command::new("info")
        .about("Show per-message identification information")
        .arg(arg!(<FILE> "Target file").value_parser(clap::value_parser!(PathBuf)))
}

pub(crate) fn exec(args: &ArgMatches) -> anyhow::Result<()> {
    let file_name = args.get_one::<PathBuf>("FILE").unwrap();
    for (index, message) in cli::messages(file_name)?.iter().enumerate() {
        print!("{}", InfoView(index, message));
    }
    Ok(())
}

struct InfoView<'m>(usize, &'m Message);

impl Display for InfoView<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let Self(index, message) = self;
        writeln!(f, "Message {index}")?;
        writeln!(f, "    Edition:            {}", message.edition())?;
        writeln!(f, "    Length:             {}", message.as_bytes().len())?;
        writeln!(f, "    Reference time:     {}", cli::time_string(message))?;
        match message {
            Message::Edition1(inner) => {
                let pds = inner.product_definition();
                writeln!(f, "    Centre:             {}", pds.centre())?;
                writeln!(f, "    Sub-centre:         {}", pds.sub_centre())?;
                writeln!(
                    f,
                    "    Parameter:          {}",
                    pds.indicator_of_parameter()
                )?;
                writeln!(
                    f,
                    "    Level:              {:?} (type {})",
                    pds.level(),
                    pds.indicator_of_type_of_level()
                )?;
                if let Some(grid) = inner.grid_description() {
                    writeln!(
                        f,
                        "    Representation:     {}",
                        grid.data_representation_type()
                    )?;
                    if let Some(definition) = grid.grid_definition() {
                        let (nj, ni) = definition.grid_shape();
                        writeln!(f, "    Grid:               {nj} x {ni}")?;
                    }
                }
            }
            Message::Edition2(inner) => {
                let ids = inner.identification();
                writeln!(f, "    Centre:             {}", ids.centre())?;
                writeln!(f, "    Sub-centre:         {}", ids.sub_centre())?;
                writeln!(
                    f,
                    "    Discipline:         {}",
                    inner.indicator().discipline()
                )?;
                writeln!(
                    f,
                    "    Data points:        {}",
                    inner.grid_description().number_of_data_points()
                )?;
            }
        }
        writeln!(f)
    }
}
