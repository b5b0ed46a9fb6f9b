mod layout;
mod matrix;
mod similarity;

use layout::run_layout;
use matrix::run_matrix;
use similarity::run_similarity;

use anyhow::{Result, bail};
use compound_atlas::Compound;
use compound_atlas::io::read_compounds;

use crate::cli::{Command, IoOptions};
use crate::display::Context;
use crate::io::{Stream, open_input};

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Similarity(args) => run_similarity(args, ctx),
        Command::Layout(args) => run_layout(args, ctx),
        Command::Matrix(args) => run_matrix(args, ctx),
    }
}

/// Rejects terminal stdin/stdout where a file or pipe is required.
fn check_streams(io: &IoOptions, command: &str) -> Result<()> {
    if io.input.is_none() && Stream::Stdin.is_terminal() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: catlas {command} -i <INPUT> or pipe data via stdin."
        );
    }
    if io.output.is_none() && Stream::Stdout.is_terminal() {
        bail!(
            "No output file specified and stdout is a terminal.\n\nUsage: catlas {command} -o <OUTPUT> or pipe output."
        );
    }
    Ok(())
}

fn load_compounds(io: &IoOptions) -> Result<Vec<Compound>> {
    let input = open_input(io.input.as_deref())?;
    let compounds = read_compounds(input)?;
    if compounds.is_empty() {
        bail!("Input contains no compound records");
    }
    Ok(compounds)
}
