use anyhow::Result;
use clap::Parser;
use informative_sites::{self, Args};
use std::{fs::File, io::BufWriter};

// --------------------------------------------------
fn main() {
    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// --------------------------------------------------
fn run(args: Args) -> Result<()> {
    let mut logger = env_logger::Builder::new();
    logger.filter_level(args.log_level());
    if let Some(log_file) = &args.log_file {
        logger.target(env_logger::Target::Pipe(Box::new(BufWriter::new(
            File::create(log_file)?,
        ))));
    }
    logger.init();

    informative_sites::run(args)?;
    Ok(())
}
