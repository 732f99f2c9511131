pub mod alignment;
pub mod filter;

use crate::{
    alignment::{Alignment, AlignmentError, Record},
    filter::{conserved_columns, filter_columns},
};
use anyhow::{anyhow, bail, Result};
use bio::io::fasta;
use clap::{builder::PossibleValue, Parser, ValueEnum};
use itertools::Itertools;
use log::{debug, info, warn};
use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Reduce a FASTA alignment to its informative (non-conserved) sites
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Input FASTA alignment to be reduced
    #[arg(short, long, value_name = "INFASTA")]
    pub infasta: PathBuf,

    /// Output directory, will contain "<NAME>_condensed.fasta"
    #[arg(short, long, value_name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// Uppercase and lowercase characters differ
    #[arg(long, conflicts_with = "case_insensitive")]
    pub case_sensitive: bool,

    /// Uppercase and lowercase characters match (default)
    #[arg(long)]
    pub case_insensitive: bool,

    /// Log level
    #[arg(short, long)]
    pub log: Option<LogLevel>,

    /// Log file, default STDERR
    #[arg(long, value_name = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.log {
            Some(LogLevel::Debug) => log::LevelFilter::Debug,
            Some(LogLevel::Info) => log::LevelFilter::Info,
            _ => log::LevelFilter::Off,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LogLevel {
    Info,
    Debug,
}

impl ValueEnum for LogLevel {
    fn value_variants<'a>() -> &'a [Self] {
        &[LogLevel::Info, LogLevel::Debug]
    }

    fn to_possible_value<'a>(&self) -> Option<PossibleValue> {
        Some(match self {
            LogLevel::Info => PossibleValue::new("info"),
            LogLevel::Debug => PossibleValue::new("debug"),
        })
    }
}

// --------------------------------------------------
/// Condense the input alignment and return the path of the output file
pub fn run(args: Args) -> Result<PathBuf> {
    info!("args = {args:#?}");

    let alignment = read_alignment(&args.infasta)?;
    let width = alignment.width().unwrap_or_default();
    info!(
        "Read {} sequences of length {width} from \"{}\"",
        alignment.len(),
        args.infasta.display()
    );

    let conserved = conserved_columns(&alignment, args.case_sensitive)?;
    debug!("conserved = {conserved:?}");

    let condensed = filter_columns(&alignment, args.case_sensitive)?;
    let kept = condensed.width().unwrap_or_default();
    info!("{} conserved, {kept} informative columns", conserved.len());
    if kept == 0 {
        warn!("No informative sites, all output sequences are empty");
    }

    let outfile = condensed_path(&args.infasta, &args.out_dir)?;
    if !args.out_dir.is_dir() {
        fs::create_dir_all(&args.out_dir)?;
    }
    write_alignment(&condensed, &outfile)?;
    info!(r#"Wrote "{}""#, outfile.display());

    println!(
        r#"Kept {kept} of {width} columns from {} sequences, see output in "{}""#,
        condensed.len(),
        outfile.display()
    );

    Ok(outfile)
}

// --------------------------------------------------
/// "<out_dir>/<input file stem>_condensed.fasta"
pub fn condensed_path(infile: &Path, out_dir: &Path) -> Result<PathBuf> {
    match infile.file_stem() {
        Some(stem) => Ok(out_dir
            .join(format!("{}_condensed.fasta", stem.to_string_lossy()))),
        _ => bail!("Cannot get filename from {}", infile.display()),
    }
}

// --------------------------------------------------
/// Read and validate a FASTA alignment.
///
/// Headers are scanned for duplicate IDs before any record is parsed,
/// then the parsed alignment must be non-empty with equal lengths.
pub fn read_alignment(filename: &Path) -> Result<Alignment> {
    let text = fs::read_to_string(filename)
        .map_err(|e| anyhow!("Cannot read {}: {e}", filename.display()))?;
    let name = filename.display().to_string();

    if text.trim().is_empty() {
        return Err(AlignmentError::EmptyInput(name).into());
    }

    check_duplicate_ids(&text)?;

    let mut records = vec![];
    for res in fasta::Reader::new(text.trim_start().as_bytes()).records() {
        let rec = res.map_err(|e| AlignmentError::Malformed(e.to_string()))?;
        rec.check().map_err(|e| {
            AlignmentError::Malformed(format!(r#"{e} ("{}")"#, rec.id()))
        })?;
        records.push(Record {
            id: rec.id().to_string(),
            desc: rec.desc().map(Into::into),
            seq: rec.seq().to_vec(),
        });
    }

    let alignment = Alignment::new(records);
    check_not_empty(&alignment, &name)?;
    check_equal_lengths(&alignment)?;

    Ok(alignment)
}

// --------------------------------------------------
/// Scan the raw header lines for IDs used more than once
pub fn check_duplicate_ids(text: &str) -> Result<(), AlignmentError> {
    let mut ids: HashMap<&str, u32> = HashMap::new();
    for (i, line) in text.lines().enumerate() {
        match line.strip_prefix('>') {
            Some(header) => {
                let id = header
                    .trim_end()
                    .split(char::is_whitespace)
                    .next()
                    .unwrap_or_default();
                if id.is_empty() {
                    return Err(AlignmentError::Malformed(format!(
                        "missing sequence ID on line {}",
                        i + 1
                    )));
                }
                ids.entry(id).and_modify(|v| *v += 1).or_insert(1);
            }
            None if ids.is_empty() && !line.trim().is_empty() => {
                return Err(AlignmentError::Malformed(format!(
                    "expected a header line starting with '>' on line {}",
                    i + 1
                )));
            }
            _ => (),
        }
    }

    // Sorted for a stable message
    let dups: Vec<String> = ids
        .iter()
        .flat_map(|(id, &count)| (count > 1).then(|| id.to_string()))
        .sorted()
        .collect();

    if dups.is_empty() {
        Ok(())
    } else {
        Err(AlignmentError::DuplicateIdentifier(dups))
    }
}

// --------------------------------------------------
pub fn check_not_empty(
    alignment: &Alignment,
    name: &str,
) -> Result<(), AlignmentError> {
    if alignment.is_empty() {
        Err(AlignmentError::EmptyInput(name.to_string()))
    } else {
        Ok(())
    }
}

// --------------------------------------------------
pub fn check_equal_lengths(
    alignment: &Alignment,
) -> Result<(), AlignmentError> {
    let lengths = alignment.lengths();
    if lengths.len() > 1 {
        Err(AlignmentError::UnequalLength(lengths))
    } else {
        Ok(())
    }
}

// --------------------------------------------------
/// One header line and one sequence line per record, in order
pub fn write_alignment(alignment: &Alignment, filename: &Path) -> Result<()> {
    let mut writer = fasta::Writer::new(open_for_write(filename)?);
    for rec in alignment.records() {
        writer.write(&rec.id, rec.desc.as_deref(), &rec.seq)?;
    }
    writer.flush()?;

    Ok(())
}

// --------------------------------------------------
fn open_for_write(filename: &Path) -> Result<Box<dyn Write>> {
    Ok(Box::new(BufWriter::new(File::create(filename).map_err(
        |e| anyhow!("Cannot write {}: {e}", filename.display()),
    )?)))
}
