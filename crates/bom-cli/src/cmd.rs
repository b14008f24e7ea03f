//! Command-line argument handling and mode dispatch

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, ArgGroup, Parser};

use bom_core::{detect, strip, BomError, BomType, BomTypeSet, DetectOptions, StripOptions};

/// Exit status when the detected BOM type is outside the expected set
const EX_EXPECT_FAIL: i32 = 2;
/// Exit status when strict conversion hits an illegal byte sequence
const EX_ILLEGAL_BYTES: i32 = 3;

#[derive(Debug, Parser)]
#[command(
    name = "bom",
    version,
    disable_version_flag = true,
    about = "Detect, strip, and convert Unicode byte order marks",
    group = ArgGroup::new("mode").required(true).args(["detect", "strip", "list", "print"])
)]
pub struct Opts {
    /// Report the detected BOM type and exit
    #[arg(short, long)]
    pub detect: bool,

    /// Strip the BOM and output the remainder of the file
    #[arg(short, long)]
    pub strip: bool,

    /// List the supported BOM types
    #[arg(long)]
    pub list: bool,

    /// Output the byte sequence corresponding to "type"
    #[arg(short, long, value_name = "TYPE")]
    pub print: Option<String>,

    /// Expect the specified BOM type(s) (separated by commas)
    #[arg(short, long, value_name = "TYPES", value_delimiter = ',')]
    pub expect: Vec<String>,

    /// Skip invalid input byte sequences instead of failing
    #[arg(short, long)]
    pub lenient: bool,

    /// Prefer UTF-32LE instead of UTF-16LE followed by NUL
    #[arg(long)]
    pub prefer32: bool,

    /// Convert the remainder of the file to UTF-8
    #[arg(short = 'u', long)]
    pub utf8: bool,

    /// Output program version and exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Input file, or "-" for standard input
    #[arg(value_name = "FILE")]
    pub file: Option<String>,
}

/// Run the selected mode and map failures onto the tool's exit statuses
pub fn cmd(opts: &Opts) -> i32 {
    match run(opts) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("bom: {err}");
            match err.downcast_ref::<BomError>() {
                Some(BomError::UnexpectedType(_)) => EX_EXPECT_FAIL,
                Some(BomError::IllegalBytes { .. }) => EX_ILLEGAL_BYTES,
                _ => 1,
            }
        }
    }
}

fn run(opts: &Opts) -> Result<()> {
    if opts.list || opts.print.is_some() {
        // These modes take no input file.
        if opts.file.is_some() {
            bail!("unexpected file argument");
        }
        if opts.list {
            list_types()?;
        } else if let Some(name) = opts.print.as_deref() {
            print_signature(name)?;
        }
        return Ok(());
    }

    let detect_opts = DetectOptions {
        expect: parse_expect(&opts.expect)?,
        prefer32: opts.prefer32,
    };
    let mut reader = open_input(opts.file.as_deref())?;

    if opts.detect {
        let bom = detect(&mut reader, &detect_opts)?;
        println!("{}", bom.name());
        return Ok(());
    }

    let strip_opts = StripOptions {
        expect: detect_opts.expect,
        prefer32: opts.prefer32,
        lenient: opts.lenient,
        to_utf8: opts.utf8,
    };
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    strip(&mut reader, &mut writer, &strip_opts)?;
    Ok(())
}

/// Fold `--expect` names into a type set; the empty list accepts everything
fn parse_expect(names: &[String]) -> Result<BomTypeSet> {
    let mut set = BomTypeSet::empty();
    for name in names {
        set = set.with(BomType::from_name(name)?);
    }
    Ok(set)
}

fn open_input(file: Option<&str>) -> Result<Box<dyn Read>> {
    match file {
        None | Some("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let fp = File::open(path).with_context(|| path.to_owned())?;
            Ok(Box::new(BufReader::new(fp)))
        }
    }
}

fn list_types() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for bom in &BomType::ALL {
        writeln!(out, "{}", bom.name())?;
    }
    Ok(())
}

/// Write the raw signature bytes of the named type to stdout
fn print_signature(name: &str) -> Result<()> {
    let bom = BomType::from_name(name)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(bom.signature())?;
    out.flush()?;
    Ok(())
}
