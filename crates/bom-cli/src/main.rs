//! `bom` – detect, strip, and convert Unicode byte order marks

use clap::Parser;

mod cmd;

fn main() {
    std::process::exit(cmd::cmd(&cmd::Opts::parse()));
}
