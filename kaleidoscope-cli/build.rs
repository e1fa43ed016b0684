use std::env;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::process;

use clap_complete::{self, shells};

include!("src/cli.rs");

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let out_dir = match env::var_os("OUT_DIR") {
        Some(out_dir) => out_dir,
        None => {
            eprintln!("OUT_DIR env var not set; can't generate completions");
            process::exit(1);
        }
    };

    let out_dir = Path::new(&out_dir);
    stamp(out_dir)?;
    make_shell_completion_scripts(out_dir)?;
    Ok(())
}

/// Drop a stamp file in the build output directory so tools can find
/// the most recent build and the completion scripts next to it.
fn stamp(out_dir: &Path) -> Result<(), Error> {
    File::create(out_dir.join("kaleidoscope.stamp"))?;
    Ok(())
}

fn make_shell_completion_scripts(out_dir: &Path) -> Result<(), Error> {
    let mut cmd = build_cli();
    clap_complete::generate_to(shells::Bash, &mut cmd, "kaleidoscope", out_dir)?;
    clap_complete::generate_to(shells::Fish, &mut cmd, "kaleidoscope", out_dir)?;
    Ok(())
}
