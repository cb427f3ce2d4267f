use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use zosfs::{FileDevice, FileSystem, Shell, DEFAULT_DISK_SIZE};

/// A user-space UNIX-style file system emulator backed by a single image
/// file.
#[derive(Parser)]
struct Cli {
    /// Path to the image file backing the file system (e.g. data.dat)
    image: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let existed = cli.image.exists();
    let device = match FileDevice::open(&cli.image) {
        Ok(device) => Arc::new(device),
        Err(e) => {
            eprintln!("cannot open the image file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // a fresh image is formatted to the default size, an existing one mounted
    let fs = if existed {
        match FileSystem::load(device) {
            Ok(fs) => fs,
            Err(e) => {
                eprintln!("cannot mount the image: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("FORMATTING DISK ({}B)", DEFAULT_DISK_SIZE);
        match FileSystem::format(device, DEFAULT_DISK_SIZE) {
            Ok(fs) => {
                println!("OK");
                fs
            }
            Err(e) => {
                eprintln!("cannot format the image: {}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    let stdout = io::stdout();
    let mut shell = Shell::new(fs, stdout.lock());
    match shell.run(io::stdin().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("i/o error: {}", e);
            ExitCode::FAILURE
        }
    }
}
