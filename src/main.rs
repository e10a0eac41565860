use anyhow::Context;
use clap::error::ErrorKind;
use obfuscator::config::{CliConfig, USAGE};
use obfuscator::io::cloud::LocalObjectIO;
use obfuscator::logging::init_tracing;
use obfuscator::{Obfuscator, Request};
use std::io::Write;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = match CliConfig::from_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{e}");
            println!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&cli.log_level, cli.log_format) {
        eprintln!("warning: {e:#}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "obfuscation failed");
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let config = cli.obfuscator_config();
    let request = Request::parse_with(&cli.request, &config)?;
    let obfuscator = Obfuscator::new(LocalObjectIO::new(&cli.storage_root)).with_config(config);
    let output = obfuscator.process_request(&request)?;

    if cli.stdout {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(output.as_bytes())
            .and_then(|()| stdout.flush())
            .context("write output to stdout")?;
        return Ok(());
    }

    let path = output.save(&cli.output_dir, request.location.format.extension())?;
    info!(path = %path.display(), bytes = output.len(), "saved output");
    println!("File processed and saved to {}", path.display());
    Ok(())
}
