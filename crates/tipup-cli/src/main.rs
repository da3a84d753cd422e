use std::env;
use std::ffi::OsString;
use std::process;

use clap::Parser;
use color_eyre::Result;
use tipup_core::{
    download, forward, to_json_response, AssumeYes, Confirm, DownloadRequest, ExecutionOutcome,
    InstallError, Settings, StdinConfirm, TargetRef,
};

mod cli;

use cli::DownloadCli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let argv: Vec<OsString> = env::args_os().skip(1).collect();
    let settings = Settings::from_env();

    if argv.first().is_some_and(|arg| arg == "download") {
        let args = std::iter::once(OsString::from("tipup download")).chain(argv.into_iter().skip(1));
        let cli = DownloadCli::parse_from(args);
        init_tracing(cli.trace, cli.verbose);
        let code = run_download(&settings, &cli);
        if code != 0 {
            process::exit(code);
        }
        return Ok(());
    }

    // Everything else belongs to the installed toolchain; mirror its exit
    // status, and exit 1 when it could not be started at all.
    init_tracing(false, 0);
    match forward(&settings, &argv) {
        Ok(0) => Ok(()),
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("tipup: {err:#}");
            process::exit(1);
        }
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    // RUST_LOG, when set, wins over the flag-derived filter.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("tipup_cli={level},tipup_core={level}"))
        });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run_download(settings: &Settings, cli: &DownloadCli) -> i32 {
    let target = TargetRef::parse(cli.target.as_deref());
    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };
    let request = DownloadRequest { target };

    match download(settings, &request, confirm.as_ref()) {
        Ok(outcome) => {
            let code = outcome.exit_code();
            emit_outcome(cli, &outcome, code);
            code
        }
        Err(err) => {
            let code = match err.downcast_ref::<InstallError>() {
                Some(install) if install.is_user_error() => 1,
                _ => 2,
            };
            if cli.json {
                let outcome = ExecutionOutcome::failure(format!("{err:#}"), serde_json::json!({}));
                println!(
                    "{}",
                    serde_json::to_string_pretty(&to_json_response(&outcome, code))
                        .unwrap_or_default()
                );
            }
            eprintln!("tipup: {err:#}");
            code
        }
    }
}

fn emit_outcome(cli: &DownloadCli, outcome: &ExecutionOutcome, code: i32) {
    if cli.json {
        let payload = to_json_response(outcome, code);
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).unwrap_or_default()
        );
    } else if !cli.quiet {
        println!("{}", outcome.message);
    }
}
