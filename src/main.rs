use beacon_decoder::app::{Options, StdinSource, run_with_io};
use clap::Parser;
use std::panic::{self, PanicHookInfo};

/// Exit codes for the application
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_PANIC: i32 = 2;

/// Install the logger. `RUST_LOG` wins over the `--verbose` default.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Process supervisors (systemd, Telegraf execd) watch the exit status
    panic::set_hook(Box::new(move |info: &PanicHookInfo| {
        eprintln!("Panic! {}", info);
        std::process::exit(EXIT_PANIC);
    }));

    let options = Options::parse();
    init_logging(options.verbose);

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let result = run_with_io(options, &StdinSource, &mut stdout.lock(), &mut stderr.lock()).await;

    match result {
        Ok(_) => std::process::exit(EXIT_SUCCESS),
        Err(why) => {
            eprintln!("error: {}", why);
            std::process::exit(EXIT_ERROR);
        }
    }
}
