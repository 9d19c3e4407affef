use std::ffi::OsString;
use std::time::Duration;

use anyhow::{Context, anyhow};
use notibar_bridge::config::HidePolicy;
use notibar_frontend::FrontendOptions;

const HELP: &str = "\
Show transient messages in the notification region.

USAGE:
  notibar [OPTIONS] [MESSAGE]...

OPTIONS:
  --policy <restart|independent>  What a new message does to a pending hide
  --interval-ms <N>               Delay between messages [default: 1000]
  -h, --help                      Print help
";

/// Shown when no message is given on the command line.
const DEFAULT_MESSAGE: &str = "Buddy request sent!";

const DEFAULT_INTERVAL_MS: u64 = 1000;

fn parse_args(mut args: pico_args::Arguments) -> anyhow::Result<Option<FrontendOptions>> {
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let hide_policy: Option<HidePolicy> = args.opt_value_from_str("--policy")?;
    let interval_ms: u64 = args
        .opt_value_from_str("--interval-ms")?
        .unwrap_or(DEFAULT_INTERVAL_MS);

    let mut messages = args
        .finish()
        .into_iter()
        .map(OsString::into_string)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|raw| anyhow!("message is not valid UTF-8: {raw:?}"))?;
    if messages.is_empty() {
        messages.push(DEFAULT_MESSAGE.to_string());
    }

    Ok(Some(FrontendOptions {
        messages,
        interval: Duration::from_millis(interval_ms),
        hide_policy,
    }))
}

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .context("failed to build logger instance")?;

    let Some(options) = parse_args(pico_args::Arguments::from_env())? else {
        print!("{HELP}");
        return Ok(());
    };

    let channels = notibar_bridge::BridgeChannels::default();
    let backend = notibar_backend::run(channels.backend_rx, channels.backend_tx);
    notibar_frontend::run(channels.frontend_rx, channels.frontend_tx, options)
        .context("failed to run frontend")?;

    if backend.join().is_err() {
        log::error!("Backend thread panicked");
    }
    Ok(())
}
