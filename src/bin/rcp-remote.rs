//! Camera remote entry point.
//!
//! Usage:
//!
//! ```bash
//! RCP_CAMERA_IP=192.168.0.100 RCP_BUTTON_GPIO=17 rcp-remote
//! RCP_BUTTON_GPIO=17 RCP_TOUCH_GPIO=27 rcp-remote --touch --debug
//! ```
//!
//! Environment:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `RCP_BUTTON_GPIO` | Button GPIO number (active-low), required |
//! | `RCP_TOUCH_GPIO` | Touch pad GPIO number (active-high), required with `--touch` |
//! | `RCP_LED_RED`, `RCP_LED_GREEN`, `RCP_LED_BLUE` | LED class names; without them the state is only logged |
//!
//! Session options (`RCP_CAMERA_IP`, `RCP_SSID`, ...) are read by
//! [`SessionOptions::from_env`].

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::process::ExitCode;

use rcp_remote::device::{LogIndicator, PreassociatedLink, SysfsInput, SysfsRgbIndicator};
use rcp_remote::gesture::{InputChannel, Polarity};
use rcp_remote::{Error, Indicator, ParamId, Result, SessionOptions, session};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

const BUTTON_GPIO: &str = "RCP_BUTTON_GPIO";
const TOUCH_GPIO: &str = "RCP_TOUCH_GPIO";
const LED_RED: &str = "RCP_LED_RED";
const LED_GREEN: &str = "RCP_LED_GREEN";
const LED_BLUE: &str = "RCP_LED_BLUE";

// ============================================================================
// Args
// ============================================================================

/// Command-line flags.
#[derive(Debug, Clone, Copy)]
struct Args {
    debug: bool,
    touch: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        Self {
            debug: args.iter().any(|a| a == "--debug"),
            touch: args.iter().any(|a| a == "--touch"),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match remote(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Remote stopped");
            ExitCode::FAILURE
        }
    }
}

async fn remote(args: Args) -> Result<()> {
    let options = SessionOptions::from_env()?;
    let mut link = PreassociatedLink::new(options.endpoint.clone());

    let mut channels = vec![InputChannel::button(
        "button",
        SysfsInput::gpio(gpio_from_env(BUTTON_GPIO)?),
        Polarity::ActiveLow,
        &options.timing,
    )];
    if args.touch {
        channels.push(InputChannel::touch(
            "touch",
            SysfsInput::gpio(gpio_from_env(TOUCH_GPIO)?),
            Polarity::ActiveHigh,
            ParamId::MAGNIFY_ENABLE,
            &options.timing,
        ));
    }

    let end = session::run(&options, &mut link, indicator_from_env(), channels).await?;
    info!(
        iterations = end.iterations,
        sent = end.commands_sent,
        dropped = end.commands_dropped,
        "Session ended"
    );
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn init_logging(debug: bool) {
    let filter = if debug { "rcp_remote=debug" } else { "rcp_remote=info" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();
}

fn gpio_from_env(key: &str) -> Result<u32> {
    let raw = env::var(key).map_err(|_| Error::config(format!("{key} is not set")))?;
    raw.trim()
        .parse()
        .map_err(|_| Error::config(format!("{key}: not a GPIO number: {raw:?}")))
}

fn indicator_from_env() -> Box<dyn Indicator> {
    match (env::var(LED_RED), env::var(LED_GREEN), env::var(LED_BLUE)) {
        (Ok(red), Ok(green), Ok(blue)) => {
            info!(%red, %green, %blue, "Using LED indicator");
            Box::new(SysfsRgbIndicator::by_name(&red, &green, &blue))
        }
        _ => {
            info!("No LEDs configured, logging indicator state");
            Box::new(LogIndicator::new())
        }
    }
}
