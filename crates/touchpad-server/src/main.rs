//! Remote touchpad server: entry point.
//!
//! Lets a phone act as a touchpad for this computer.  A touchpad client on
//! the phone streams touch gestures as JSON over a WebSocket; this process
//! replays them as pointer moves, clicks, scrolls, zooms, and desktop-switch
//! shortcuts.  Only the `/ws` endpoint is served.
//!
//! # Usage
//!
//! ```text
//! touchpad-server --token <TOKEN> [OPTIONS]
//!
//! Options:
//!   --bind            <IP>     Address to listen on        [default: 0.0.0.0]
//!   --port            <PORT>   Port to listen on           [default: 8080]
//!   --token           <TOKEN>  Shared secret (required)
//!   --scale           <N>      Scroll/zoom base scale      [default: 5.0]
//!   --swipe-modifier  <KEY>    Modifier for swipe arrows   [default: ctrl]
//!   --zoom-modifier   <KEY>    Modifier held while zooming [default: ctrl]
//!   --smooth-move-ms  <MS>     Smooth-move duration        [default: 8]
//!   --dry-run                  Log actions instead of injecting them
//!   --screen-size     <WxH>    Screen reported in dry-run  [default: 1920x1080]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                   | Flag               |
//! |----------------------------|--------------------|
//! | `TOUCHPAD_BIND`            | `--bind`           |
//! | `TOUCHPAD_PORT`            | `--port`           |
//! | `TOUCHPAD_TOKEN`           | `--token`          |
//! | `TOUCHPAD_SCALE`           | `--scale`          |
//! | `TOUCHPAD_SWIPE_MODIFIER`  | `--swipe-modifier` |
//! | `TOUCHPAD_ZOOM_MODIFIER`   | `--zoom-modifier`  |
//! | `TOUCHPAD_SMOOTH_MOVE_MS`  | `--smooth-move-ms` |
//! | `TOUCHPAD_DRY_RUN`         | `--dry-run`        |
//! | `TOUCHPAD_SCREEN_SIZE`     | `--screen-size`    |
//!
//! The phone connects to `ws://<host>:<port>/ws?token=<TOKEN>`.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use touchpad_core::Key;
use touchpad_server::application::HostInputSink;
use touchpad_server::domain::ServerConfig;
use touchpad_server::infrastructure::input_sink::LoggingSink;
use touchpad_server::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote touchpad server.
///
/// Replays touch gestures streamed from a phone over WebSocket as local
/// pointer and keyboard input.
#[derive(Debug, Parser)]
#[command(
    name = "touchpad-server",
    about = "Use a phone as a touchpad for this computer",
    version
)]
struct Cli {
    /// IP address to bind the WebSocket server to.
    #[arg(long, default_value = "0.0.0.0", env = "TOUCHPAD_BIND")]
    bind: String,

    /// TCP port for the WebSocket server.
    #[arg(long, default_value_t = 8080, env = "TOUCHPAD_PORT")]
    port: u16,

    /// Shared secret the phone must present (query `token` or `X-Auth-Token`).
    #[arg(long, default_value = "", env = "TOUCHPAD_TOKEN", hide_env_values = true)]
    token: String,

    /// Base scale: scroll multiplier; zoom uses half of it.
    #[arg(long, default_value_t = 5.0, env = "TOUCHPAD_SCALE")]
    scale: f64,

    /// Modifier tapped with an arrow key on a three-finger swipe.
    #[arg(long, default_value = "ctrl", env = "TOUCHPAD_SWIPE_MODIFIER")]
    swipe_modifier: Key,

    /// Modifier held while a pinch is replayed as a wheel scroll.
    #[arg(long, default_value = "ctrl", env = "TOUCHPAD_ZOOM_MODIFIER")]
    zoom_modifier: Key,

    /// Duration of one smooth pointer move, in milliseconds.
    #[arg(long, default_value_t = 8, env = "TOUCHPAD_SMOOTH_MOVE_MS")]
    smooth_move_ms: u64,

    /// Log every host action instead of injecting it.
    #[arg(long, env = "TOUCHPAD_DRY_RUN")]
    dry_run: bool,

    /// Screen size reported to phones in dry-run mode, as `WIDTHxHEIGHT`.
    #[arg(long, default_value = "1920x1080", env = "TOUCHPAD_SCREEN_SIZE")]
    screen_size: ScreenSize,
}

/// A `WIDTHxHEIGHT` pair such as `1920x1080`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenSize {
    width: u32,
    height: u32,
}

impl FromStr for ScreenSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width: u32 = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
        let height: u32 = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
        if width == 0 || height == 0 {
            return Err(format!("screen size must be non-zero, got '{s}'"));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;

        Ok(ServerConfig {
            bind_addr,
            token: self.token,
            base_scale: self.scale,
            swipe_modifier: self.swipe_modifier,
            zoom_modifier: self.zoom_modifier,
            smooth_move: Duration::from_millis(self.smooth_move_ms),
        })
    }
}

// ── Host input selection ──────────────────────────────────────────────────────

fn build_sink(dry_run: bool, screen: ScreenSize) -> anyhow::Result<Arc<dyn HostInputSink>> {
    if dry_run {
        warn!("dry-run mode: gestures are logged, not injected (screen {screen})");
        return Ok(Arc::new(LoggingSink::new(screen.width, screen.height)));
    }
    native_sink()
}

#[cfg(feature = "native-input")]
fn native_sink() -> anyhow::Result<Arc<dyn HostInputSink>> {
    use touchpad_server::infrastructure::input_sink::NativeSink;

    let sink = NativeSink::new().context("failed to open the host input backend")?;
    Ok(Arc::new(sink))
}

#[cfg(not(feature = "native-input"))]
fn native_sink() -> anyhow::Result<Arc<dyn HostInputSink>> {
    anyhow::bail!(
        "this build has no native input backend; rebuild with `--features native-input` \
         or run with --dry-run"
    )
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Initialise `tracing` (`RUST_LOG`, default `info`).
/// 2. Parse and validate the configuration; a missing token is fatal.
/// 3. Pick the host input sink.
/// 4. Install a Ctrl+C handler that clears the shared `running` flag.
/// 5. Run the accept loop until the flag is cleared.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (dry_run, screen) = (cli.dry_run, cli.screen_size);

    let config = cli.into_server_config()?;
    config.validate().context("invalid configuration")?;

    let sink = build_sink(dry_run, screen)?;

    info!(
        "remote touchpad starting on {} (scale {}, swipe {}, zoom {})",
        config.bind_addr, config.base_scale, config.swipe_modifier, config.zoom_modifier
    );

    // ── Graceful shutdown flag ─────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, sink, running).await?;

    info!("remote touchpad stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["touchpad-server"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_cli_defaults() {
        // Arrange: parse with no arguments (all defaults apply)
        let cli = parse(&[]);

        // Assert
        assert_eq!(cli.bind, "0.0.0.0");
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.scale, 5.0);
        assert_eq!(cli.swipe_modifier, Key::Control);
        assert_eq!(cli.zoom_modifier, Key::Control);
        assert_eq!(cli.smooth_move_ms, 8);
        assert!(!cli.dry_run);
        assert_eq!(
            cli.screen_size,
            ScreenSize {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn test_cli_port_and_token_override() {
        let cli = parse(&["--port", "9090", "--token", "s3cret"]);
        assert_eq!(cli.port, 9090);
        assert_eq!(cli.token, "s3cret");
    }

    #[test]
    fn test_cli_modifier_aliases() {
        let cli = parse(&["--swipe-modifier", "cmd", "--zoom-modifier", "option"]);
        assert_eq!(cli.swipe_modifier, Key::Meta);
        assert_eq!(cli.zoom_modifier, Key::Alt);
    }

    #[test]
    fn test_cli_unknown_modifier_is_rejected() {
        let result = Cli::try_parse_from(["touchpad-server", "--zoom-modifier", "hyper"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_dry_run_and_screen_size() {
        let cli = parse(&["--dry-run", "--screen-size", "2560x1440"]);
        assert!(cli.dry_run);
        assert_eq!(
            cli.screen_size,
            ScreenSize {
                width: 2560,
                height: 1440
            }
        );
    }

    #[test]
    fn test_screen_size_rejects_garbage() {
        assert!("1920".parse::<ScreenSize>().is_err());
        assert!("0x1080".parse::<ScreenSize>().is_err());
        assert!("axb".parse::<ScreenSize>().is_err());
    }

    #[test]
    fn test_into_server_config_carries_values() {
        // Arrange
        let cli = parse(&[
            "--bind",
            "127.0.0.1",
            "--port",
            "7000",
            "--token",
            "t",
            "--scale",
            "3",
            "--smooth-move-ms",
            "20",
        ]);

        // Act
        let config = cli.into_server_config().unwrap();

        // Assert
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:7000");
        assert_eq!(config.token, "t");
        assert_eq!(config.base_scale, 3.0);
        assert_eq!(config.smooth_move, Duration::from_millis(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_into_server_config_invalid_bind_returns_error() {
        let cli = parse(&["--bind", "not.an.ip"]);
        assert!(cli.into_server_config().is_err());
    }

    #[test]
    fn test_default_config_without_token_fails_validation() {
        let config = parse(&[]).into_server_config().unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dry_run_sink_reports_configured_screen() {
        let sink = build_sink(
            true,
            ScreenSize {
                width: 800,
                height: 600,
            },
        )
        .unwrap();
        assert_eq!(sink.screen_size().unwrap(), (800, 600));
    }
}
