//! Scene Showcase - card shuffle, dialogue bubbles and a particle flame.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use compositor::Ticker;
use networking::{Fetcher, HttpClient, HttpClientBuilder, MemoryFetcher, ResourceLoader};
use render::display_list::summarize;
use scenes::{SceneContext, SceneDirector, SceneKind, ShowcaseConfig};

/// Scene Showcase - renders animated scenes headlessly
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene to run: ace-of-shadows, magic-words or phoenix-flame
    #[arg(long, default_value = "ace-of-shadows")]
    scene: SceneKind,

    /// Run every scene in turn
    #[arg(long)]
    all: bool,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    width: f32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    height: f32,

    /// Frames to run per scene
    #[arg(long, default_value = "300")]
    frames: u32,

    /// Frame duration in milliseconds
    #[arg(long, default_value = "16.67")]
    frame_ms: f32,

    /// Seed for scene randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Dialogue endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "15")]
    timeout: u64,

    /// Never touch the network; use bundled data and placeholders
    #[arg(long)]
    offline: bool,

    /// Pace frames with the wall clock instead of a fixed step
    #[arg(long)]
    realtime: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_config(args: &Args) -> ShowcaseConfig {
    let mut config = ShowcaseConfig::default().with_viewport(args.width, args.height);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    config
}

fn http_client(args: &Args) -> Result<HttpClient> {
    ensure!(args.timeout > 0, "--timeout must be at least one second");
    let client = HttpClientBuilder::new()
        .timeout(Duration::from_secs(args.timeout))
        .build()?;
    info!(
        timeout_secs = client.config().timeout.as_secs(),
        user_agent = %client.config().user_agent,
        "HTTP client ready"
    );
    Ok(client)
}

/// Wall-clock duration of one frame.
fn frame_duration(frame_ms: f32) -> Result<Duration> {
    ensure!(
        frame_ms.is_finite() && frame_ms > 0.0,
        "--frame-ms must be a positive number, got {}",
        frame_ms
    );
    Ok(Duration::try_from_secs_f32(frame_ms / 1000.0)?)
}

async fn run_scene(director: &mut SceneDirector, kind: SceneKind, args: &Args, frame: Duration) {
    if let Err(e) = director.switch(kind).await {
        warn!(scene = %kind, error = %e, "Continuing with an empty scene");
    }

    if args.realtime {
        let mut ticker = Ticker::new();
        ticker.tick();
        let mut interval = tokio::time::interval(frame);
        for _ in 0..args.frames {
            interval.tick().await;
            let delta = ticker.tick().delta_ms();
            director.tick(delta);
        }
    } else {
        for _ in 0..args.frames {
            director.tick(args.frame_ms);
        }
    }

    let list = director.display_list();
    let elapsed_ms = director.clock().map(|c| c.elapsed_ms()).unwrap_or_default();
    info!(
        scene = %kind,
        frames = args.frames,
        elapsed_ms,
        items = list.len(),
        "Scene finished"
    );

    println!("{} after {:.0} ms:", kind.title(), elapsed_ms);
    for (item_kind, count) in summarize(&list) {
        println!("  {:<8} {}", item_kind, count);
    }
    if let Some(bounds) = list.bounds() {
        println!(
            "  bounds   {:.1},{:.1} {:.1}x{:.1}",
            bounds.x, bounds.y, bounds.width, bounds.height
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let frame = frame_duration(args.frame_ms)?;
    ensure!(
        args.width.is_finite() && args.height.is_finite() && args.width > 0.0 && args.height > 0.0,
        "viewport must be non-empty"
    );

    info!("Scene Showcase v{}", env!("CARGO_PKG_VERSION"));

    let config = build_config(&args);
    let fetcher: Arc<dyn Fetcher> = if args.offline {
        info!("Offline mode");
        Arc::new(MemoryFetcher::new())
    } else {
        Arc::new(ResourceLoader::new(Arc::new(http_client(&args)?)))
    };

    let mut director = SceneDirector::new(SceneContext::new(config, fetcher));
    let kinds = if args.all {
        SceneKind::ALL.to_vec()
    } else {
        vec![args.scene]
    };

    for kind in kinds {
        run_scene(&mut director, kind, &args, frame).await;
    }

    info!("Showcase finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default() {
        let args = Args::parse_from(["scene-showcase"]);
        assert_eq!(args.scene, SceneKind::AceOfShadows);
        assert_eq!(args.frames, 300);
        assert!(!args.offline);
        assert!(!args.realtime);
    }

    #[test]
    fn test_args_scene() {
        let args = Args::parse_from(["scene-showcase", "--scene", "magic-words", "--seed", "3"]);
        assert_eq!(args.scene, SceneKind::MagicWords);
        assert_eq!(args.seed, Some(3));
    }

    #[test]
    fn test_args_unknown_scene() {
        assert!(Args::try_parse_from(["scene-showcase", "--scene", "solitaire"]).is_err());
    }

    #[test]
    fn test_frame_duration() {
        assert_eq!(frame_duration(250.0).unwrap(), Duration::from_millis(250));
        assert!(frame_duration(0.0).is_err());
        assert!(frame_duration(-5.0).is_err());
        assert!(frame_duration(f32::INFINITY).is_err());
        assert!(frame_duration(f32::NAN).is_err());
        assert!(frame_duration(f32::MAX).is_err());
    }

    #[test]
    fn test_args_accept_infinite_frame_ms() {
        let args = Args::parse_from(["scene-showcase", "--frame-ms", "inf", "--realtime"]);
        assert!(frame_duration(args.frame_ms).is_err());
    }

    #[test]
    fn test_http_client_timeout() {
        let args = Args::parse_from(["scene-showcase", "--timeout", "3"]);
        let client = http_client(&args).unwrap();
        assert_eq!(client.config().timeout, Duration::from_secs(3));

        let args = Args::parse_from(["scene-showcase", "--timeout", "0"]);
        assert!(http_client(&args).is_err());
    }

    #[test]
    fn test_build_config() {
        let args = Args::parse_from([
            "scene-showcase",
            "--width",
            "375",
            "--height",
            "812",
            "--endpoint",
            "http://localhost:8080/dialogue",
        ]);
        let config = build_config(&args);
        assert_eq!(config.viewport_width, 375.0);
        assert_eq!(config.viewport_height, 812.0);
        assert_eq!(config.dialogue_endpoint, "http://localhost:8080/dialogue");
        assert_eq!(config.seed, None);
    }
}
