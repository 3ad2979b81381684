//! datview CLI - Drive viewport playback headlessly from a JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use datview::{
    CompositorDriver, ContainerParser, PlayerConfig, RasterDecoder, Rect, SurfaceCompositor,
    SurfaceId, decode::Bitmap, load_viewports,
};

/// Compositor that logs redraw requests instead of presenting them.
#[derive(Default)]
struct LogCompositor {
    redraws: Vec<u64>,
}

impl SurfaceCompositor<Bitmap> for LogCompositor {
    fn on_redraw_requested(&mut self, surface: SurfaceId, image: &Bitmap, target: Rect) {
        debug!(
            "redraw surface {}: {}x{} frame into {}x{} at ({}, {})",
            surface.0, image.width, image.height, target.width, target.height, target.x, target.y
        );
        if self.redraws.len() <= surface.0 {
            self.redraws.resize(surface.0 + 1, 0);
        }
        self.redraws[surface.0] += 1;
    }
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [duration_ms]", args[0]);
        eprintln!();
        eprintln!("Play .dat containers in their configured viewports.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to player configuration file");
        eprintln!("  duration_ms  How long to run the timer loop (default: 5000)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let duration_ms: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(5000);

    let config = PlayerConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {}", config_path.display(), e);
        std::process::exit(1);
    });

    println!("datview");
    println!("=======");
    println!("Viewports: {}", config.viewports.len());
    println!("Timer: {}ms", config.timer_interval_ms);
    println!("Duration: {}ms", duration_ms);
    println!();

    let mut parser = ContainerParser::new(RasterDecoder::new());
    let mut viewports = load_viewports(&config, &mut parser, Instant::now());

    for viewport in &viewports {
        let source = viewport
            .source()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match (viewport.scheduler().container(), viewport.load_error()) {
            (Some(container), _) => println!(
                "  Viewport {}: {} ({} frames, {}ms cycle)",
                viewport.surface().0,
                source,
                container.frame_count(),
                container.cycle_duration_ms()
            ),
            (None, Some(e)) => println!(
                "  Viewport {}: {} failed: {}",
                viewport.surface().0,
                source,
                e
            ),
            (None, None) => println!("  Viewport {}: unbound", viewport.surface().0),
        }
    }
    println!();

    // Initial paint, then tick until the duration runs out. A reset halfway
    // through stands in for the user's reset key.
    let mut driver = CompositorDriver::new();
    let mut compositor = LogCompositor::default();
    let interval = Duration::from_millis(u64::from(config.timer_interval_ms));
    let start = Instant::now();
    let end = start + Duration::from_millis(duration_ms);
    let mut reset_at = Some(start + Duration::from_millis(duration_ms / 2));

    driver.on_reset(&mut viewports, start, &mut compositor);

    println!("Running...");
    loop {
        thread::sleep(interval);
        let now = Instant::now();
        if now >= end {
            break;
        }
        if reset_at.is_some_and(|at| now >= at) {
            reset_at = None;
            driver.on_reset(&mut viewports, now, &mut compositor);
        }
        driver.on_timer(&mut viewports, now, &mut compositor);
    }

    let elapsed = start.elapsed();
    println!();
    println!("Summary:");
    println!("  {}", driver.stats());
    for (surface, count) in compositor.redraws.iter().enumerate() {
        println!("  Viewport {}: {} redraws", surface, count);
    }
    println!("Time: {:.2}s", elapsed.as_secs_f32());
}

fn print_example_config() {
    let config = PlayerConfig::default();

    println!("Example configuration (player.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing example config: {e}"),
    }
}
