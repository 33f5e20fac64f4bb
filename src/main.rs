// SPDX-License-Identifier: MIT
//
// termscope — live data as animated braille graphics in a terminal.
//
// The host process: parses the CLI, builds the canvas and the requested
// viewer, then runs three threads — the fixed-rate render loop (this
// thread), the raw-keyboard reader, and a synthetic data generator
// standing in for an external message bus. The viewer sits behind a
// mutex; update, keypress, and draw serialize through it.
//
// The Terminal guard owns raw mode for the whole run and restores the
// user's terminal on every exit path, panics included.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use scope_canvas::{Canvas, CanvasOptions, ColorTier, KeyReader, KeyToken, Terminal};
use scope_view::{Message, Viewer, ViewerRegistry};

/// How often the synthetic data thread emits a message.
const DATA_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(
    name = "termscope",
    version,
    about = "Live data as animated braille graphics in an ordinary terminal"
)]
struct Cli {
    /// Data source kind: scalar, angle, scan, points2, or cloud.
    source: String,

    /// Render with ASCII-art glyphs instead of Unicode braille.
    #[arg(long)]
    ascii: bool,

    /// Force a color tier instead of autodetecting from the environment.
    #[arg(long, value_enum)]
    color: Option<ColorArg>,

    /// Target frame rate.
    #[arg(long, default_value_t = 15)]
    fps: u32,

    /// Plot title, where the viewer supports one.
    #[arg(long)]
    title: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorArg {
    Mono,
    Ansi16,
    Truecolor,
}

impl From<ColorArg> for ColorTier {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Mono => Self::Monochrome,
            ColorArg::Ansi16 => Self::Ansi16,
            ColorArg::Truecolor => Self::TrueColor24,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("termscope: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ViewerRegistry::with_builtins();
    let options = CanvasOptions {
        ascii: cli.ascii,
        tier: cli.color.map(Into::into),
    };
    let canvas = Canvas::new(options)?;
    log::info!(
        "starting {} viewer at {} fps on a {}x{} terminal",
        cli.source,
        cli.fps,
        canvas.size().cols,
        canvas.size().rows
    );
    let viewer = registry.create(&cli.source, canvas, cli.title.clone())?;
    let viewer = Arc::new(Mutex::new(viewer));

    let mut terminal = Terminal::new()?;
    terminal.enter()?;

    let stop = Arc::new(AtomicBool::new(false));
    let data_handle = spawn_data_thread(&viewer, &stop, cli.source.clone());
    let (mut key_reader, keys) = KeyReader::spawn();

    let period = Duration::from_secs_f64(1.0 / f64::from(cli.fps.max(1)));
    let result = render_loop(&viewer, &keys, period);

    stop.store(true, Ordering::SeqCst);
    key_reader.stop();
    let _ = data_handle.join();
    terminal.leave()?;

    result.map_err(Into::into)
}

type SharedViewer = Arc<Mutex<Box<dyn Viewer>>>;

fn lock_viewer(viewer: &SharedViewer) -> std::sync::MutexGuard<'_, Box<dyn Viewer>> {
    match viewer.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// The fixed-rate render loop: drain keys, draw, sleep off the remainder
/// of the frame budget.
fn render_loop(
    viewer: &SharedViewer,
    keys: &Receiver<KeyToken>,
    period: Duration,
) -> Result<(), scope_canvas::CanvasError> {
    loop {
        let frame_start = Instant::now();
        let mut quit = false;

        {
            let mut guard = lock_viewer(viewer);
            loop {
                match keys.try_recv() {
                    Ok(KeyToken::Char('q' | 'Q' | '\x03')) => quit = true,
                    Ok(token) => guard.keypress(token),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        quit = true;
                        break;
                    }
                }
            }
            if !quit {
                guard.draw()?;
            }
        }

        if quit {
            log::info!("exiting");
            return Ok(());
        }

        let spent = frame_start.elapsed();
        if spent < period {
            thread::sleep(period - spent);
        }
    }
}

/// Feed the viewer synthetic messages at its own cadence, latest-wins.
fn spawn_data_thread(
    viewer: &SharedViewer,
    stop: &Arc<AtomicBool>,
    kind: String,
) -> thread::JoinHandle<()> {
    let viewer = Arc::clone(viewer);
    let stop = Arc::clone(stop);
    thread::spawn(move || {
        let start = Instant::now();
        while !stop.load(Ordering::SeqCst) {
            let t = start.elapsed().as_secs_f64();
            lock_viewer(&viewer).update(synth_message(&kind, t));
            thread::sleep(DATA_INTERVAL);
        }
    })
}

/// Synthetic stand-ins for an external message bus, one per source kind.
fn synth_message(kind: &str, t: f64) -> Message {
    match kind {
        "angle" => Message::Angle((t * 0.8).sin() * PI),
        "scan" => {
            // A wobbling room outline sweeping around the sensor.
            let beams = 180;
            let angle_min = -PI;
            let angle_increment = 2.0 * PI / f64::from(beams);
            let ranges = (0..beams)
                .map(|i| {
                    let angle = angle_min + f64::from(i) * angle_increment;
                    2.5 + 0.8 * (3.0 * angle + t).sin()
                })
                .collect();
            Message::Scan {
                angle_min,
                angle_increment,
                ranges,
            }
        }
        "points2" => {
            // A slowly morphing Lissajous ring.
            let points = (0..128)
                .map(|i| {
                    let a = f64::from(i) * 2.0 * PI / 128.0;
                    [2.0 * (a + 0.3 * t).sin(), 2.0 * (2.0 * a + 0.7 * t).sin()]
                })
                .collect();
            Message::Points2(points)
        }
        "cloud" => {
            // A spinning torus of sample points.
            let (major, minor) = (1.2, 0.5);
            let points = (0..400)
                .map(|i| {
                    let u = f64::from(i) * 0.39 + 0.2 * t;
                    let v = f64::from(i) * 2.39;
                    let ring = major + minor * v.cos();
                    #[allow(clippy::cast_possible_truncation)]
                    [
                        (ring * u.cos()) as f32,
                        (ring * u.sin()) as f32,
                        (minor * v.sin()) as f32,
                    ]
                })
                .collect();
            Message::Cloud(points)
        }
        _ => Message::Scalar(20.0 * t.sin() + 5.0 * (3.1 * t).sin()),
    }
}
