// Copyright (c) 2026 rezky_nightky

mod config;

use std::env;
use std::fmt::Display;
use std::time::{Duration, Instant};

use clap::builder::styling::{AnsiColor, Styles};
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use rainstorm::frame::{Frame, Layers};
use rainstorm::palette::{parse_hex_rgb, terminal_color};
use rainstorm::runtime::ColorMode;
use rainstorm::terminal::{restore_terminal_best_effort, Terminal};
use rainstorm::{Host, RainConfig, RainFx, RainOptions, Viewport};

use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_help_detail, Args, CellPx,
};

const MIN_DENSITY: f64 = 0.00002;
const MAX_DENSITY: f64 = 0.01;
const MAX_WIND: f32 = 2000.0;
const MIN_GRAVITY: f32 = 300.0;
const MAX_GRAVITY: f32 = 10000.0;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Yellow.on_default())
        .placeholder(AnsiColor::Magenta.on_default())
}

fn help_template(color: bool) -> String {
    let usage = if color {
        "\x1b[1;36mUSAGE:\x1b[0m"
    } else {
        "USAGE:"
    };
    format!("{{before-help}}{{about-with-newline}}\n{usage}\n  {{usage}}\n\n{{all-args}}{{after-help}}")
}

fn fail(msg: impl Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn require_range<T: PartialOrd + Display>(name: &str, v: T, min: T, max: T) -> T {
    if v < min || v > max {
        fail(format_args!("failed to apply {name} {v} (min {min} max {max})"));
    }
    v
}

fn require_finite<T: Into<f64> + Copy + Display>(name: &str, v: T) -> T {
    if !v.into().is_finite() {
        fail(format_args!("failed to apply {name} {v} (must be a finite number)"));
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        ColorMode::TrueColor
    } else if term == "dumb" {
        ColorMode::Mono
    } else if term.contains("256color") {
        ColorMode::Color256
    } else {
        ColorMode::Color16
    }
}

fn color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        None => detect_color_mode_auto(),
        Some(0) => ColorMode::Mono,
        Some(16) => ColorMode::Color16,
        Some(8 | 256) => ColorMode::Color256,
        Some(24 | 32) => ColorMode::TrueColor,
        Some(m) => fail(format_args!("invalid --colormode: {m} (allowed: 0,16,8/256,24/32)")),
    }
}

fn print_bitcolor(args: &Args) {
    let show = |v: String| if v.is_empty() { "(unset)".to_string() } else { v };
    println!("BITCOLOR CHECK:");
    println!("  COLORTERM: {}", show(env::var("COLORTERM").unwrap_or_default()));
    println!("  TERM: {}", show(env::var("TERM").unwrap_or_default()));
    println!("  auto_detected: {}", detect_color_mode_auto().label());
    if args.colormode.is_some() {
        println!("  forced: {}", color_mode(args).label());
    }
    println!("  effective: {}", color_mode(args).label());
}

fn print_info() {
    println!("Version: v{}", env!("CARGO_PKG_VERSION"));
    println!("Build: {}", env!("RAINSTORM_BUILD"));
    println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
}

fn install_restore_hooks() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{info}");
    }));

    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            std::thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {e}");
        }
    }
}

/// Validated settings for one run.
struct Settings {
    rain: RainConfig,
    seed: Option<u64>,
    period: Duration,
    run_for: Option<Duration>,
    cell: CellPx,
    page: (u8, u8, u8),
    mode: ColorMode,
    screensaver: bool,
}

impl Settings {
    fn from_args(args: &Args) -> Self {
        let fps = require_range("--fps", require_finite("--fps", args.fps), 1.0, 240.0);
        let run_for = args
            .duration
            .map(|s| require_finite("--duration", s))
            .filter(|&s| s > 0.0)
            .map(|s| Duration::from_secs_f64(require_range("--duration", s, 0.1, 86400.0)));

        let mut rain = RainConfig {
            density: require_range(
                "--density",
                require_finite("--density", args.density),
                MIN_DENSITY,
                MAX_DENSITY,
            ),
            wind: require_range(
                "--wind",
                require_finite("--wind", args.wind),
                -MAX_WIND,
                MAX_WIND,
            ),
            gravity: require_range(
                "--gravity",
                require_finite("--gravity", args.gravity),
                MIN_GRAVITY,
                MAX_GRAVITY,
            ),
            base_dim: require_range("--base-dim", require_finite("--base-dim", args.base_dim), 0.0, 1.0),
        };
        if let Some(list) = &args.set {
            let opts: RainOptions = list.parse().unwrap_or_default();
            if opts.is_empty() {
                log::warn!("--set {list:?} had no usable options");
            }
            rain.apply(&opts);
        }

        Self {
            rain,
            seed: args.seed,
            period: Duration::from_secs_f64(1.0 / fps),
            run_for,
            cell: CellPx {
                width: require_range("--cell-px width", args.cell_px.width, 1, 64),
                height: require_range("--cell-px height", args.cell_px.height, 1, 64),
            },
            page: parse_hex_rgb(&args.page_color).unwrap_or_else(|e| fail(e)),
            mode: color_mode(args),
            screensaver: args.screensaver,
        }
    }

    /// Logical viewport for a terminal of `cols` x `rows` cells, two device
    /// pixels tall per cell.
    fn viewport(&self, cols: u16, rows: u16) -> Viewport {
        Viewport::new(
            cols as f32 * self.cell.width as f32,
            rows as f32 * self.cell.height as f32,
            2.0 / self.cell.height as f32,
        )
    }
}

/// Applies a tweak computed from the current config of the active effect.
fn nudge(host: &mut Host, tweak: impl FnOnce(&RainConfig) -> RainOptions) {
    if let Some(fx) = host.current_mut() {
        let opts = tweak(fx.config());
        fx.set(&opts);
    }
}

struct Storm {
    settings: Settings,
    host: Host,
    viewport: Viewport,
    restarts: u64,
}

impl Storm {
    fn new(settings: Settings, cols: u16, rows: u16) -> Self {
        let viewport = settings.viewport(cols, rows);
        let mut host = Host::new();
        host.install(RainFx::new(viewport, settings.rain, settings.seed));
        Self {
            settings,
            host,
            viewport,
            restarts: 0,
        }
    }

    /// Reacts to a key press. Returns false when the program should quit.
    fn on_key(&mut self, code: KeyCode) -> bool {
        if self.settings.screensaver {
            return false;
        }
        let host = &mut self.host;
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return false,
            KeyCode::Char('s') => {
                if let Some(fx) = host.current_mut() {
                    if fx.is_running() {
                        fx.stop();
                    } else {
                        fx.start();
                    }
                }
            }
            KeyCode::Char(' ') => {
                let cfg = host.current().map_or(self.settings.rain, |fx| *fx.config());
                self.restarts += 1;
                let seed = self.settings.seed.map(|s| s.wrapping_add(self.restarts));
                host.install(RainFx::new(self.viewport, cfg, seed));
            }
            KeyCode::Char('f') => {
                if let Some(fx) = host.current_mut() {
                    fx.flash_now();
                }
            }
            KeyCode::Up => nudge(host, |c| RainOptions {
                gravity: Some((c.gravity + 100.0).min(MAX_GRAVITY)),
                ..Default::default()
            }),
            KeyCode::Down => nudge(host, |c| RainOptions {
                gravity: Some(c.gravity - 100.0),
                ..Default::default()
            }),
            KeyCode::Left | KeyCode::Right => {
                let step = if code == KeyCode::Left { -20.0 } else { 20.0 };
                nudge(host, |c| RainOptions {
                    wind: Some((c.wind + step).clamp(-MAX_WIND, MAX_WIND)),
                    ..Default::default()
                })
            }
            KeyCode::Char('+' | '=') => nudge(host, |c| RainOptions {
                density: Some((c.density * 1.25).min(MAX_DENSITY)),
                ..Default::default()
            }),
            KeyCode::Char('-') => nudge(host, |c| RainOptions {
                density: Some(c.density / 1.25),
                ..Default::default()
            }),
            KeyCode::Char(key @ ('[' | ']')) => {
                let step = if key == ']' { 0.05 } else { -0.05 };
                nudge(host, |c| RainOptions {
                    base_dim: Some(c.base_dim + step),
                    ..Default::default()
                })
            }
            _ => {}
        }
        true
    }

    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.viewport = self.settings.viewport(cols, rows);
        if let Some(fx) = self.host.current_mut() {
            fx.resize(self.viewport);
        }
    }

    fn step(&mut self, frame: &mut Frame) {
        if let Some(fx) = self.host.current_mut() {
            fx.frame(Instant::now());
        }
        let layers = self.host.current().and_then(|fx| {
            fx.surface().map(|rain| Layers {
                rain,
                overlay: fx.overlay_opacity(),
            })
        });
        frame.compose(layers, self.settings.page, self.settings.mode);
    }
}

fn run(settings: Settings) -> std::io::Result<()> {
    let mut term = Terminal::new()?;
    let (cols, rows) = term.size()?;
    let blank_bg = terminal_color(settings.mode, settings.page);
    let period = settings.period;
    let deadline = settings.run_for.map(|d| Instant::now() + d);

    let mut storm = Storm::new(settings, cols, rows);
    let mut frame = Frame::new(cols, rows, blank_bg);
    let mut next_frame = Instant::now();

    'frames: loop {
        // Drain input until the next frame is due.
        loop {
            let now = Instant::now();
            if deadline.is_some_and(|d| now >= d) {
                break 'frames;
            }
            let due = next_frame.saturating_duration_since(now);
            let wait = deadline.map_or(due, |d| due.min(d - now));
            if !event::poll(wait)? {
                break;
            }
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    let interrupt = k.code == KeyCode::Char('c')
                        && k.modifiers.contains(KeyModifiers::CONTROL);
                    if interrupt || !storm.on_key(k.code) {
                        break 'frames;
                    }
                }
                Event::Resize(nc, nr) => {
                    storm.on_resize(nc, nr);
                    frame = Frame::new(nc, nr, blank_bg);
                    term.invalidate();
                }
                _ => {}
            }
        }

        storm.step(&mut frame);
        if frame.has_changes() {
            term.draw(&mut frame)?;
        }

        next_frame += period;
        next_frame = next_frame.max(Instant::now());
    }

    if let Some(fx) = storm.host.take() {
        log::info!("exiting after {} frames", fx.frames());
    }
    Ok(())
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    install_restore_hooks();

    let mut cmd = Args::command()
        .styles(styles())
        .before_help(default_params_usage_for_help())
        .help_template(help_template(color_enabled_stdout()));
    cmd.build();
    if cmd.get_arguments().any(|a| a.get_id() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let args = Args::from_arg_matches(&cmd.get_matches()).unwrap_or_else(|e| e.exit());

    if args.help_detail {
        print_help_detail();
    } else if args.check_bitcolor {
        print_bitcolor(&args);
    } else if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    } else if args.info {
        print_info();
    } else {
        run(Settings::from_args(&args))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn settings(argv: &[&str]) -> Settings {
        let args = Args::try_parse_from(std::iter::once("rainstorm").chain(argv.iter().copied()))
            .unwrap();
        Settings::from_args(&args)
    }

    #[test]
    fn in_range_values_pass_through_unchanged() {
        assert_eq!(require_range("--fps", 60.0, 1.0, 240.0), 60.0);
        assert_eq!(require_range("--wind", -2000.0f32, -MAX_WIND, MAX_WIND), -2000.0);
        assert_eq!(require_range("--cell-px width", 64u16, 1, 64), 64);
        assert_eq!(require_finite("--base-dim", 0.5f32), 0.5);
    }

    #[test]
    fn settings_take_cli_values_and_set_overrides() {
        let s = settings(&["--gravity", "2000", "--set", "wind=-40,junk=1", "--fps", "30"]);
        assert_eq!(s.rain.gravity, 2000.0);
        assert_eq!(s.rain.wind, -40.0);
        assert_eq!(s.period, Duration::from_secs_f64(1.0 / 30.0));
        assert!(s.run_for.is_none());
        assert_eq!(s.page, (0x7a, 0x85, 0x99));
    }

    #[test]
    fn non_positive_duration_runs_forever() {
        assert!(settings(&["--duration", "0"]).run_for.is_none());
        assert_eq!(
            settings(&["--duration", "2.5"]).run_for,
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn viewport_maps_cells_to_two_device_rows() {
        let s = settings(&["--cell-px", "8x16"]);
        let vp = s.viewport(80, 24);
        assert_eq!((vp.width, vp.height), (640.0, 384.0));
        assert_eq!(vp.device_size(), (80, 48));
    }

    #[test]
    fn keys_tune_the_running_effect() {
        let mut storm = Storm::new(settings(&["--seed", "3"]), 40, 12);
        let before = *storm.host.current().unwrap().config();

        assert!(storm.on_key(KeyCode::Up));
        assert!(storm.on_key(KeyCode::Left));
        assert!(storm.on_key(KeyCode::Char(']')));
        let cfg = *storm.host.current().unwrap().config();
        assert_eq!(cfg.gravity, before.gravity + 100.0);
        assert_eq!(cfg.wind, before.wind - 20.0);
        assert!((cfg.base_dim - (before.base_dim + 0.05)).abs() < 1e-6);

        assert!(storm.on_key(KeyCode::Char('s')));
        assert!(!storm.host.current().unwrap().is_running());
        assert!(storm.on_key(KeyCode::Char(' ')));
        assert_eq!(storm.restarts, 1);
        assert_eq!(*storm.host.current().unwrap().config(), cfg);

        assert!(!storm.on_key(KeyCode::Char('q')));
    }

    #[test]
    fn screensaver_quits_on_any_key() {
        let mut storm = Storm::new(settings(&["-s"]), 10, 5);
        assert!(!storm.on_key(KeyCode::Up));
    }
}
