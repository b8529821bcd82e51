// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::str::FromStr;

use clap::Parser;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  rainstorm --density 0.00012 --wind 0 --gravity 1400 --base-dim 0.58 --fps 60 --cell-px 8x16 --page-color 7a8599";

pub fn color_enabled_stdout() -> bool {
    let clicolor_off = std::env::var("CLICOLOR").is_ok_and(|v| v == "0");
    std::env::var_os("NO_COLOR").is_none() && !clicolor_off && std::io::stdout().is_terminal()
}

const HEADING: &str = "\x1b[1;36m";
const EXAMPLE: &str = "\x1b[32m";
const COMMAND: &str = "\x1b[1;34m";
const FLAG: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Paints one line of the detailed help. Lines keep their leading indent.
fn paint_line(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    if indent.is_empty() && body.ends_with(':') && body == body.to_ascii_uppercase() {
        return format!("{HEADING}{body}{RESET}");
    }
    if let Some(rest) = body.strip_prefix("Example:") {
        return format!("{indent}{EXAMPLE}Example:{RESET}{rest}");
    }
    if let Some(rest) = body.strip_prefix("rainstorm") {
        return format!("{indent}{COMMAND}rainstorm{RESET}{rest}");
    }
    if body.starts_with('-') {
        return format!("{indent}{FLAG}{body}{RESET}");
    }
    line.to_string()
}

fn colorize_help_detail(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|chunk| match chunk.strip_suffix('\n') {
            Some(line) => paint_line(line) + "\n",
            None => paint_line(chunk),
        })
        .collect()
}

fn print_colored(text: &str) {
    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(text));
    } else {
        print!("{text}");
    }
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

/// Logical pixel size of one terminal cell, `WxH`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPx {
    pub width: u16,
    pub height: u16,
}

impl FromStr for CellPx {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| "expected: WIDTHxHEIGHT".to_string())?;
        let width: u16 = a
            .trim()
            .parse()
            .map_err(|_| "invalid width".to_string())?;
        let height: u16 = b
            .trim()
            .parse()
            .map_err(|_| "invalid height".to_string())?;
        if width == 0 || height == 0 {
            return Err("cell size must be >0".to_string());
        }
        Ok(Self { width, height })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rainstorm", version, disable_version_flag = true)]
pub struct Args {
    /// Drops per square px (min 0.00002 max 0.01)
    #[arg(short, long, default_value_t = 0.00012, help_heading = "RAIN")]
    pub density: f64,

    /// Horizontal drift in px/s (min -2000 max 2000)
    #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true, help_heading = "RAIN")]
    pub wind: f32,

    /// Fall speed in px/s (min 300 max 10000)
    #[arg(short, long, default_value_t = 1400.0, help_heading = "RAIN")]
    pub gravity: f32,

    /// Extra options as key=value,... (density, wind, gravity, baseDim); unknown keys are ignored
    #[arg(long, help_heading = "RAIN")]
    pub set: Option<String>,

    /// Idle darkness between flashes (min 0 max 1)
    #[arg(short = 'D', long, default_value_t = 0.58, help_heading = "LIGHTNING")]
    pub base_dim: f32,

    /// Logical px per terminal cell: WxH (min 1 max 64 each)
    #[arg(long, default_value = "8x16", help_heading = "APPEARANCE")]
    pub cell_px: CellPx,

    /// Page color under the rain, hex rrggbb
    #[arg(long, default_value = "7a8599", help_heading = "APPEARANCE")]
    pub page_color: String,

    /// Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if
    /// COLORTERM says so, else 8-bit for TERM=*256color, else 16-color
    #[arg(long, help_heading = "APPEARANCE")]
    pub colormode: Option<u16>,

    /// Random seed for a repeatable storm
    #[arg(long, help_heading = "GENERAL")]
    pub seed: Option<u64>,

    /// Stop after N seconds (min 0.1 max 86400; <=0 disables)
    #[arg(long, help_heading = "GENERAL")]
    pub duration: Option<f64>,

    /// Screensaver mode (exit on keypress)
    #[arg(short, long, help_heading = "GENERAL")]
    pub screensaver: bool,

    /// Target FPS (min 1 max 240)
    #[arg(short, long, default_value_t = 60.0, help_heading = "PERFORMANCE")]
    pub fps: f64,

    /// Print detected terminal color capability and exit
    #[arg(long, help_heading = "HELP")]
    pub check_bitcolor: bool,

    /// Show detailed help for all parameters and exit
    #[arg(long, help_heading = "HELP")]
    pub help_detail: bool,

    /// Print version info and exit
    #[arg(short, long, help_heading = "HELP")]
    pub info: bool,

    /// Print version and exit
    #[arg(short, long, help_heading = "HELP")]
    pub version: bool,
}

/// Detailed help sections: heading, then `(flag, description, example)`.
const DETAIL: &[(&str, &[(&str, &str, &str)])] = &[
    ("RAIN", &[
        ("-d, --density <number>", "Drops per square px (min 0.00002 max 0.01).", "--density 0.0003"),
        ("-w, --wind <px/s>", "Horizontal drift; negative blows left (min -2000 max 2000).", "--wind -150"),
        ("-g, --gravity <px/s>", "Fall speed (min 300 max 10000).", "--gravity 2200"),
        ("--set <key=value,...>", "Lenient option list; unknown keys and bad values are skipped.", "--set density=0.0002,wind=40"),
    ]),
    ("LIGHTNING", &[
        ("-D, --base-dim <number>", "Idle darkness between flashes (min 0 max 1).", "--base-dim 0.7"),
    ]),
    ("APPEARANCE", &[
        ("--cell-px <WxH>", "Logical px per terminal cell (min 1 max 64 each).", "--cell-px 10x20"),
        ("--page-color <hex>", "Page color under the rain.", "--page-color 1b2330"),
        ("--colormode <0|16|8|24>", "Force color mode; otherwise auto-detected from COLORTERM/TERM.", "--colormode 24"),
    ]),
    ("GENERAL", &[
        ("-s, --screensaver", "Screensaver mode (exit on keypress).", "-s"),
        ("--duration <seconds>", "Stop after N seconds (min 0.1 max 86400; <=0 disables).", "--duration 10"),
        ("--seed <number>", "Random seed for a repeatable storm.", "--seed 7"),
    ]),
    ("PERFORMANCE", &[
        ("-f, --fps <number>", "Target FPS (min 1 max 240).", "--fps 30"),
    ]),
    ("HELP", &[
        ("--check-bitcolor", "Print detected terminal color capability and exit.", ""),
        ("--help", "Show short help.", ""),
        ("--help-detail", "Show this detailed help.", ""),
        ("-v, --version", "Print version and exit.", ""),
        ("-i, --info", "Print version info and exit.", ""),
    ]),
];

const KEYS: &[(&str, &str)] = &[
    ("q, Esc", "quit"),
    ("s", "stop / start"),
    ("space", "restart with a fresh storm"),
    ("f", "flash now"),
    ("Up/Down", "gravity +/-100"),
    ("Left/Right", "wind -/+20"),
    ("+/-", "density x/÷1.25"),
    ("]/[", "base dim +/-0.05"),
];

fn help_detail_text() -> String {
    let mut text = format!("{DEFAULT_PARAMS_USAGE}\n\nUSAGE:\n  rainstorm [OPTIONS]\n");
    for (heading, entries) in DETAIL {
        text.push_str(&format!("\n{heading}:\n"));
        for (i, (flag, desc, example)) in entries.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(&format!("  {flag}\n      {desc}\n"));
            if !example.is_empty() {
                text.push_str(&format!("      Example: rainstorm {example}\n"));
            }
        }
    }
    text.push_str("\nKEYS:\n");
    for (key, action) in KEYS {
        text.push_str(&format!("  {key:<11} {action}\n"));
    }
    text
}

pub fn print_help_detail() {
    print_colored(&help_detail_text());
}
