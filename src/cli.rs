use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

use crate::weatherapi::BASE_URL;

const ABOUT: &str = "City weather TUI";

const LONG_ABOUT: &str = "
TUI for looking up current conditions and a three day forecast for any city, sourced from
weatherapi.com.

An API key from https://www.weatherapi.com is required. Pass it with --api-key or set the APIKEY
environment variable. Type a city name and press Enter to search; Esc quits.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(default_value = "Kolkata", help = "City to show on startup")]
    pub city: String,

    #[arg(long, env = "APIKEY", hide_env_values = true, help = "weatherapi.com API key")]
    pub api_key: Option<String>,

    #[arg(long, hide = true, default_value = BASE_URL)]
    pub base_url: String,

    #[arg(long, help = "Log file (defaults to skyview.log in the temp directory)")]
    pub log_file: Option<PathBuf>,
}
