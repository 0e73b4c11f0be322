extern crate clap;
extern crate env_logger;
extern crate mandelbrot;

use clap::{App, AppSettings, Arg, ArgMatches, ErrorKind};
use mandelbrot::{render, write_image, Canvas, RenderConfig};
use std::fmt::Display;
use std::process;
use std::str::FromStr;

fn validate_range<T: FromStr + Ord + Display>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(format!("{} must be between {} and {}", s, low, high))
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_dimension(s: String) -> Result<(), String> {
    match u32::from_str(&s) {
        Ok(n) if n > 0 => Ok(()),
        _ => Err(format!("invalid dimensions: \"{}\" is not a positive integer", s)),
    }
}

const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const OUTPUT: &str = "output";
const THREADS: &str = "threads";
const CACHE_LINE: &str = "cache-line";

fn args<'a>() -> Result<ArgMatches<'a>, clap::Error> {
    App::new("mandelbrot")
        .version("0.1.0")
        .about("Renders the Mandelbrot set with a pool of block-striped threads")
        .setting(AppSettings::ColorNever)
        .arg(
            Arg::with_name(WIDTH)
                .required(true)
                .index(1)
                .validator(validate_dimension)
                .help("Width of the image in pixels"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .required(true)
                .index(2)
                .validator(validate_dimension)
                .help("Height of the image in pixels"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("output.bmp")
                .help("Output file; the extension (.png or .bmp) picks the encoding"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("16")
                .validator(|s| validate_range(&s, 1usize, 1024, "Could not parse thread count"))
                .help("Number of render threads"),
        )
        .arg(
            Arg::with_name(CACHE_LINE)
                .long(CACHE_LINE)
                .short("c")
                .takes_value(true)
                .default_value("64")
                .validator(|s| validate_range(&s, 4usize, 4096, "Could not parse cache line size"))
                .help("Cache line size in bytes; threads are handed blocks of this size"),
        )
        .get_matches_safe()
}

/// Reports a fatal condition and exits.  Nothing is unwound and no
/// partial result is kept.
fn fail<E: Display>(message: E) -> ! {
    eprintln!("ERROR: {}", message);
    process::exit(1);
}

/// Clap's messages carry a usage block and a hint after the first
/// line; only the first line is reported.
fn usage_error(message: &str) -> &str {
    let first = message.lines().next().unwrap_or("invalid arguments");
    first.trim_start_matches("error:").trim_start()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> T {
    match matches.value_of(name).map(T::from_str) {
        Some(Ok(v)) => v,
        _ => fail(format!("could not parse {}", name)),
    }
}

fn main() {
    env_logger::init();

    let matches = match args() {
        Ok(matches) => matches,
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => e.exit(),
            _ => fail(usage_error(&e.message)),
        },
    };

    let width: u32 = value(&matches, WIDTH);
    let height: u32 = value(&matches, HEIGHT);
    let config = RenderConfig {
        workers: value(&matches, THREADS),
        cache_line_bytes: value(&matches, CACHE_LINE),
    };
    let outfile = matches.value_of(OUTPUT).unwrap_or("output.bmp");

    // Reject a bad filename before spending time on the render.
    if let Err(e) = mandelbrot::OutputFormat::from_path(outfile) {
        fail(e);
    }

    let mut canvas = match Canvas::new(width as usize, height as usize) {
        Ok(canvas) => canvas,
        Err(e) => fail(e),
    };

    if let Err(e) = render(&mut canvas, &config) {
        fail(e);
    }

    if let Err(e) = write_image(outfile, &canvas) {
        fail(e);
    }
}
