//! bytes-as-braille
//!
//! Command line front end: render bytes, parse glyphs back, show a binary
//! clock or read bytes interactively.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use bytes_as_braille::clock::{binary_clock, DEFAULT_FORMAT};
use bytes_as_braille::codec::{decode, ByteOrder, Renderer};
use bytes_as_braille::color::Colorizer;
use bytes_as_braille::config::Config;
use bytes_as_braille::input::{InputError, InputMode, Prompt};
use bytes_as_braille::telemetry;

const USAGE: &str = "usage:
  bytes-as-braille encode [--hex] [--little] [--ascii] [--raw] [--no-color] <data>
  bytes-as-braille decode [--little] <text>
  bytes-as-braille clock [format]
  bytes-as-braille input [--async] [--mode default|integer|braille]";

/// Conventional exit status after Ctrl-C
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    // Parse arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    let mut config = Config::load().context("loading config")?;
    telemetry::init_tracing(&config);

    match command.as_str() {
        "encode" => run_encode(&mut config, rest),
        "decode" => run_decode(&mut config, rest),
        "clock" => run_clock(&config, rest),
        "input" => run_input(&config, rest),
        "-h" | "--help" | "help" => {
            println!("{USAGE}");
            Ok(ExitCode::SUCCESS)
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }
}

/// Split flags from the single positional argument
fn split_args<'a>(args: &'a [String], known: &[&str]) -> Result<(Vec<&'a str>, Option<&'a str>)> {
    let mut flags = Vec::new();
    let mut positional = None;
    for arg in args {
        if known.contains(&arg.as_str()) {
            flags.push(arg.as_str());
        } else if arg.starts_with("--") {
            bail!("unknown option {arg:?}");
        } else if positional.replace(arg.as_str()).is_some() {
            bail!("unexpected argument {arg:?}");
        }
    }
    Ok((flags, positional))
}

fn colorizer_for(config: &Config) -> Box<dyn Colorizer> {
    config.color_mode().colorizer()
}

fn run_encode(config: &mut Config, args: &[String]) -> Result<ExitCode> {
    let (flags, data) = split_args(args, &["--hex", "--little", "--ascii", "--raw", "--no-color"])?;
    let data = data.context("missing <data>")?;

    let bytes = if flags.contains(&"--hex") {
        hex::decode(data.strip_prefix("0x").unwrap_or(data)).context("invalid hex data")?
    } else {
        data.as_bytes().to_vec()
    };

    if flags.contains(&"--little") {
        config.byte_order = ByteOrder::Little;
    }
    if flags.contains(&"--ascii") {
        config.show_ascii = true;
    }
    if flags.contains(&"--no-color") {
        config.colorblind = true;
    }
    let mut options = config.render_options();
    if flags.contains(&"--raw") {
        options = options.encoding(None);
    }

    let palette = config.palette()?;
    let colorizer = colorizer_for(config);
    println!("{}", Renderer::new(options, &palette, colorizer.as_ref()).render(&bytes));
    Ok(ExitCode::SUCCESS)
}

fn run_decode(config: &mut Config, args: &[String]) -> Result<ExitCode> {
    let (flags, text) = split_args(args, &["--little"])?;
    let text = text.context("missing <text>")?;
    if flags.contains(&"--little") {
        config.byte_order = ByteOrder::Little;
    }

    let bytes = decode(text, config.byte_order, config.encoding)?;
    println!("{}", hex::encode(bytes));
    Ok(ExitCode::SUCCESS)
}

fn run_clock(config: &Config, args: &[String]) -> Result<ExitCode> {
    let format = args.first().map(String::as_str).unwrap_or(DEFAULT_FORMAT);
    let palette = config.palette()?;
    let colorizer = colorizer_for(config);
    let renderer = Renderer::new(config.render_options(), &palette, colorizer.as_ref());
    println!("{}", binary_clock(format, &renderer)?);
    Ok(ExitCode::SUCCESS)
}

fn run_input(config: &Config, args: &[String]) -> Result<ExitCode> {
    let mut use_async = false;
    let mut mode = InputMode::Default;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--async" => use_async = true,
            "--mode" => {
                let value = iter.next().context("--mode needs a value")?;
                mode = value.parse().map_err(anyhow::Error::msg)?;
            }
            other => bail!("unexpected argument {other:?}"),
        }
    }

    let palette = config.palette()?;
    let colorizer: Arc<dyn Colorizer> = Arc::from(colorizer_for(config));
    let prompt = Prompt::new()
        .mode(mode)
        .conversion(config.conversion())
        .palette(palette.clone())
        .colorizer(colorizer.clone());
    let renderer = Renderer::new(config.render_options(), &palette, colorizer.as_ref());

    let runtime = if use_async {
        Some(
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("starting async runtime")?,
        )
    } else {
        None
    };

    loop {
        let result = match &runtime {
            Some(rt) => rt.block_on(prompt.read_async()),
            None => prompt.read(),
        };
        match result {
            Ok(Some(bytes)) => println!("{}  {}", renderer.render(&bytes), hex::encode(&bytes)),
            Ok(None) => {}
            Err(InputError::EndOfInput) => return Ok(ExitCode::SUCCESS),
            Err(InputError::Interrupted) => return Ok(ExitCode::from(EXIT_INTERRUPTED)),
            Err(InputError::Codec(e)) => eprintln!("{e}"),
            Err(e) => return Err(e).context("reading input"),
        }
    }
}
