//! Command-line interface for codeparser
//! This binary extracts sections, code and file lists from saved model responses.
//!
//! Usage:
//!   codeparser blocks `<path>`                          - List every section
//!   codeparser block `<heading>` `<path>`               - Print one section body
//!   codeparser code `<heading>` `<path>` [--lang `<l>`]   - Print a section's fenced code
//!   codeparser str `<index>` `<path>`                   - Print the value of a numbered section
//!   codeparser files `<heading>` `<path>` [--lang `<l>`]  - Print a section's file list
//!   codeparser fence `<path>` [--lang `<l>`]              - Print the first fenced block
//!
//! `<path>` may be `-` to read standard input. `--format` selects text, json or yaml.
//! Settings come from `--config <file>` or, without it, from `./codeparser.toml` if it
//! exists.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use codeparser::{extract_code_block, CodeParser, Loader};

/// Project configuration picked up from the working directory when present
const LOCAL_CONFIG: &str = "codeparser.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
    Yaml,
}

impl Format {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "yaml" => Ok(Format::Yaml),
            other => bail!("unknown format '{}'", other),
        }
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the response file, or '-' for stdin")
        .required(true)
}

fn heading_arg() -> Arg {
    Arg::new("heading")
        .help("Heading of the section to read")
        .required(true)
}

fn lang_arg() -> Arg {
    Arg::new("lang")
        .long("lang")
        .short('l')
        .help("Preferred code language (e.g., 'python', 'json')")
}

fn cli() -> Command {
    Command::new("codeparser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract structured artifacts from LLM markdown responses")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the defaults (default: ./codeparser.toml)")
                .global(true),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: text, json or yaml")
                .default_value("text")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("blocks")
                .about("List every section")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("block")
                .about("Print the body of one section")
                .arg(heading_arg())
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("code")
                .about("Print the fenced code of one section")
                .arg(heading_arg())
                .arg(path_arg())
                .arg(lang_arg()),
        )
        .subcommand(
            Command::new("str")
                .about("Print the value held by a numbered section")
                .arg(
                    Arg::new("index")
                        .help("Section number (1-based)")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                )
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("files")
                .about("Print the file list of one section")
                .arg(heading_arg())
                .arg(path_arg())
                .arg(lang_arg()),
        )
        .subcommand(
            Command::new("fence")
                .about("Print the first fenced block of the whole response")
                .arg(path_arg())
                .arg(lang_arg()),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let filter = if matches.get_flag("verbose") {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let format = Format::parse(
        matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text"),
    )?;
    let parser = build_parser(matches.get_one::<String>("config"))?;

    let (name, sub) = matches
        .subcommand()
        .context("a subcommand is required")?;
    let output = run(&parser, name, sub, format)?;
    print!("{}", output);
    Ok(())
}

fn build_parser(config_path: Option<&String>) -> Result<CodeParser> {
    let loader = match config_path {
        Some(path) => {
            debug!(path = path.as_str(), "loading configuration file");
            Loader::new().with_file(path)
        }
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    let config = loader.build().context("invalid configuration")?;
    Ok(CodeParser::new(config))
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("reading standard input")?;
        return Ok(source);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path))
}

fn required<'m>(matches: &'m ArgMatches, id: &str) -> Result<&'m str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("missing argument '{}'", id))
}

fn run(parser: &CodeParser, name: &str, sub: &ArgMatches, format: Format) -> Result<String> {
    let source = read_input(required(sub, "path")?)?;
    let lang = sub
        .try_get_one::<String>("lang")
        .ok()
        .flatten()
        .map(String::as_str);

    match name {
        "blocks" => {
            let blocks = parser.parse_blocks(&source);
            render(&blocks, format, || {
                blocks
                    .keys()
                    .iter()
                    .map(|key| format!("## {}\n{}\n\n", key, blocks.get(key).unwrap_or_default()))
                    .collect()
            })
        }
        "block" => {
            let body = parser.parse_block(required(sub, "heading")?, &source)?;
            render(body, format, || text_line(body))
        }
        "code" => {
            let code = parser.parse_code(required(sub, "heading")?, &source, lang)?;
            render(code, format, || code.to_string())
        }
        "str" => {
            let index = sub
                .get_one::<usize>("index")
                .copied()
                .context("missing argument 'index'")?;
            let value = parser.parse_str(index, &source)?;
            render(value, format, || text_line(value))
        }
        "files" => {
            let files = parser.parse_file_list(required(sub, "heading")?, &source, lang)?;
            render(&files, format, || {
                files.iter().map(|file| text_line(file)).collect()
            })
        }
        "fence" => {
            let code = extract_code_block(&source, lang);
            render(code, format, || code.to_string())
        }
        other => bail!("unknown subcommand '{}'", other),
    }
}

fn text_line(value: &str) -> String {
    format!("{}\n", value)
}

fn render<T>(value: &T, format: Format, text: impl FnOnce() -> String) -> Result<String>
where
    T: Serialize + ?Sized,
{
    match format {
        Format::Text => Ok(text()),
        Format::Json => {
            let mut out = serde_json::to_string_pretty(value).context("serializing to JSON")?;
            out.push('\n');
            Ok(out)
        }
        Format::Yaml => serde_yaml::to_string(value).context("serializing to YAML"),
    }
}
