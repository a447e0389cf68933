use anyhow::{bail, Context, Result as AnyhowResult};
use clap::Parser;
use codeblock::config::Config;
use codeblock::primitives::language::LanguageTag;
use codeblock::services::clipboard::detect_system_clipboard;
use codeblock::services::tracing_setup;
use codeblock::view::code_block::{CodeBlock, CodeBlockProps, CopyOutcome};
use codeblock::view::html::render_html;
use codeblock::view::terminal::{write_ansi, write_plain};
use codeblock::view::theme::Theme;
use codeblock::view::widget::CodeBlockWidget;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Render source files as line-numbered, syntax-highlighted code blocks
#[derive(Parser, Debug)]
#[command(name = "fresh-codeblock")]
#[command(about = "Render a source file as a highlighted code block", long_about = None)]
#[command(version)]
struct Args {
    /// File to render, or "-" for stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Grammar to use (tsx, javascript, jsx, json, css, markup, plain); inferred from the filename when omitted
    #[arg(long, short = 'l', value_name = "LANGUAGE")]
    language: Option<LanguageTag>,

    /// Filename to show in the header (defaults to the file's name)
    #[arg(long, value_name = "NAME")]
    filename: Option<String>,

    /// Hide the line-number gutter
    #[arg(long)]
    no_line_numbers: bool,

    /// Extra class names for the HTML container
    #[arg(long, value_name = "CLASSES")]
    class_name: Option<String>,

    /// Output format: html, terminal or plain
    #[arg(long, short = 'f', default_value = "terminal")]
    format: OutputFormat,

    /// Color theme (overrides the configuration file)
    #[arg(long, value_name = "THEME")]
    theme: Option<String>,

    /// Also copy the original source to the system clipboard
    #[arg(long)]
    copy: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the JSON Schema of the configuration file and exit
    #[arg(long)]
    dump_schema: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Terminal,
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "terminal" | "ansi" => Ok(Self::Terminal),
            "plain" | "text" => Ok(Self::Plain),
            other => Err(format!(
                "unknown format '{other}' (expected html, terminal or plain)"
            )),
        }
    }
}

fn load_config(path: Option<&Path>) -> AnyhowResult<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load_or_default()),
    }
}

/// Read the source and work out the filename to display
fn read_source(args: &Args) -> AnyhowResult<(String, Option<String>)> {
    match args.file.as_deref() {
        None => bail!("no input file given (use \"-\" to read stdin)"),
        Some(path) if path == Path::new("-") => {
            let mut code = String::new();
            io::stdin()
                .read_to_string(&mut code)
                .context("Failed to read stdin")?;
            Ok((code, args.filename.clone()))
        }
        Some(path) => {
            let code = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let filename = args.filename.clone().or_else(|| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            });
            Ok((code, filename))
        }
    }
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();
    tracing_setup::init(args.log_file.as_deref())?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }
    if args.no_line_numbers {
        config.code_block.show_line_numbers = false;
    }
    config.validate()?;

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    if args.dump_schema {
        println!("{}", serde_json::to_string_pretty(&Config::json_schema())?);
        return Ok(());
    }

    let (code, filename) = read_source(&args)?;
    let theme = config.resolved_theme();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let clipboard = if args.copy {
            let clipboard = detect_system_clipboard();
            if clipboard.is_none() {
                tracing::warn!("No system clipboard available, --copy ignored");
            }
            clipboard
        } else {
            None
        };

        let mut block = CodeBlock::from_config(&config, clipboard);
        let mut props = CodeBlockProps::new(code)
            .with_line_numbers(config.code_block.show_line_numbers);
        props.language = args.language;
        props.filename = filename;
        props.class_name = args.class_name.clone();

        if args.copy && block.has_clipboard() {
            block.render(&props);
            match block.copy().await {
                CopyOutcome::Copied => tracing::info!("Copied {} bytes", props.code.len()),
                outcome => tracing::debug!("Copy did not complete: {:?}", outcome),
            }
        }

        let rendered = block.render(&props);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match args.format {
            OutputFormat::Html => {
                writeln!(out, "{}", render_html(&rendered, &theme))?;
            }
            OutputFormat::Terminal => {
                write_ansi(&mut out, &CodeBlockWidget::new(&rendered, &theme).lines())?;
            }
            OutputFormat::Plain => {
                write_plain(&mut out, &CodeBlockWidget::new(&rendered, &Theme::default()).lines())?;
            }
        }

        block.dispose();
        Ok::<(), anyhow::Error>(())
    })
}
