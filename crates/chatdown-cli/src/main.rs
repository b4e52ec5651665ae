//! chatdown - render chat-assistant markdown in the terminal

mod ansi;

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use chatdown_core::{message_tree, render_message, Theme};

#[derive(Parser)]
#[command(name = "chatdown", version, about = "Render chat-assistant markdown in the terminal")]
struct Args {
    /// Input file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Color theme (dark, light)
    #[arg(long, default_value = "dark")]
    theme: String,

    /// Dump the annotated tree as JSON instead of rendering
    #[arg(long)]
    ast: bool,

    /// Print the extracted tab-separated text of every table
    #[arg(long)]
    tables: bool,

    /// Copy the Nth table's extracted text to the clipboard (1-based)
    #[arg(long, value_name = "N")]
    copy_table: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let text = match &args.input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let theme =
        Theme::by_name(&args.theme).with_context(|| format!("unknown theme '{}'", args.theme))?;

    if args.ast {
        let tree = message_tree(&text);
        serde_json::to_writer_pretty(io::stdout().lock(), &tree)?;
        println!();
        return Ok(());
    }

    let rendered = render_message(&text, &theme);

    if args.tables {
        for (i, table) in rendered.tables.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{table}");
        }
        return Ok(());
    }

    if let Some(n) = args.copy_table {
        let table = n
            .checked_sub(1)
            .and_then(|i| rendered.tables.get(i))
            .with_context(|| format!("no table #{n} (message has {})", rendered.tables.len()))?;
        let mut clipboard = arboard::Clipboard::new().context("opening clipboard")?;
        clipboard
            .set_text(table.clone())
            .context("writing clipboard")?;
        tracing::info!(table = n, "copied table to clipboard");
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    ansi::print_rendered(&rendered, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}
