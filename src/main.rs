//! # thermal-escpos CLI
//!
//! Converts a JSON print-node tree into printer commands.
//!
//! ## Usage
//!
//! ```bash
//! # Write ESC/POS bytes for 80mm paper to a file
//! thermal-escpos convert receipt.json -o receipt.bin
//!
//! # Send straight to a USB printer
//! thermal-escpos convert receipt.json -o /dev/usb/lp0
//!
//! # Inspect the bytes for a Bematech printer, 58mm paper, no cut
//! thermal-escpos convert receipt.json --adapter escbematech --paper-width 32 --cut none --hex
//!
//! # Trace the conversion
//! RUST_LOG=thermal_escpos=debug thermal-escpos convert receipt.json --debug --hex
//! ```

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use thermal_escpos::{
    AdapterChoice, CodePage, ConvertOptions, PrintNode, ThermalError, print_nodes_to_escpos,
    render::dither::DitheringAlgorithm,
};

/// thermal-escpos - print-node trees to thermal printer commands
#[derive(Parser, Debug)]
#[command(name = "thermal-escpos")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a JSON print-node tree to printer bytes
    Convert {
        /// JSON file holding the root print node (`-` for stdin)
        input: PathBuf,

        /// Write bytes here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// JSON file with conversion options (flags override it)
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,

        /// Characters per line (48 for 80mm, 32 for 58mm)
        #[arg(long)]
        paper_width: Option<usize>,

        /// Code page: cp437, cp850, cp860
        #[arg(long)]
        encoding: Option<String>,

        /// Printer dialect: escpos, escbematech
        #[arg(long)]
        adapter: Option<String>,

        /// Cut after printing: full, partial, none
        #[arg(long)]
        cut: Option<String>,

        /// Lines to feed before cutting
        #[arg(long)]
        feed_before_cut: Option<usize>,

        /// Image dithering: threshold, bayer, floyd-steinberg
        #[arg(long)]
        dither: Option<String>,

        /// Select the code page on the printer after initializing
        #[arg(long)]
        select_code_page: bool,

        /// Log the tree before converting
        #[arg(long)]
        debug: bool,

        /// Print a hex dump instead of raw bytes
        #[arg(long)]
        hex: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ThermalError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            options,
            paper_width,
            encoding,
            adapter,
            cut,
            feed_before_cut,
            dither,
            select_code_page,
            debug,
            hex,
        } => {
            let mut opts = match options {
                Some(path) => ConvertOptions::from_json(&std::fs::read_to_string(path)?)?,
                None => ConvertOptions::default(),
            };
            if let Some(width) = paper_width {
                opts.paper_width = width;
            }
            if let Some(name) = encoding {
                opts.encoding = CodePage::from_name(&name).ok_or_else(|| {
                    ThermalError::InvalidCommand(format!("unknown encoding '{}'", name))
                })?;
            }
            if let Some(name) = adapter {
                opts.command_adapter = AdapterChoice::from_name(&name);
            }
            if let Some(mode) = cut {
                opts.cut = mode.parse()?;
            }
            if let Some(lines) = feed_before_cut {
                opts.feed_before_cut = lines;
            }
            if let Some(name) = dither {
                opts.dither = DitheringAlgorithm::from_name(&name).ok_or_else(|| {
                    ThermalError::InvalidCommand(format!("unknown dithering algorithm '{}'", name))
                })?;
            }
            opts.select_code_page |= select_code_page;
            opts.debug |= debug;

            let json = if input.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                std::fs::read_to_string(&input)?
            };
            let tree: PrintNode = serde_json::from_str(&json)?;

            let bytes = print_nodes_to_escpos(&tree, &opts).await?;

            let rendered = if hex { hex_dump(&bytes).into_bytes() } else { bytes };
            match output {
                Some(path) => {
                    std::fs::write(&path, &rendered)?;
                    eprintln!("Wrote {} bytes to {}", rendered.len(), path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&rendered)?;
                    stdout.flush()?;
                }
            }
            Ok(())
        }
    }
}

/// 16 bytes per line: offset, hex, printable ASCII.
fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (i, chunk) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        out.push_str(&format!("{:08X}  {:<47}  {}\n", i * 16, hex.join(" "), ascii));
    }
    out
}
