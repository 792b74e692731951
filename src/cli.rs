//! One-shot command line front end.
//!
//! Creates a single capture, applies the annotations given on the command
//! line in the order they appear, and writes the result.

use crate::annotation::{Annotation, BoxAnnotation, TextAnnotation};
use crate::capture::Region;
use crate::config::Config;
use crate::session::{CaptureStore, OutputFormat};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(name = "grabitar", version, about = "Capture the screen and annotate it")]
pub struct Cli {
    /// Monitor to grab: 0 for all monitors, 1+ for a single one
    #[arg(long, default_value_t = 0)]
    pub monitor: u32,

    /// Desktop region to grab
    #[arg(long, value_name = "X,Y,W,H")]
    pub region: Option<Region>,

    /// Annotate an existing image file instead of grabbing the screen
    #[arg(long, value_name = "FILE", conflicts_with_all = ["monitor", "region"])]
    pub image: Option<PathBuf>,

    /// Capture ID (default: capture_001)
    #[arg(long)]
    pub id: Option<String>,

    /// Box annotation; repeatable
    #[arg(long = "box", value_name = "X,Y,W,H[,COLOR[,LINE_WIDTH[,LABEL]]]")]
    pub boxes: Vec<BoxSpec>,

    /// Text annotation; repeatable
    #[arg(long = "text", value_name = "X,Y,TEXT")]
    pub texts: Vec<TextSpec>,

    /// Font size for text annotations
    #[arg(long, default_value_t = 20)]
    pub font_size: i32,

    /// Colour for text annotations
    #[arg(long, default_value = "red")]
    pub text_color: String,

    /// Background for text annotations
    #[arg(long, default_value = "white")]
    pub background: String,

    /// Draw text annotations without a background
    #[arg(long)]
    pub no_background: bool,

    /// What to write
    #[arg(long, value_enum, default_value_t = CliFormat::Markdown)]
    pub format: CliFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliFormat {
    Png,
    Base64,
    Markdown,
    Metadata,
}

/// `X,Y,W,H[,COLOR[,LINE_WIDTH[,LABEL]]]`. The label keeps any commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxSpec(pub BoxAnnotation);

impl FromStr for BoxSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(7, ',').collect();
        if parts.len() < 4 {
            return Err(format!(
                "expected X,Y,W,H[,COLOR[,LINE_WIDTH[,LABEL]]], got {:?}",
                s
            ));
        }
        let mut b = BoxAnnotation::new(
            int(parts[0])?,
            int(parts[1])?,
            int(parts[2])?,
            int(parts[3])?,
        );
        if let Some(color) = parts.get(4).map(|c| c.trim()).filter(|c| !c.is_empty()) {
            b = b.with_color(color);
        }
        if let Some(width) = parts.get(5).map(|w| w.trim()).filter(|w| !w.is_empty()) {
            b = b.with_line_width(int(width)?);
        }
        if let Some(label) = parts.get(6).filter(|l| !l.is_empty()) {
            b = b.with_label(*label);
        }
        Ok(BoxSpec(b))
    }
}

/// `X,Y,TEXT`. The text keeps any commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpec {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

impl FromStr for TextSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, ',').collect();
        let [x, y, text] = parts.as_slice() else {
            return Err(format!("expected X,Y,TEXT, got {:?}", s));
        };
        Ok(TextSpec {
            x: int(x)?,
            y: int(y)?,
            text: text.to_string(),
        })
    }
}

fn int(v: &str) -> Result<i32, String> {
    v.trim().parse().map_err(|e| format!("{:?}: {}", v, e))
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Capture(#[from] crate::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize metadata: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Args(#[from] clap::Error),
}

impl Cli {
    /// All annotations, ordered by where they appeared on the command line.
    pub fn annotations(&self, matches: &ArgMatches) -> Vec<Annotation> {
        let background = (!self.no_background).then(|| self.background.clone());
        let box_idx = matches.indices_of("boxes").into_iter().flatten();
        let text_idx = matches.indices_of("texts").into_iter().flatten();

        let mut ordered: Vec<(usize, Annotation)> = box_idx
            .zip(&self.boxes)
            .map(|(i, b)| (i, Annotation::from(b.0.clone())))
            .chain(text_idx.zip(&self.texts).map(|(i, t)| {
                let ann = TextAnnotation::new(t.x, t.y, t.text.clone())
                    .with_font_size(self.font_size)
                    .with_color(self.text_color.clone())
                    .with_background(background.clone());
                (i, Annotation::from(ann))
            }))
            .collect();
        ordered.sort_by_key(|(i, _)| *i);
        ordered.into_iter().map(|(_, a)| a).collect()
    }
}

/// Parse the process arguments and run once.
pub fn main_with_args() -> Result<(), CliError> {
    let matches = Cli::command().try_get_matches()?;
    let cli = Cli::from_arg_matches(&matches)?;
    let config = Config::from_env();
    let store = CaptureStore::new(&config);
    execute(&cli, &matches, &store)
}

/// Run parsed arguments against `store`.
pub fn execute(cli: &Cli, matches: &ArgMatches, store: &CaptureStore) -> Result<(), CliError> {
    let capture = match &cli.image {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            store.create_from_image_bytes(&bytes, cli.id.clone())?
        }
        None => store.create_from_screen(cli.monitor, cli.region, cli.id.clone()),
    };

    for annotation in cli.annotations(matches) {
        capture.add_annotation(annotation);
    }

    let output = match cli.format {
        CliFormat::Png => capture.export(OutputFormat::Png)?,
        CliFormat::Base64 => with_newline(capture.export(OutputFormat::Base64)?),
        CliFormat::Markdown => with_newline(capture.export(OutputFormat::Markdown)?),
        CliFormat::Metadata => with_newline(serde_json::to_vec_pretty(&capture.metadata())?),
    };

    match &cli.out {
        Some(path) => {
            std::fs::write(path, &output)?;
            log::info!("[CLI] Wrote {} bytes to {}", output.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn with_newline(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes.push(b'\n');
    bytes
}
