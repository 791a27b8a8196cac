use clap::{Parser, ValueEnum};
use janet_ai_chunks::{
    FileRef, LineRange, MAX_CHUNK_DISTANCE, chunks_from_ranges, clamp_chunks, format_chunks,
    merge_chunks_within,
};
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

/// Normalize and merge line ranges over a file, printing the resulting chunks.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// Relative path used to label the file in the output.
    #[arg(short, long, default_value = "unknown_path")]
    path: String,

    /// Line ranges as JSON, e.g. '[{"start": 5, "end": 8}]'.
    #[arg(short, long)]
    ranges: String,

    /// Maximum number of omitted lines still bridged when merging.
    #[arg(short = 'd', long, default_value_t = MAX_CHUNK_DISTANCE)]
    max_distance: usize,

    /// Mark omitted lines with "..." when rendering.
    #[arg(long)]
    dots: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let file_content = if let Some(input_path) = &args.input {
        fs::read_to_string(input_path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let ranges: Vec<LineRange> = serde_json::from_str(&args.ranges)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let file = Arc::new(FileRef::new(args.path, file_content));
    let chunks = merge_chunks_within(
        clamp_chunks(chunks_from_ranges(&file, &ranges)),
        args.max_distance,
    );

    match args.format {
        OutputFormat::Text => println!("{}", format_chunks(&chunks, args.dots)),
        OutputFormat::Json => {
            let summaries: Vec<_> = chunks.iter().map(|c| c.summary()).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }

    Ok(())
}
