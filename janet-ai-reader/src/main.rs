use clap::{Parser, Subcommand, ValueEnum};
use janet_ai_chunks::{Chunk, ChunkSummary, LineRange, format_chunks};
use janet_ai_reader::{
    DirectoryFileSource, FileSource, LineRangeFinder, ReadRequest, Reader, ReaderConfig,
    RemoteRangeFinder, StaticRangeFinder, finder::build_prompt,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Extract the parts of a file relevant to a query, using a language model.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project root that file paths are relative to
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to <root>/.janet-ai-reader.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the model from the config
    #[arg(long)]
    model: Option<String>,

    /// Override the API base URL from the config
    #[arg(long)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the model for the relevant chunks of one or more files
    Read {
        /// File to read, relative to the root (repeatable; files are read concurrently)
        #[arg(short, long = "file", required = true)]
        files: Vec<String>,
        /// What to look for
        #[arg(short, long)]
        query: String,
        /// Mark omitted lines with "..."
        #[arg(long)]
        dots: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Run the chunk pipeline on a known answer instead of calling the model
    Replay {
        /// File the ranges refer to
        #[arg(short, long)]
        file: String,
        /// Model answer, e.g. '{"line_ranges": [{"start": 5, "end": 8}]}'
        #[arg(long)]
        ranges: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the system prompt that would be sent for a file
    Prompt {
        /// File to build the prompt for
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct ReadOutput {
    path: String,
    chunks: Vec<ChunkSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ReaderConfig::load(path)?,
        None => ReaderConfig::load_or_default(&args.root)?,
    };
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    if let Some(api_base) = args.api_base {
        config = config.with_api_base(api_base);
    }
    config.validate()?;

    let files = DirectoryFileSource::new(&args.root);

    match args.command {
        Commands::Read {
            files: paths,
            query,
            dots,
            format,
        } => {
            let finder: Arc<dyn LineRangeFinder> =
                Arc::new(RemoteRangeFinder::new(config.clone())?);
            let reader = Reader::from_config(finder, &config);
            let requests: Vec<ReadRequest> = paths
                .iter()
                .map(|path| ReadRequest::new(path.clone(), query.clone()))
                .collect();

            let results = reader.read_many(&files, &requests).await;
            let mut failures = 0;
            let mut found: Vec<Chunk> = Vec::new();
            let mut outputs = Vec::new();
            for (request, result) in requests.into_iter().zip(results) {
                match result {
                    Ok(chunks) => {
                        outputs.push(ReadOutput {
                            path: request.path,
                            chunks: chunks.iter().map(Chunk::summary).collect(),
                            error: None,
                        });
                        found.extend(chunks);
                    }
                    Err(e) => {
                        failures += 1;
                        eprintln!("Failed to read {}: {}", request.path, e);
                        outputs.push(ReadOutput {
                            path: request.path,
                            chunks: Vec::new(),
                            error: Some(e.to_string()),
                        });
                    }
                }
            }

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outputs)?),
                OutputFormat::Text if found.is_empty() => println!("No relevant code found."),
                OutputFormat::Text => println!("{}", format_chunks(&found, dots)),
            }

            if failures == outputs.len() {
                return Err(anyhow::anyhow!("all {} reads failed", failures));
            }
            Ok(())
        }
        Commands::Replay {
            file,
            ranges,
            format,
        } => {
            let parsed: Vec<LineRange> = janet_ai_reader::parse_line_ranges(&ranges)?;
            let finder: Arc<dyn LineRangeFinder> = Arc::new(StaticRangeFinder::new(parsed));
            let reader = Reader::from_config(finder, &config);
            let chunks = reader.read(&files, &file, "replay").await?;

            match format {
                OutputFormat::Json => {
                    let summaries: Vec<ChunkSummary> = chunks.iter().map(Chunk::summary).collect();
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                }
                OutputFormat::Text => println!("{}", format_chunks(&chunks, false)),
            }
            Ok(())
        }
        Commands::Prompt { file } => {
            let file = files.get_file(&file).await?;
            println!("{}", build_prompt(&file, config.max_prompt_tokens));
            Ok(())
        }
    }
}
