use clap::{Parser, Subcommand};
use jukebox_html::batch::{decode_all, encode_all, init_thread_pool};
use jukebox_html::config::{self, CodecConfig};
use jukebox_html::output::{self, TableDump};
use jukebox_html::{EntityRegistry, FallbackStyle, HtmlCodec, needs_encoding};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Encoder overrides shared by commands that encode.
#[derive(clap::Args, Clone)]
struct EncodeArgs {
    /// Escape for characters without a named entity (overrides config)
    #[arg(long, value_enum)]
    fallback: Option<FallbackArg>,

    /// Skip named entities for non-syntax characters; use the fallback instead
    #[arg(long)]
    no_defensive: bool,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum FallbackArg {
    Decimal,
    Hexadecimal,
    None,
}

impl From<FallbackArg> for FallbackStyle {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Decimal => FallbackStyle::Decimal,
            FallbackArg::Hexadecimal => FallbackStyle::Hexadecimal,
            FallbackArg::None => FallbackStyle::None,
        }
    }
}

#[derive(Parser)]
#[command(name = "jukebox-html")]
#[command(about = "Encode and decode HTML character references")]
#[command(long_about = "\
Encode and decode HTML character references

Encoding escapes the markup characters & < > \" as &amp; &lt; &gt; &quot;,
uses HTML 4.0 names where they exist (é → &eacute;, € → &euro;), and turns
any other character at or above U+00A0 into a numeric reference.

Decoding resolves named references, decimal (&#233;) and hexadecimal
(&#xE9;) references. Anything it cannot resolve is left exactly as written.

Commands that take TEXT read one input per line from stdin when no TEXT is
given.

Run 'jukebox-html gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text for embedding in HTML
    Encode {
        #[command(flatten)]
        encode: EncodeArgs,
        text: Vec<String>,
    },
    /// Decode character references back to text
    Decode { text: Vec<String> },
    /// Report whether each input needs encoding
    Check {
        /// Ignore the markup characters & < > "
        #[arg(long)]
        defensive: bool,
        text: Vec<String>,
    },
    /// Show every substitution the encoder would make
    Inspect {
        #[command(flatten)]
        encode: EncodeArgs,
        text: String,
    },
    /// Print the entity tables
    Table {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let registry = EntityRegistry::new()?;

    match cli.command {
        Command::Encode { encode, text } => {
            let codec_config = load_config(&cli.config, Some(&encode))?;
            init_thread_pool(&codec_config.processing);
            let codec = HtmlCodec::from_config(&registry, &codec_config.encode);
            let inputs = inputs_or_stdin(text)?;
            for line in encode_all(&codec, &inputs) {
                println!("{}", line);
            }
        }
        Command::Decode { text } => {
            let codec_config = load_config(&cli.config, None)?;
            init_thread_pool(&codec_config.processing);
            let codec = HtmlCodec::new(&registry);
            let inputs = inputs_or_stdin(text)?;
            for line in decode_all(&codec, &inputs) {
                println!("{}", line);
            }
        }
        Command::Check { defensive, text } => {
            for input in inputs_or_stdin(text)? {
                println!("{}", needs_encoding(&input, defensive));
            }
        }
        Command::Inspect { encode, text } => {
            let codec_config = load_config(&cli.config, Some(&encode))?;
            let codec = HtmlCodec::from_config(&registry, &codec_config.encode);
            output::print_inspect(&text, &codec.inspect(&text));
        }
        Command::Table { json } => {
            if json {
                let dump = TableDump::from_registry(&registry);
                println!("{}", serde_json::to_string_pretty(&dump)?);
            } else {
                output::print_table(&registry);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `config.toml`, then let command-line flags win over it.
fn load_config(
    path: &Path,
    overrides: Option<&EncodeArgs>,
) -> Result<CodecConfig, config::ConfigError> {
    let mut codec_config = config::load_config(path)?;
    if let Some(args) = overrides {
        if let Some(fallback) = args.fallback {
            codec_config.encode.fallback = fallback.into();
        }
        if args.no_defensive {
            codec_config.encode.defensive = false;
        }
    }
    Ok(codec_config)
}

/// Use the given arguments, or one input per stdin line when there are none.
fn inputs_or_stdin(text: Vec<String>) -> std::io::Result<Vec<String>> {
    if !text.is_empty() {
        return Ok(text);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.lines().map(String::from).collect())
}
