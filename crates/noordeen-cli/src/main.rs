//! NoorDeen CLI - Command-line chat with the NoorDeen Islamic assistant
//!
//! Usage:
//!     noordeen [OPTIONS] [QUERY]
//!
//! Environment Variables:
//!     GEMINI_API_KEY: API key for the provider (a missing key is tolerated until the first request)
//!     NOORDEEN_BASE_URL: Provider API base URL (default: Gemini OpenAI-compatible endpoint)
//!     NOORDEEN_MODEL: Model name (default: gemini-3-flash-preview)
//!     NOORDEEN_MAX_TOKENS: Maximum tokens per answer (default: 2048)
//!     NOORDEEN_TEMPERATURE: Sampling temperature (default: 0.7)
//!     NOORDEEN_MODE: Response mode: concise, detailed or scholarly (default: detailed)
//!     NOORDEEN_LANG: Language of fallback messages: bn or en (default: bn)
//!     NOORDEEN_REQUEST_TIMEOUT_SECS: Per-request timeout in seconds (default: none)

use anyhow::Result;
use clap::Parser;
use noordeen_ai::{
    get_message, ChatError, ChatSession, ChatTurn, Dispatcher, Language, Mode, ModelClient, ModelConfig,
    TurnOutcome, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Consecutive fallback answers before a connection warning is printed
const FAILURE_BANNER_THRESHOLD: usize = 3;

/// NoorDeen AI - Islamic assistant chat
#[derive(Parser, Debug)]
#[command(name = "noordeen")]
#[command(about = "NoorDeen AI - Islamic assistant chat")]
#[command(after_help = r#"Examples:
    # Start an interactive chat
    noordeen

    # Ask a single question
    noordeen "নামাজের গুরুত্ব কী?"

    # Short answers with English fallback messages
    noordeen --mode concise --lang en "What is zakat?"

    # Check that the provider is reachable
    noordeen --check

Interactive commands:
    /mode                                Show the current response mode
    /mode <concise|detailed|scholarly>   Switch response mode
    /clear                               Clear the conversation
    quit, exit, q                        Leave
"#)]
struct Cli {
    // Provider options
    /// Provider API base URL
    #[arg(long, env = "NOORDEEN_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Model name
    #[arg(long, env = "NOORDEEN_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// API key for the provider
    #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
    apikey: String,

    /// Maximum tokens per answer
    #[arg(long, env = "NOORDEEN_MAX_TOKENS")]
    max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long, env = "NOORDEEN_TEMPERATURE")]
    temperature: Option<f32>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(
        long,
        env = "NOORDEEN_REQUEST_TIMEOUT_SECS",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: Option<u64>,

    // Chat options
    /// Response mode
    #[arg(long, env = "NOORDEEN_MODE", default_value = "detailed")]
    mode: String,

    /// Language for fallback messages (bn or en)
    #[arg(long, env = "NOORDEEN_LANG", default_value = "bn", value_parser = ["bn", "en"])]
    lang: String,

    /// Append a short error description to failure messages
    #[arg(long)]
    diagnostics: bool,

    /// Check provider connectivity and exit
    #[arg(long)]
    check: bool,

    // Logging options
    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "NOORDEEN_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Question to ask (interactive mode if not provided)
    query: Option<String>,
}

/// Commands accepted in interactive mode besides questions
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Clear,
    ShowMode,
    SetMode(&'a str),
}

/// Parse an interactive command; `None` means the line is a question
fn parse_command(line: &str) -> Option<Command<'_>> {
    if line.eq_ignore_ascii_case("quit")
        || line.eq_ignore_ascii_case("exit")
        || line.eq_ignore_ascii_case("q")
    {
        return Some(Command::Quit);
    }

    if line == "/clear" {
        return Some(Command::Clear);
    }

    if line == "/mode" {
        return Some(Command::ShowMode);
    }

    line.strip_prefix("/mode ")
        .map(|name| Command::SetMode(name.trim()))
}

/// Build the provider config from flags, which clap already merged with the environment
fn build_model_config(cli: &Cli) -> ModelConfig {
    let mut config = ModelConfig::new(&cli.base_url, &cli.model).with_api_key(&cli.apikey);
    if let Some(max_tokens) = cli.max_tokens {
        config = config.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = cli.temperature {
        config = config.with_temperature(temperature);
    }
    config
}

/// Initialise tracing to stderr so answers on stdout stay clean
fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(io::stderr),
            )
            .init();
    }
}

/// Check if the provider API is accessible
async fn check_model_api(model_config: &ModelConfig) -> bool {
    println!("\u{1F50D} Checking provider API...");
    println!("{}", "-".repeat(50));

    print!("1. Checking credential... ");
    io::stdout().flush().ok();
    if model_config.has_credential() {
        println!("\u{2705} OK");
    } else {
        println!("\u{26A0}\u{FE0F}  MISSING");
        println!("   Set GEMINI_API_KEY or pass --apikey.");
    }

    print!("2. Checking API connectivity ({})... ", model_config.base_url);
    io::stdout().flush().ok();

    let client = ModelClient::new(model_config.clone());

    match client.test_connection().await {
        Ok(_) => {
            println!("\u{2705} OK");
            println!("{}", "-".repeat(50));
            println!("\u{2705} Provider API checks passed!\n");
            true
        }
        Err(e) => {
            println!("\u{274C} FAILED");
            let error_msg = e.to_string();

            if error_msg.contains("Connection refused") || error_msg.contains("error sending request") {
                println!("   Error: Cannot connect to {}", model_config.base_url);
                println!("   Solution:");
                println!("     1. Check your network connection");
                println!("     2. Verify the base URL is correct");
            } else if error_msg.to_lowercase().contains("api key") {
                println!("   Error: The provider rejected the credential");
                println!("   Solution: Check the value of GEMINI_API_KEY");
            } else {
                println!("   Error: {}", error_msg);
            }

            println!("{}", "-".repeat(50));
            println!("\u{274C} Provider API check failed. Please fix the issues above.");
            false
        }
    }
}

/// Print application header
fn print_header(model_config: &ModelConfig, mode: Mode, lang: Language, timeout: Option<u64>) {
    println!("{}", "=".repeat(50));
    println!("NoorDeen AI - Islamic assistant");
    println!("{}", "=".repeat(50));
    println!("Model: {}", model_config.model_name);
    println!("Base URL: {}", model_config.base_url);
    println!("Mode: {}", mode);
    println!("Language: {:?}", lang);
    if let Some(secs) = timeout {
        println!("Timeout: {}s", secs);
    }
    println!("{}", "=".repeat(50));
}

/// Print the reply for a turn and the failure banner when the streak is long enough
fn print_reply(session: &ChatSession, turn: &ChatTurn, lang: Language) {
    let prefix = match turn.outcome {
        TurnOutcome::Answered => "\u{1F54C}",
        TurnOutcome::NoAnswer | TurnOutcome::Failed => "\u{26A0}\u{FE0F} ",
    };
    println!(
        "\n{} {} [{}]:\n{}\n",
        prefix,
        get_message("assistant", lang),
        turn.at.format("%H:%M:%S"),
        turn.reply
    );

    if session.should_warn(FAILURE_BANNER_THRESHOLD) {
        println!("{}", "!".repeat(50));
        println!("{}", get_message("persistent_failure", lang));
        println!("{}\n", "!".repeat(50));
    }
}

/// Ask a single question through the session and print the reply
async fn ask(session: &mut ChatSession, input: &str, lang: Language) {
    match session.submit(input).await {
        Ok(turn) => {
            let turn = turn.clone();
            print_reply(session, &turn, lang);
        }
        Err(ChatError::EmptyQuery) => println!("{}", get_message("empty_query", lang)),
    }
}

/// Run interactive mode
async fn run_interactive_mode(session: &mut ChatSession, lang: Language) -> Result<()> {
    println!("\nEntering interactive mode. Type 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} [{}]: ", get_message("you", lang), session.mode());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(_) => {
                println!("\n\nInterrupted. Goodbye!");
                break;
            }
        }

        let line = input.trim();

        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            Some(Command::Quit) => {
                println!("Goodbye!");
                break;
            }
            Some(Command::Clear) => {
                session.clear();
                println!("{}\n", get_message("transcript_cleared", lang));
            }
            Some(Command::ShowMode) => println!("{}\n", session.mode()),
            Some(Command::SetMode(name)) => {
                session.set_mode(Mode::from_name(name));
                println!("{}: {}\n", get_message("mode_changed", lang), session.mode());
            }
            None => ask(session, line, lang).await,
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args);

    let model_config = build_model_config(&args);
    let lang = Language::from_str(&args.lang);
    let mode = Mode::from_name(&args.mode);

    // Handle --check (exits with the check result)
    if args.check {
        if !check_model_api(&model_config).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    print_header(&model_config, mode, lang, args.timeout);

    // The provider is built on the first question, not here
    let provider_config = model_config.clone();
    let mut dispatcher = Dispatcher::new(move || ModelClient::new(provider_config.clone()))
        .with_lang(lang)
        .with_diagnostics(args.diagnostics);
    if let Some(secs) = args.timeout {
        dispatcher = dispatcher.with_timeout(Duration::from_secs(secs));
    }

    let mut session = ChatSession::new(Arc::new(dispatcher)).with_mode(mode);

    // Run with provided query or enter interactive mode
    if let Some(query) = &args.query {
        ask(&mut session, query, lang).await;
    } else {
        run_interactive_mode(&mut session, lang).await?;
    }

    Ok(())
}
