//! tern CLI binary entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use tern::cli::{Cli, CodexMcpArgs, Commands, ToolsArgs, WeatherArgs};
use tern::config::ProcessEnv;
use tern::error::Result;
use tern::output::Drainer;
use tern::runtime::ClaudeCliRuntime;
use tern::turn::TurnRunner;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv(); // load .env if present, ignore error
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::CodexMcp(args) => handle_codex_mcp(args).await,
        Commands::Weather(args) => handle_weather(args).await,
        Commands::Tools(args) => handle_tools(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn handle_codex_mcp(args: CodexMcpArgs) -> Result<()> {
    let config = args.session()?;
    let runtime = ClaudeCliRuntime::from_env(&ProcessEnv);
    let mut stdout = std::io::stdout();

    println!("=== Codex MCP Example ===");
    TurnRunner::new(&ProcessEnv)
        .with_drainer(Drainer::new("Claude"))
        .stream(&runtime, &config, &args.prompt, &mut stdout)
        .await?;
    println!();
    Ok(())
}

async fn handle_weather(args: WeatherArgs) -> Result<()> {
    let runner = tern::demos::weather_runner(&ProcessEnv)?;
    let mut stdout = std::io::stdout();
    TurnRunner::new(&ProcessEnv)
        .single_shot(&runner, &args.prompt, &mut stdout)
        .await?;
    Ok(())
}

async fn handle_tools(args: ToolsArgs) -> Result<()> {
    let config = args.session()?;
    for (server, provider) in config.tool_providers() {
        if !matches!(provider, tern::config::ToolProvider::Stdio { .. }) {
            println!("{server}: (hosted provider, not probed)");
            continue;
        }
        let tools = tern::mcp::list_stdio_tools(server, provider).await?;
        println!("{server}:");
        for tool in tools {
            let capability = tool.capability_name(server);
            match tool.description.as_deref() {
                Some(description) => println!("  {capability}: {description}"),
                None => println!("  {capability}"),
            }
        }
    }
    for name in config.unsatisfied_capabilities() {
        println!("unsatisfied: {name}");
    }
    Ok(())
}
