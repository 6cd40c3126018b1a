mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use cr_core::config::Config;
use cr_core::ExtractionRequest;
use cr_extract::{ExtractionGateway, ToolRegistry};
use cr_server::context::AppContext;
use cr_server::routes::extract::resolve;
use cr_server::CancellationToken;

fn load_config(path: Option<&Path>) -> Config {
    let mut config = Config::load_or_default(path);
    config.apply_env();
    config
}

async fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(config_path);

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting clipresolve");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    cr_server::start(config, CancellationToken::new()).await?;
    Ok(())
}

/// Resolve one link and print the response body. A failure body exits 1.
async fn extract(
    config_path: Option<&Path>,
    text: String,
    proxy: Option<String>,
) -> Result<ExitCode> {
    let config = load_config(config_path);

    let request = ExtractionRequest::new(text, proxy).validated()?;

    let extractor = cr_server::build_extractor(&config).await;
    let gateway = ExtractionGateway::from_config(&config, extractor);
    let ctx = AppContext::new(config, gateway);

    let (response, _) = resolve(&ctx, request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise defaults based on the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "clipresolve=trace,cr_server=trace,cr_extract=trace,cr_core=debug,tower_http=debug"
                .to_string()
        } else {
            "clipresolve=debug,cr_server=debug,cr_extract=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(cli.config.as_deref(), host, port))?;
        }
        Commands::Extract { text, proxy } => {
            let rt = tokio::runtime::Runtime::new()?;
            return rt.block_on(extract(cli.config.as_deref(), text, proxy));
        }
        Commands::CheckTools => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_tools(cli.config.as_deref()))?;
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())?;
        }
        Commands::Version => {
            println!("clipresolve {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::GenerateApiKey => {
            println!("{}", cr_server::middleware::auth::generate_api_key());
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = load_config(config_path);
    let tools = ToolRegistry::discover(&config.extractor).check_all().await;
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({version})");
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("yt-dlp is missing. Install it or set extractor.binary in the config.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let mut config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let raw = std::fs::read_to_string(p)
                .with_context(|| format!("reading {}", p.display()))?;
            let config = Config::from_json(&raw)?;
            println!("✓ Configuration parses");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };
    config.apply_env();

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!(
        "  API key: {}",
        if config.auth.api_key.is_some() { "set" } else { "missing" }
    );
    for platform in &config.platforms {
        println!(
            "  Platform {}: cookies {}, jar {}",
            platform.domain,
            if platform.cookies.is_some() { "set" } else { "missing" },
            platform.jar_path().display()
        );
    }
    println!(
        "  Cache: {}",
        if config.cache.enabled {
            format!("{}s", config.cache.ttl_secs)
        } else {
            "disabled".to_string()
        }
    );

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ No warnings");
    } else {
        for warning in &warnings {
            println!("⚠ {warning}");
        }
    }

    Ok(())
}
