use anyhow::Result;
use clap::{Parser, Subcommand};
use kris_ai_gateway::app::App;
use kris_ai_gateway::image::{save_image, ImageOptions, ImageService};
use kris_ai_gateway::models::Config;
use kris_ai_gateway::server;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "kris-ai-gateway")]
#[command(about = "HTTP gateway for KRIS generative-AI helpers")]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default).
    Serve {
        /// Overrides HOST.
        #[arg(long)]
        host: Option<String>,
        /// Overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate an image from a prompt and save it locally.
    Image {
        prompt: String,
        #[arg(long, default_value_t = 512)]
        width: u32,
        #[arg(long, default_value_t = 512)]
        height: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Keep the provider watermark.
        #[arg(long)]
        allow_logo: bool,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(long)]
        filename: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kris_ai_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    if let Err(e) = run(args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }))
    .await
    {
        error!("kris-ai-gateway failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Command) -> Result<()> {
    let mut config = Config::from_env()?;

    match command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            info!("Starting kris-ai-gateway on {}", config.bind_address());
            let app = Arc::new(App::from_config(&config));
            let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
            server::serve(listener, app).await?;
        }
        Command::Image {
            prompt,
            width,
            height,
            seed,
            allow_logo,
            out_dir,
            filename,
        } => {
            let app = App::from_config(&config);
            let options = ImageOptions {
                width,
                height,
                seed,
                nologo: !allow_logo,
            };

            let (url, mime, saved) =
                generate_to_disk(app.image(), &prompt, &options, &out_dir, filename.as_deref())
                    .await?;

            println!("{}", url);
            println!("{} ({})", saved.display(), mime);
        }
    }

    Ok(())
}

/// Generate one image and write it under `out_dir`; returns the request URL,
/// the sniffed MIME type and the saved path.
async fn generate_to_disk(
    service: &dyn ImageService,
    prompt: &str,
    options: &ImageOptions,
    out_dir: &Path,
    filename: Option<&str>,
) -> kris_ai_gateway::Result<(String, &'static str, PathBuf)> {
    let image = service.generate(prompt, options).await?;
    let saved = save_image(image.bytes, out_dir, filename).await?;

    info!("Saved {} image to {}", image.mime, saved.display());
    Ok((image.url, image.mime, saved))
}
