use color_eyre::{eyre::eyre, Result};
use padbridge::backend::{BackendSettings, DeviceSource, GilrsBackend, StaticSource};
use padbridge::config::AppConfig;
use padbridge::haptics::Haptics;
use padbridge::normalizer::InputNormalizer;
use padbridge::surface::{GamepadBridge, Reply};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

// Command line options
#[derive(Debug, Default)]
struct Options {
    demo: bool,
    config_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;
    let options = parse_options()?;

    let config_path = match options.config_path {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let config = AppConfig::load_or_init(&config_path).await?;

    setup_logging(&config.logging.level);
    info!("Using config file {}", config_path.display());
    debug!("Config: {:?}", config);

    let normalizer = InputNormalizer::new(config.normalizer.clone());
    let prompt = config.console.prompt.clone();

    if options.demo || config.console.demo {
        info!("Starting in demo mode");
        serve(GamepadBridge::new(StaticSource::demo(), normalizer), &prompt).await
    } else {
        info!("Initializing gamepad backend");
        let settings = BackendSettings::from(&config.backend);
        let backend = GilrsBackend::create(Some(settings))
            .map_err(|e| eyre!("Failed to start gamepad backend (try --demo): {}", e))?
            .initialize();
        serve(GamepadBridge::new(backend, normalizer), &prompt).await
    }
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    Ok(())
}

// RUST_LOG takes precedence over the configured level
fn setup_logging(configured: &str) {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.parse::<Level>().ok())
        .or_else(|| configured.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    // stdout carries replies, logs go to stderr
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}

fn parse_options() -> Result<Options> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => options.demo = true,
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--config needs a file path"))?;
                options.config_path = Some(PathBuf::from(path));
            }
            other => return Err(eyre!("Unknown argument: {}", other)),
        }
    }

    Ok(options)
}

// Answer one request per stdin line until EOF
async fn serve<S: DeviceSource + Haptics>(mut bridge: GamepadBridge<S>, prompt: &str) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut served = 0usize;

    info!("Ready for requests");
    loop {
        if !prompt.is_empty() {
            stdout.write_all(prompt.as_bytes()).await?;
            stdout.flush().await?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match bridge.execute(&line) {
            Ok(Reply::Done) => debug!("Command done: {}", line.trim()),
            Ok(reply) => {
                stdout.write_all(format!("{}\n", reply).as_bytes()).await?;
                stdout.flush().await?;
            }
            Err(e) => {
                warn!("Rejected request {:?}", line.trim());
                error!("{}", e);
            }
        }
        served += 1;
    }

    info!("Input closed after {} requests", served);
    Ok(())
}
