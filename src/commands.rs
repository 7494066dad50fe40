use distfetch::config::{ByteSize, Config, ConfigError, DistConfig};
use distfetch::fetch::{self, FetchContext, Fetcher, LimitReadCloser, ReadCloser};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{self, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::{DistPathArgs, FetchArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn load_config(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

pub async fn fetch(config_path: Option<PathBuf>, args: FetchArgs) -> Result<(), AnyError> {
    let mut config = load_config(config_path)?;
    if let Some(dist) = args.dist {
        config.dist.path = dist;
    }
    let dist_path = config.resolved_dist_path();
    let fetcher = fetch::from_config(&config, &dist_path)?;
    debug!(%dist_path, backends = fetcher.len(), "Fetcher chain ready");

    let timeout = args
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.fetch.timeout());

    let interrupt = CancellationToken::new();
    let ctx = FetchContext::with_timeout(timeout).with_token(interrupt.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling fetch");
            interrupt.cancel();
        }
    });

    let stream = fetcher.fetch(&ctx, &args.path).await?;
    let limit = read_limit(args.max_bytes, &config);

    let copied = match &args.output {
        Some(path) => {
            let file = tokio::fs::File::create(path).await?;
            copy_and_close(stream, limit, file).await?
        }
        None => copy_and_close(stream, limit, io::stdout()).await?,
    };

    let snapshot = fetcher.metrics().snapshot();
    info!(
        path = %args.path,
        bytes = copied,
        attempts = snapshot.attempts,
        "Fetch complete"
    );
    Ok(())
}

/// `--max-bytes` when given, else `fetch.max_bytes`
fn read_limit(flag: Option<ByteSize>, config: &Config) -> u64 {
    flag.unwrap_or(config.fetch.max_bytes).as_u64()
}

/// Copy at most `limit` bytes of `stream` into `writer`, closing the stream
/// whether or not the copy succeeded.
async fn copy_and_close<R, W>(stream: R, limit: u64, mut writer: W) -> io::Result<u64>
where
    R: ReadCloser,
    W: AsyncWrite + Unpin,
{
    let mut reader = LimitReadCloser::new(stream, limit);
    let copied = copy_flushed(&mut reader, &mut writer).await;
    let closed = reader.close();
    let copied = copied?;
    closed?;
    Ok(copied)
}

async fn copy_flushed<R, W>(reader: &mut R, writer: &mut W) -> io::Result<u64>
where
    R: ReadCloser,
    W: AsyncWrite + Unpin,
{
    let copied = io::copy(reader, writer).await?;
    writer.flush().await?;
    Ok(copied)
}

pub fn dist_path(config_path: Option<PathBuf>, args: DistPathArgs) -> Result<(), AnyError> {
    let config = match args.default {
        Some(path) => Config {
            dist: DistConfig { path },
            ..Config::default()
        },
        None => load_config(config_path)?,
    };
    println!("{}", config.resolved_dist_path());
    Ok(())
}
