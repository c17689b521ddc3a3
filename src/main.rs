use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use s3_mirror::mirror::{DEFAULT_CONCURRENCY, DEFAULT_QUEUE_CAPACITY};
use s3_mirror::providers::aws::bucket_region;
use s3_mirror::providers::s3_client::{create_s3_client, S3ClientConfig};
use s3_mirror::{run_s3_mirror, MirrorConfig};

#[derive(Debug, Parser)]
#[command(name = "s3-mirror", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
    /// AWS S3 bucket name
    #[arg(short, long)]
    bucket: String,

    /// Prefix for S3 objects
    #[arg(short, long)]
    prefix: String,

    /// Destination directory on local machine
    #[arg(short, long)]
    destination: PathBuf,

    /// Number of concurrent downloads
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Keys buffered ahead of the downloaders
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Bucket region; looked up from the bucket location when omitted
    #[arg(long)]
    region: Option<String>,

    /// Custom S3-compatible endpoint
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Address buckets by path instead of virtual host
    #[arg(long)]
    path_style: bool,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = MirrorConfig::new(&args.bucket, &args.prefix, &args.destination)
        .with_concurrency(args.concurrency)
        .with_queue_capacity(args.queue_capacity);

    if let Err(e) = config.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    if let Err(e) = config.ensure_destination().await {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let mut client_config = S3ClientConfig {
        region: args.region.as_deref(),
        endpoint_url: args.endpoint_url.as_deref(),
        force_path_style: args.path_style,
        credentials: None,
    };

    let discovered_region = if args.region.is_none() {
        let locator = create_s3_client(&client_config).await;
        match bucket_region(&locator, &args.bucket).await {
            Ok(region) => {
                info!("Bucket '{}' is in region '{}'", args.bucket, region);
                Some(region)
            }
            Err(e) => {
                error!("Failed to initialize S3 client: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };
    if let Some(region) = discovered_region.as_deref() {
        client_config.region = Some(region);
    }
    let client = create_s3_client(&client_config).await;

    match run_s3_mirror(client, &config).await {
        Ok(report) => {
            info!(
                "All done! Downloaded {} files from S3 bucket '{}'",
                report.completed, report.bucket
            );
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!("Failed to serialize report: {}", e),
                }
            }
            if report.listing_complete {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            error!("Mirror aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
