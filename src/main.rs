use aws_subnet_usage::aws::{
    snapshot_file_name, write_snapshot, AwsCliCollector, AwsContext, CollectorSnapshot,
    ResourceCollector, SnapshotCollector,
};
use aws_subnet_usage::config::{AsgMaxPolicy, NlbCurrentPolicy, Settings};
use aws_subnet_usage::error::BoxError;
use aws_subnet_usage::output::{emit, OutputFormat, TextOptions};
use aws_subnet_usage::subnet_usage;
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;
use std::sync::Arc;

const LOG_CONFIG_FILE: &str = "log4rs.yml";

/// Show IP usage of an AWS subnet and how far it can grow when everything in
/// it scales out.
#[derive(Parser, Debug)]
#[command(name = "aws-subnet-usage")]
#[command(version)]
struct Args {
    /// Subnet ID (subnet-...) or CIDR block (10.0.1.0/24)
    #[arg(value_name = "SUBNET_ID_OR_BLOCK")]
    subnet: String,

    /// More logging: -v debug, -vv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Show tags and per-group detail
    #[arg(short = 't', long)]
    show_tags: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// AWS CLI profile (overrides AWS_PROFILE)
    #[arg(long)]
    profile: Option<String>,

    /// AWS region (overrides AWS_REGION)
    #[arg(long)]
    region: Option<String>,

    /// ASG maximum: headroom or absolute
    #[arg(long)]
    asg_max: Option<AsgMaxPolicy>,

    /// NLB seen only by zone: zone-fallback or strict
    #[arg(long)]
    nlb_current: Option<NlbCurrentPolicy>,

    /// Do not derive node group maximum from scaling config
    #[arg(long)]
    no_node_group_max: bool,

    /// Replay collector outputs from a snapshot file instead of calling AWS
    #[arg(long, value_name = "FILE")]
    snapshot: Option<String>,

    /// Save collector outputs to FILE (default: dated file in the current directory)
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    save_snapshot: Option<String>,
}

fn init_logging(verbose: u8) -> Result<(), BoxError> {
    if verbose == 0 && Path::new(LOG_CONFIG_FILE).exists() {
        log4rs::init_file(LOG_CONFIG_FILE, Default::default())
            .map_err(|e| format!("Error initializing log4rs from {LOG_CONFIG_FILE}: {e}"))?;
        return Ok(());
    }
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l} {f}:{L}] {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| format!("Error building log config: {e}"))?;
    log4rs::init_config(config).map_err(|e| format!("Error initializing log4rs: {e}"))?;
    Ok(())
}

fn settings_from(args: &Args) -> Settings {
    let mut settings = Settings::from_env();
    if args.profile.is_some() {
        settings.profile = args.profile.clone();
    }
    if args.region.is_some() {
        settings.region = args.region.clone();
    }
    if let Some(policy) = args.asg_max {
        settings.policy.asg_max = policy;
    }
    if let Some(policy) = args.nlb_current {
        settings.policy.nlb_current = policy;
    }
    if args.no_node_group_max {
        settings.policy.node_group_max_from_scaling = false;
    }
    settings
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose)?;
    log::info!("#Start main() {args:?}");

    let settings = settings_from(&args);
    log::debug!("{settings:?}");

    let collector: Arc<dyn ResourceCollector> = match &args.snapshot {
        Some(file) => Arc::new(SnapshotCollector::from_file(file)?),
        None => Arc::new(
            AwsCliCollector::new(AwsContext::from_settings(&settings)).with_tags(args.show_tags),
        ),
    };

    let usage = match subnet_usage(collector, &args.subnet, &settings.policy).await {
        Ok(usage) => usage,
        Err(e) => {
            log::error!("{e}");
            return Err(e.into());
        }
    };

    if let Some(file) = &args.save_snapshot {
        let file = if file.is_empty() {
            snapshot_file_name(&usage.subnet.id, settings.timezone)
        } else {
            file.clone()
        };
        write_snapshot(
            &file,
            &CollectorSnapshot::capture(&usage.subnet, &usage.collected),
        )?;
    }

    let opts = TextOptions {
        show_tags: args.show_tags,
        generated: Some(chrono::Utc::now().with_timezone(&settings.timezone)),
    };
    emit(&usage.report, args.format, &opts)?;
    log::info!("#End main()");
    Ok(())
}
