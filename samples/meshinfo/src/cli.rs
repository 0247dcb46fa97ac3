use std::path::PathBuf;

use clap::ValueHint;
use nalgebra::Vector3;

use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,geode=info,meshinfo=info",
        env = "MESHINFO_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Compact, env = "MESHINFO_LOG_FORMAT")]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Write a mesh made of textured quads
    Demo {
        /// Number of groups to write
        #[arg(short, long, default_value_t = 2)]
        groups: u16,
        /// Where to write the mesh
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
    /// Load meshes, describe them, and submit them to a recording backend
    Inspect {
        /// Keep vertex & index data in memory after upload
        #[arg(long)]
        ram_copy: bool,
        /// Number of passes to submit each mesh with
        #[arg(short, long, default_value_t = 2)]
        passes: u8,
        /// Translation applied to each submitted mesh
        #[arg(short, long, default_value = "0,0,0", value_parser = parse_vec3::<f32>, value_name = "X,Y,Z")]
        translate: Vector3<f32>,
        /// Files to inspect
        #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
}

fn parse_vec3<R: FromStr>(
    s: &str,
) -> Result<Vector3<R>, Box<dyn std::error::Error + Send + Sync + 'static>>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let mut split = s.trim().split(',');
    let mut next = || -> Result<R, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let c = split.next().ok_or("expected three comma-separated components")?;
        Ok(R::from_str(c.trim())?)
    };
    let (x, y, z) = (next()?, next()?, next()?);
    Ok(nalgebra::vector![x, y, z])
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
