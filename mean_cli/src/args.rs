use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use mean_core::MeanConfig;

use crate::sink::OutputFormat;

/// Rolling arithmetic, geometric and harmonic means of price streams
#[derive(Debug, Parser)]
#[command(name = "mean_cli", version)]
pub struct Args {
    /// CSV inputs (`id,name,price,timestamp`); each file is one partition
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Number of most recent prices per symbol the means cover
    #[arg(short, long, env = "WINDOW_SIZE")]
    pub window_size: Option<usize>,

    /// Commit each source after this many messages
    #[arg(long, env = "COMMIT_INTERVAL")]
    pub commit_interval: Option<usize>,

    /// Output file, stdout when omitted
    #[arg(short, long, env = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// JSON config file; command line values take precedence
    #[arg(long, env = "MEAN_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn load_config(&self) -> Result<MeanConfig, Box<dyn Error>> {
        let mut conf: HashMap<String, serde_json::Value> = match &self.config {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => HashMap::new(),
        };
        if let Some(window_size) = self.window_size {
            conf.insert("window_size".to_string(), window_size.into());
        }
        if let Some(commit_interval) = self.commit_interval {
            conf.insert("commit_interval".to_string(), commit_interval.into());
        }
        Ok(MeanConfig::new(Some(conf))?)
    }
}
