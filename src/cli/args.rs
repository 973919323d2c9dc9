use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "fingerprint_roi")]
#[command(about = "Detect fingerprint core points and extract 101x101 regions of interest")]
#[command(version)]
pub struct Cli {
    /// Input directory containing fingerprint images
    #[arg(short, long, default_value = "test_data")]
    pub input: PathBuf,

    /// Output directory for ROI images and the JSON report
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Maximum number of files to process (default: all)
    #[arg(short = 'n', long)]
    pub max_files: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Scan the input directory recursively
    #[arg(long)]
    pub recursive: bool,

    /// Process images one by one instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Number of worker tasks for parallel detection
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Image cache budget in megabytes
    #[arg(long, default_value = "256")]
    pub cache_mb: usize,

    /// Detection parameters as a JSON file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// `-v` の有無に応じたログレベル
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
