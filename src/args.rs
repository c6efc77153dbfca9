use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "keep-page")]
#[command(about = "Fetch web pages and save them to disk")]
#[command(version)]
pub struct Args {
    /// Web URLs to fetch
    #[arg(required = true, value_name = "WEB-URL")]
    pub web_urls: Vec<String>,

    /// Print metadata information about the web URLs
    #[arg(long)]
    pub metadata: bool,

    /// Download all images and rewrite pages to reference the local copies
    #[arg(long)]
    pub deep: bool,

    /// Directory to write captures into
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}
