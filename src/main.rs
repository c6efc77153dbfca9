use clap::Parser;
use keep_page::Captures;
use keep_page::config::CaptureConfig;
use keep_page::results::{CaptureReport, CaptureStatus};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting capture run for {} URLs", args.web_urls.len());

    let config = CaptureConfig {
        output_dir: args.output_dir,
        print_metadata: args.metadata,
        deep_fetch: args.deep,
        timeout_secs: args.timeout,
        ..CaptureConfig::default()
    };

    let captures = Captures::new(args.web_urls).with_config(config);
    let outcomes = match captures.run().await {
        Ok(outcomes) => outcomes,
        Err(e) => {
            ::log::error!("Failed to start capture run: {}", e);
            return;
        }
    };

    // Report outcomes in input order. Individual failures are reported here
    // but never change the exit code.
    for outcome in &outcomes {
        match &outcome.status {
            CaptureStatus::Captured(report) => {
                if report.localization_failed {
                    println!("Failed to save all images for URL : {}", outcome.url);
                }
                if args.metadata {
                    print_summary(&outcome.url, report);
                }
            }
            CaptureStatus::Failed(e) => {
                ::log::debug!("Capture of {} failed: {}", outcome.url, e);
                println!("Unable to fetch URL : {}", outcome.url);
            }
        }
    }

    let saved = outcomes.iter().filter(|o| o.status.is_success()).count();
    ::log::info!("Capture run complete - saved {} of {} pages", saved, outcomes.len());
}

/// Print the bordered summary block for one captured page
fn print_summary(url: &str, report: &CaptureReport) {
    println!("#############################################################");
    println!("Web URL : {}", url);
    println!("No of links : {}", report.current.links_count);
    println!("No of images : {}", report.current.images_count);
    println!("Fetch date : {}", report.current.fetch_date);
    if let Some(last) = &report.previous {
        println!("Last fetch date : {}", last.fetch_date);
        println!("Last fetch No of links : {}", last.links_count);
        println!("Last fetch No of images : {}", last.images_count);
    }
    println!("#############################################################");
}
