//! Label resolution against a live browser.
//!
//! Requires a running WebDriver server (geckodriver, chromedriver, ...).
//!
//! Usage:
//!   cargo run --example webdriver_form --features webdriver
//!   cargo run --example webdriver_form --features webdriver -- --webdriver http://localhost:9515
//!   cargo run --example webdriver_form --features webdriver -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use common::Args;
use label_locator::{LabelResolver, Result, WebDriverDocument};

// ============================================================================
// Constants
// ============================================================================

const FORM_PAGE: &str = "data:text/html,\
    <form>\
      <label for='fn'>First Name <span>*</span></label><input id='fn'>\
      <div><label>Email</label></div><div><input type='email' id='email'></div>\
      <label>Subscribe <input type='checkbox' id='sub'></label>\
    </form>";

const LABELS: &[&str] = &["First Name", "Email", "Subscribe"];

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== WebDriver Label Resolution ===\n");

    println!("[Setup] Connecting to {}...", args.webdriver_url);
    let page = WebDriverDocument::connect(&args.webdriver_url).await?;
    page.goto(FORM_PAGE).await?;
    println!("        ✓ Form loaded\n");

    let resolver = LabelResolver::new();
    let result = resolve_all(&page, &resolver).await;

    page.close().await?;
    result?;

    println!("=== Done ===");
    Ok(())
}

async fn resolve_all(page: &WebDriverDocument, resolver: &LabelResolver) -> Result<()> {
    for (step, label) in LABELS.iter().enumerate() {
        println!("[{}] resolve({label:?})", step + 1);
        let resolution = resolver
            .locate(page, label, Duration::from_secs(5))
            .await?;
        let id = resolution
            .element
            .attr("id")
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        println!("    ✓ #{id} via {}\n", resolution.strategy);
    }
    Ok(())
}
