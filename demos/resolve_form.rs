//! Label resolution demonstration over an in-memory form.
//!
//! Demonstrates:
//! - Each strategy in the chain (explicit, proximity, containment, attribute)
//! - Decorated labels ("First Name *")
//! - Waiting for a label that renders late
//! - Timeout and exhaustion failures
//!
//! Usage:
//!   cargo run --example resolve_form
//!   cargo run --example resolve_form -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use common::Args;
use label_locator::{
    Error, LabelGate, LabelResolver, LiveDocument, Node, ResolverOptions, Result, StaticDocument,
};

// ============================================================================
// Constants
// ============================================================================

const TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    println!("=== Label Resolution ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    println!("[Setup] Building signup form...");
    let page = signup_form();
    println!("        ✓ {} nodes (snapshot={})\n", page.len(), page.id());

    let resolver = LabelResolver::with_options(
        ResolverOptions::new().with_poll_interval(Duration::from_millis(50)),
    )?;

    // ========================================================================
    // Strategy chain
    // ========================================================================

    for (step, label) in ["First Name", "Email", "Subscribe", "Phone"].iter().enumerate() {
        println!("[{}] resolve({label:?})", step + 1);
        let resolution = resolver.locate(&page, label, TIMEOUT).await?;
        let id = page.attribute(&resolution.element, "id")?.unwrap_or("?");
        println!("    ✓ #{id} via {}", resolution.strategy);
        println!("    Attempted: {:?}\n", resolution.attempted);
    }

    // ========================================================================
    // Failures
    // ========================================================================

    println!("[5] resolve(\"Mobile Number\") with no such label");
    match resolver
        .resolve(&page, "Mobile Number", Duration::from_millis(300))
        .await
    {
        Err(e @ Error::LabelNotVisible { .. }) => println!("    ✓ {e}\n"),
        other => println!("    ✗ Unexpected: {other:?}\n"),
    }

    println!("[6] resolve(\"Notes\") with an orphan label");
    match resolver.resolve(&page, "Notes", TIMEOUT).await {
        Err(e @ Error::FieldNotFound { .. }) => println!("    ✓ {e}\n"),
        other => println!("    ✗ Unexpected: {other:?}\n"),
    }

    println!("[7] Relaxed gate resolves \"Search\" by aria-label");
    let relaxed = LabelResolver::with_options(
        resolver.options().clone().with_label_gate(LabelGate::Relaxed),
    )?;
    let search = relaxed
        .resolve(&page, "Search", Duration::from_millis(300))
        .await?;
    println!("    ✓ #{}\n", page.attribute(&search, "id")?.unwrap_or("?"));

    // ========================================================================
    // Late rendering
    // ========================================================================

    println!("[8] Waiting for a label rendered after 500ms...");
    let live = LiveDocument::new(Node::form());
    let writer = live.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        writer.replace(
            Node::form()
                .with_child(Node::label("Password").with_attr("for", "pw"))
                .with_child(Node::input().with_attr("id", "pw").with_attr("type", "password")),
        );
    });

    let password = resolver.resolve(&live, "Password", TIMEOUT).await?;
    println!(
        "    ✓ #{}\n",
        live.snapshot().attribute(&password, "id")?.unwrap_or("?")
    );

    println!("=== Done ===");
    Ok(())
}

// ============================================================================
// Fixtures
// ============================================================================

fn signup_form() -> StaticDocument {
    StaticDocument::new(Node::form().with_children([
        // Explicit association with a decorated label
        Node::div().with_children([
            Node::label("First Name")
                .with_attr("for", "fn")
                .with_child(Node::element("span").with_text(" *")),
            Node::input().with_attr("id", "fn"),
        ]),
        // Label followed by its input
        Node::div().with_children([
            Node::label("Email"),
            Node::input().with_attr("type", "email").with_attr("id", "email"),
        ]),
        // Placeholder matches the label text
        Node::input()
            .with_attr("id", "phone")
            .with_attr("placeholder", "Phone"),
        Node::input()
            .with_attr("id", "q")
            .with_attr("aria-label", "Search"),
        // Input nested in its label, no input after it
        Node::div().with_child(
            Node::label("Subscribe ")
                .with_child(Node::input().with_attr("type", "checkbox").with_attr("id", "sub")),
        ),
        Node::label("Phone"),
        Node::label("Notes"),
    ]))
}
