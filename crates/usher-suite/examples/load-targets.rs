//! Example: Load and display target definitions from the target-definitions directory.

use usher_suite::TargetLoader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Try to load from the default directory (target-definitions/)
    println!("Loading target definitions from target-definitions/...\n");

    let loader = match TargetLoader::with_default_dir() {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("\nMake sure you're running this from the workspace root!");
            return Err(Box::new(e));
        }
    };

    let definitions = loader.load_all()?;

    println!(
        "✓ Successfully loaded {} target definitions:\n",
        definitions.len()
    );

    for def in &definitions {
        println!("  • {} ({})", def.target.name, def.id());
        println!("    Base URL: {}", def.target.base_url);
        println!(
            "    Backend markers: {} + {}",
            def.backend.host_marker, def.backend.resource_marker
        );
        println!(
            "    Rate limit: {} submissions/hour",
            def.rate_limit.hourly_threshold
        );
        println!("    Open button: {}", def.widget.open_button);
        println!();
    }

    Ok(())
}
