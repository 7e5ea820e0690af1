//! Models command implementation
//!
//! Lists the registered model kinds and the runtime environment.

use shortrate_models::models::ModelKind;

use crate::Result;

/// Run the models command
pub fn run() -> Result<()> {
    println!("Registered models:");
    for kind in ModelKind::ALL {
        let capabilities: Vec<String> = kind.capabilities().iter().map(|c| c.to_string()).collect();
        println!("  {}", kind);
        println!("    Family: {:?}", kind.family());
        println!("    Risk factors: {}", kind.required_risk_factors().join(", "));
        println!("    Capabilities: {}", capabilities.join(", "));
    }

    println!();
    println!("Runtime:");
    println!("  CPU cores: {}", num_cpus::get());
    println!("  Version: {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
