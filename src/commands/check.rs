//! Check command implementation.
//!
//! Validates system requirements and configuration.

use anyhow::Result;

use crate::config::{validate_effective_config, Config};
use crate::startup_checks::validate_requirements;

/// Validates system requirements and configuration.
pub fn command_check(pid: Option<u32>, config: &Config) -> Result<()> {
    println!("🔍 pcstat - System Check");
    println!("========================");

    let mut all_ok = true;

    println!("\n💾 Checking residency query, /proc and privileges...");
    match validate_requirements(pid) {
        Ok(()) => println!("   ✅ Runtime requirements met"),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - run with --log-level info for details");
        std::process::exit(1);
    }
}
