//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `besteats_core` linkage.
//! - Optionally open a favorites database and print its contents.
//! - Keep output deterministic for quick local sanity checks.

use besteats_core::{BestEatsCore, CoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("besteats_core ping={}", besteats_core::ping());
    println!("besteats_core version={}", besteats_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let config = CoreConfig {
        db_path: db_path.into(),
        ..CoreConfig::default()
    };
    let core = match BestEatsCore::open(config) {
        Ok(core) => core,
        Err(err) => {
            eprintln!("besteats_core open failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let favorites = core.favorites().list_all();
    println!("favorites count={}", favorites.len());
    for restaurant in favorites {
        println!("- {} ({} menus)", restaurant.name, restaurant.menus.len());
        for menu in &restaurant.menus {
            println!("    {} {}원", menu.name, menu.price);
        }
    }

    if let Err(err) = core.close() {
        eprintln!("besteats_core close failed: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
