//! Ring Archipelago
//!
//! Four islands run differential evolution on Rastrigin and exchange their
//! best individual with both ring neighbours after every round.
//!
//! Set `RUST_LOG=evo_archipelago=debug` to follow evolutions and migrations.

use std::sync::Arc;

use evo_archipelago::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Ring Archipelago ===\n");

    let config = ArchipelagoConfig {
        num_islands: 4,
        island_population_size: 20,
        generations_per_round: 25,
        rounds: 8,
        topology: TopologyKind::Ring,
        selection: MigrantSelection::Best(2),
        replacement: MigrantReplacement::ReplaceWorst,
        seed: Some(42),
    };

    let mut archipelago = ArchipelagoBuilder::from_config(config.clone())
        .problem(Arc::new(Rastrigin::new(5)))
        .algorithm(&DifferentialEvolution::with_seed(0.7, 0.9, 42)?)
        .build()?;

    println!("{}", archipelago.topology());

    let mut policy = config.migration_policy();
    for round in 0..config.rounds {
        archipelago.evolve(config.generations_per_round)?;
        archipelago.join()?;
        let report = archipelago.migrate(&mut policy)?;

        if let Some(champion) = archipelago.champion()? {
            println!(
                "Round {:2}: {} migrants, best fitness {:.6}",
                round,
                report.total_migrants(),
                champion.fitness[0]
            );
        }
    }

    println!("\nIsland statistics:");
    for stats in archipelago.island_statistics()? {
        println!(
            "  Island {}: {} generations, mean {:.4}, best {:?}",
            stats.index,
            stats.evolution_time,
            stats.mean_fitness.unwrap_or(f64::NAN),
            stats.best_fitness
        );
    }

    if let Some(champion) = archipelago.champion()? {
        println!("\nChampion:");
        println!("  Decision: {}", format_vector(&champion.decision));
        println!("  Fitness:  {}", format_vector(&champion.fitness));
    }

    Ok(())
}
