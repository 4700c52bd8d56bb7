//! Complete workflow demonstration for voronoi_island
//!
//! Run with `RUST_LOG=debug cargo run --example island_demo` to see the
//! per-stage log output.

use voronoi_island::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== voronoi_island Demo ===\n");

    // Step 1: Configure the island
    println!("Step 1: Configuring island...");
    let config = IslandConfigBuilder::new()
        .seed(12345)
        .size(200)?
        .octaves(5)?
        .moisture(0.6)?
        .build()?;

    println!("  Seed: {}", config.height_field.seed);
    println!("  Size: {}", config.size());
    println!("  Moisture: {}", config.moisture);

    // Step 2: Generate
    println!("\nStep 2: Generating island...");
    let partition = Partition::square_grid(config.size() as f32, 40);
    let island = Island::generate(config, &partition)?;
    let field = island.height_field();
    println!("  Generated {} faces", island.face_count());
    println!(
        "  Elevation range: [{:.2}, {:.2}]",
        field.min_value(),
        field.max_value()
    );

    // Step 3: Biome distribution
    println!("\nStep 3: Biome distribution:");
    for (biome, count) in island.graph().biome_histogram() {
        let pct = (count as f32 / island.face_count() as f32) * 100.0;
        let [r, g, b, _] = BasicColorMapper.map_color(&biome);
        println!(
            "  {:<28} {:>5} ({:>5.1}%)  rgb({:.0}, {:.0}, {:.0})",
            biome.name(),
            count,
            pct,
            r * 255.0,
            g * 255.0,
            b * 255.0
        );
    }

    // Step 4: Spatial queries
    #[cfg(feature = "spatial-index")]
    {
        println!("\nStep 4: Spatial queries:");
        let centre = Vec2::splat(island.config().size() as f32 * 0.5);
        if let Some(id) = island.find_face_at(centre) {
            let face = island.face(id)?;
            println!(
                "  Point {} -> face {} ({}, elevation {:.2})",
                centre,
                id,
                face.biome.name(),
                face.elevation()
            );
            println!("  Face has {} neighbours", island.graph().neighbors(id).count());
        }
    }

    // Step 5: Evaluate
    println!("\nStep 5: Evaluation:");
    let results = island.evaluate();
    print!("{}", results);

    println!("\n=== Demo Complete ===");
    Ok(())
}
