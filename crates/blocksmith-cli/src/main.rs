use anyhow::{Context, Result};
use blocksmith_config::BlockConfig;
use blocksmith_dom::{parse_block, to_html};
use blocksmith_engine::blocks::{facts_figures, hero_teaser};
use blocksmith_engine::{BlockRuntime, DataLayer};
use std::{env, fs, process};

/// Viewport width used for the initial screen-size pass.
const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <facts-figures-cards|hero-teaser> <fixture.html>", args[0]);
        process::exit(1);
    }

    let config = match args[1].as_str() {
        "facts-figures-cards" => BlockConfig::facts_figures_cards(),
        "hero-teaser" => BlockConfig::hero_teaser(),
        other => {
            eprintln!("Unknown block type '{other}'");
            eprintln!("Usage: {} <facts-figures-cards|hero-teaser> <fixture.html>", args[0]);
            process::exit(1);
        }
    };

    // A config file can override breakpoints, ceilings and timing.
    let config = match BlockConfig::load() {
        Ok(Some(mut loaded)) => {
            loaded.class_name_prefix = config.class_name_prefix.clone();
            loaded
        }
        Ok(None) => config,
        Err(e) => {
            log::warn!("ignoring config file: {e}");
            config
        }
    };

    let markup = fs::read_to_string(&args[2])
        .with_context(|| format!("failed to read fixture '{}'", args[2]))?;
    let (mut doc, block) =
        parse_block(&markup).with_context(|| format!("failed to parse fixture '{}'", args[2]))?;

    let decoration = match config.class_name_prefix.as_str() {
        "hero-teaser" => hero_teaser::decorate(&mut doc, block, &config),
        _ => facts_figures::decorate(&mut doc, block, &config),
    };

    log::info!(
        "registered {} visibility triggers and {} event bindings",
        decoration.observers.len(),
        decoration.bindings.len()
    );

    // Simulate a first paint: initial viewport measurement, every observer
    // target fully visible, staggered reveals run to completion.
    let targets: Vec<_> = decoration.observers.iter().map(|t| t.target).collect();
    let mut runtime = BlockRuntime::new(doc, config, decoration);
    let mut layer = DataLayer::new();
    runtime.viewport_resized(DEFAULT_VIEWPORT_WIDTH);
    for target in targets {
        runtime.intersect(target, 1.0, &mut layer);
    }
    runtime.advance(10_000);

    println!("{}", to_html(runtime.doc(), block));

    if !layer.is_empty() {
        eprintln!("analytics:");
        for entry in layer.entries() {
            eprintln!("  {}", serde_json::to_string(entry)?);
        }
    }

    Ok(())
}
