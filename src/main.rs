use clap::Parser;
use element_identity::bench::bench_model::BenchOptions;
use element_identity::cli::commands::{
    cmd_bench, cmd_compare, cmd_ids, cmd_locate, cmd_tree, cmd_validate,
};
use element_identity::cli::config::{
    Cli, Commands, build_extract_options, build_match_options, load_config,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Tree {
            source,
            visibility,
            selector_order,
        } => {
            let options = build_extract_options(&config, visibility, selector_order);
            cmd_tree(&source, &options, &config)?;
        }
        Commands::Ids {
            source,
            selector_order,
        } => {
            let options = build_extract_options(&config, None, selector_order);
            cmd_ids(&source, &options, &config)?;
        }
        Commands::Compare {
            source,
            locators_a,
            locators_b,
            hop_budget,
        } => {
            let options = build_match_options(&config, hop_budget);
            cmd_compare(&source, &locators_a, &locators_b, &options, &config)?;
        }
        Commands::Locate { source, x, y } => {
            cmd_locate(&source, x, y, &config)?;
        }
        Commands::Validate { source, locator } => {
            if !cmd_validate(&source, &locator, &config)? {
                std::process::exit(1);
            }
        }
        Commands::Bench {
            expected,
            candidate,
            snapshot,
            max_distance,
            hop_budget,
            format,
            output,
        } => {
            let options = BenchOptions {
                matcher: build_match_options(&config, hop_budget),
                max_distance,
            };
            let all_passed = cmd_bench(
                &expected,
                &candidate,
                snapshot.as_deref(),
                &options,
                &format,
                output.as_deref(),
                &config,
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
