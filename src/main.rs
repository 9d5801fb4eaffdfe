use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tailwind_inliner::{args::Cli, config, generate, EmitOutcome, NodeTailwindCompiler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut configs = config::from_file(&cli.config)?;
    if cli.validate {
        for config in &mut configs {
            config.validate = true;
        }
    }

    let progress = if cli.verbose {
        ProgressBar::with_draw_target(Some(configs.len() as u64), ProgressDrawTarget::hidden())
    } else {
        let pb = ProgressBar::new(configs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
                .unwrap(),
        );
        pb
    };

    let mut written = 0usize;
    let mut unchanged = 0usize;
    let mut skipped = 0usize;

    for config in &configs {
        progress.set_message(config.output_file.display().to_string());

        if cli.verbose {
            eprintln!(
                "Generating {} from {:?}",
                config.output_file.display(),
                config.input_filespec.to_vec()
            );
        }

        let mut compiler = NodeTailwindCompiler::new(&cli.node_command, &config.base_dir)?;
        match generate(config, &mut compiler).await {
            Ok(result) => {
                match result.outcome {
                    EmitOutcome::Written => written += 1,
                    EmitOutcome::Unchanged => unchanged += 1,
                    EmitOutcome::Skipped => skipped += 1,
                }

                if cli.verbose {
                    eprintln!(
                        "  - {} template file(s), {} unique class(es), {} static entr(ies), {} dynamic pattern(s)",
                        result.stats.template_files,
                        result.stats.unique_classes,
                        result.stats.static_entries,
                        result.stats.dynamic_patterns
                    );
                }
            }
            Err(e) => {
                progress.abandon();
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }

        progress.inc(1);
    }

    progress.finish_with_message("done");

    println!(
        "Generation complete: {} written, {} unchanged, {} skipped",
        written, unchanged, skipped
    );

    Ok(())
}
