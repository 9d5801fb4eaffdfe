pub mod config;
pub mod emitter;
pub mod engine;
pub mod errors;
pub mod resolver;
pub mod rules;
pub mod scanner;
pub mod theme;
pub mod validator;

#[cfg(feature = "cli")]
pub mod args;

pub use config::{GeneratorConfig, OneOrMany};
pub use emitter::{EmitOutcome, GenerationStats};
pub use engine::{NodeTailwindCompiler, UtilityCompiler};
pub use errors::{GeneratorError, Result};
pub use resolver::VariableTable;
pub use rules::{detect_dynamic_patterns, parse_rules, Dimension, DynamicPattern, DynamicShape, StaticStyleMap};
pub use scanner::ClassHarvester;
pub use theme::{FsResolver, ResolvedStylesheet, StylesheetResolver};
pub use validator::ValidationResult;

use chrono::Utc;

/// Result of running one configuration through the pipeline
#[derive(Debug)]
pub struct GenerationResult {
    pub stats: GenerationStats,
    pub validation: Option<ValidationResult>,
    pub outcome: EmitOutcome,
}

/// Run the full generation pipeline for one configuration:
/// scan -> harvest -> compose theme -> compile -> resolve/parse ->
/// (validate) -> emit.
///
/// A template read failure is fatal for this configuration; every other
/// problem degrades to a warning. No templates or no harvested classes is a
/// warned early return, not an error.
pub async fn generate(
    config: &GeneratorConfig,
    compiler: &mut dyn UtilityCompiler,
) -> Result<GenerationResult> {
    config.validate_fields()?;

    let glob_patterns = config.input_filespec.to_vec();
    let files = scanner::collect_files(&glob_patterns, &config.base_dir)?;

    if files.is_empty() {
        eprintln!(
            "Warning: No template files matched {:?}; skipping {}",
            glob_patterns,
            config.output_file.display()
        );
        return Ok(skipped_result(0, 0));
    }

    let harvester = ClassHarvester::new();
    let classes = harvester.harvest_files(&files)?;

    if classes.is_empty() {
        eprintln!(
            "Warning: No class tokens harvested from {} template file(s); skipping {}",
            files.len(),
            config.output_file.display()
        );
        return Ok(skipped_result(files.len(), 0));
    }

    let input_css = theme::compose_input(&config.css_input_paths());
    let stylesheet_resolver = FsResolver::new(&config.base_dir);

    let candidates: Vec<String> = classes.iter().cloned().collect();
    let compiled_css = compiler.compile(&input_css, &candidates, &stylesheet_resolver)?;

    let table = VariableTable::from_css(&compiled_css);
    let static_map = parse_rules(&compiled_css, &table);
    let dynamic_patterns = detect_dynamic_patterns(classes.iter().map(String::as_str));

    let validation = if config.validate {
        let result = validator::validate(&classes, &static_map, &dynamic_patterns);
        validator::report(&result);
        Some(result)
    } else {
        None
    };

    let stats = GenerationStats {
        template_files: files.len(),
        unique_classes: classes.len(),
        static_entries: static_map.len(),
        dynamic_patterns: dynamic_patterns.len(),
        generated_at: Utc::now(),
    };

    let module_text = emitter::render_module(&static_map, &dynamic_patterns, &stats);

    let output_path = if config.output_file.is_absolute() {
        config.output_file.clone()
    } else {
        config.base_dir.join(&config.output_file)
    };

    let outcome = emitter::write_if_changed(&output_path, &module_text)?;
    if outcome == EmitOutcome::Unchanged {
        eprintln!("{} is up to date, no write needed", output_path.display());
    }

    Ok(GenerationResult {
        stats,
        validation,
        outcome,
    })
}

/// Run each configuration in sequence. Configurations are independent; a
/// fatal error in one aborts the whole run.
pub async fn generate_all(
    configs: &[GeneratorConfig],
    compiler: &mut dyn UtilityCompiler,
) -> Result<Vec<GenerationResult>> {
    let mut results = Vec::with_capacity(configs.len());

    for config in configs {
        results.push(generate(config, compiler).await?);
    }

    Ok(results)
}

fn skipped_result(template_files: usize, unique_classes: usize) -> GenerationResult {
    GenerationResult {
        stats: GenerationStats {
            template_files,
            unique_classes,
            static_entries: 0,
            dynamic_patterns: 0,
            generated_at: Utc::now(),
        },
        validation: None,
        outcome: EmitOutcome::Skipped,
    }
}
