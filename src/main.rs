//! cstidy - using/namespace header normalizer for C# source code

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, BufReader, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use cstidy::process::format_source;
use cstidy::{find_directive, parse_args, CliArgs, Config, Result};
use glob::Pattern;
use rayon::prelude::*;
use walkdir::WalkDir;

/// C# file extensions to process
const CSHARP_EXTENSIONS: &[&str] = &["cs", "csx", "CS", "CSX"];

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = parse_args();

    // Check if we should read from stdin
    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // If no inputs and running interactively, print usage; otherwise read from stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        // Process stdin - use current directory for config discovery
        let config = build_config(&args, None)?;
        return process_stdin(&config, &args);
    }

    // Build base configuration for parallel processing
    // For explicit config files, we use one config for all files
    // For auto-discovery, each file may have its own config
    let use_per_file_config = args.config.is_none();
    let base_config = if use_per_file_config {
        None
    } else {
        Some(build_config(&args, None)?)
    };

    // Configure thread pool if --jobs specified
    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                eprintln!("Warning: failed to configure thread pool: {e}");
            }
        }
    }

    // Collect all files to process
    let files = collect_files(&args);

    if files.is_empty() {
        if !args.silent {
            eprintln!("No C# files found to format.");
        }
        return Ok(());
    }

    // Process files
    let use_sequential = args.stdout || args.diff || args.jobs == Some(1);
    if use_sequential {
        process_files_sequential(&files, base_config.as_ref(), &args);
    } else {
        process_files_parallel(&files, base_config.as_ref(), &args);
    }

    Ok(())
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        // Explicit config file specified
        if args.debug {
            eprintln!(
                "[DEBUG] Using explicit config file: {}",
                config_path.display()
            );
        }
        Config::from_toml_file(config_path)?
    } else if let Some(path) = for_path {
        // Auto-discover config files from parent directories
        if args.debug {
            let discovered = Config::discover_config_files(path);
            if discovered.is_empty() {
                eprintln!("[DEBUG] No config files discovered for: {}", path.display());
            } else {
                eprintln!("[DEBUG] Discovered config files for {}:", path.display());
                for f in &discovered {
                    eprintln!("[DEBUG]   - {}", f.display());
                }
            }
        }
        Config::from_discovered_files(path)
    } else {
        // No path provided, use current directory for discovery
        Config::from_discovered_files(&std::env::current_dir().unwrap_or_default())
    };

    // Override with CLI arguments
    if let Some(order) = &args.order {
        config.usings_order.clone_from(order);
    }
    if args.no_sort_usings {
        config.sort_usings = false;
    }
    if let Some(split) = args.split_groups {
        config.split_groups = split;
    }

    if args.debug {
        eprintln!("[DEBUG] Configuration:");
        eprintln!("[DEBUG]   sort_usings: {}", config.sort_usings);
        eprintln!("[DEBUG]   usings_order: {}", config.usings_order);
        eprintln!("[DEBUG]   split_groups: {}", config.split_groups);
    }

    // Validate configuration
    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    // Compile exclude patterns
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let custom_extensions = &args.csharp_extensions;

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                // Recursive directory traversal
                // Note: WalkDir detects symlink loops when follow_links(true) and
                // returns errors for them. We skip errors via filter_map(ok).
                // max_depth prevents runaway traversal in pathological directory structures.
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_csharp_file(path, custom_extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else {
                // Non-recursive: only direct children
                if let Ok(entries) = std::fs::read_dir(input) {
                    for entry in entries.filter_map(std::result::Result::ok) {
                        let path = entry.path();
                        if path.is_file()
                            && is_csharp_file(&path, custom_extensions)
                            && !is_excluded(&path, &exclude_patterns)
                        {
                            files.push(path);
                        }
                    }
                }
            }
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        // Match against full path
        if pattern.matches(&path_str) {
            return true;
        }

        // Match against file name only
        if let Some(file_name) = path.file_name() {
            if pattern.matches(&file_name.to_string_lossy()) {
                return true;
            }
        }

        // Match against each path component (for directory patterns)
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has a C# extension
/// Checks against both default extensions and any custom extensions provided
fn is_csharp_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            if CSHARP_EXTENSIONS.contains(&ext) {
                return true;
            }
            for custom in custom_extensions {
                let custom_ext = custom.strip_prefix('.').unwrap_or(custom);
                if ext == custom_ext {
                    return true;
                }
            }
            false
        })
}

/// Process files sequentially (for stdout output)
fn process_files_sequential(files: &[PathBuf], base_config: Option<&Config>, args: &CliArgs) {
    for path in files {
        // Use base config if provided, otherwise discover per-file config
        let file_result = if let Some(config) = base_config {
            process_single_file(path, config, args)
        } else {
            match build_config(args, Some(path)) {
                Ok(config) => process_single_file(path, &config, args),
                Err(e) => Err(e),
            }
        };

        if let Err(e) = file_result {
            eprintln!("Error formatting {}: {}", path.display(), e);
        }
    }
}

/// Process files in parallel using Rayon
fn process_files_parallel(files: &[PathBuf], base_config: Option<&Config>, args: &CliArgs) {
    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let file_result = if let Some(config) = base_config {
            process_single_file(path, config, args)
        } else {
            match build_config(args, Some(path)) {
                Ok(config) => process_single_file(path, &config, args),
                Err(e) => Err(e),
            }
        };

        match file_result {
            Ok(()) => {
                success_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                eprintln!("Error formatting {}: {}", path.display(), e);
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    if !args.silent {
        if errors == 0 {
            eprintln!("Formatted {success} files successfully.");
        } else {
            eprintln!("Formatted {success} files, {errors} errors.");
        }
    }
}

/// Apply directive overrides from file contents to a configuration
fn apply_directive_overrides(config: &mut Config, contents: &str, debug: bool, source_name: &str) {
    if let Some(overrides) = find_directive(&mut BufReader::new(contents.as_bytes())) {
        if debug {
            eprintln!("[DEBUG] Found file directive in {source_name}");
        }
        if let Some(sort_usings) = overrides.sort_usings {
            if debug {
                eprintln!("[DEBUG]   Directive override: sort_usings = {sort_usings}");
            }
            config.sort_usings = sort_usings;
        }
        if let Some(order) = overrides.usings_order {
            if debug {
                eprintln!("[DEBUG]   Directive override: usings_order = {order}");
            }
            config.usings_order = order;
        }
        if let Some(split_groups) = overrides.split_groups {
            if debug {
                eprintln!("[DEBUG]   Directive override: split_groups = {split_groups}");
            }
            config.split_groups = split_groups;
        }
    }
}

/// Process a single file
fn process_single_file(path: &PathBuf, config: &Config, args: &CliArgs) -> Result<()> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let metadata = std::fs::metadata(path)?;
    let file_size = metadata.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            let size_mb = file_size / (1024 * 1024);
            let limit_mb = DEFAULT_MAX_FILE_SIZE / (1024 * 1024);
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                size_mb,
                limit_mb
            );
        }
        return Ok(());
    }

    let contents = std::fs::read_to_string(path)?;

    if !args.silent && !args.stdout {
        eprintln!("Formatting: {}", path.display());
    }

    // Make a per-file copy of config that can be overridden by directives
    let mut file_config = config.clone();
    apply_directive_overrides(
        &mut file_config,
        &contents,
        args.debug,
        path.to_str().unwrap_or("unknown"),
    );

    let output = format_source(&contents, &file_config)?;

    // Output results
    if args.stdout {
        io::stdout().write_all(output.as_bytes())?;
    } else if args.diff {
        if !args.silent {
            println!("=== {} ===", path.display());
        }
        io::stdout().write_all(output.as_bytes())?;
    } else {
        // Write back to file (in-place) only when the content changed
        if output != contents {
            std::fs::write(path, &output)?;
        }
    }

    Ok(())
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<()> {
    // Read all input from stdin
    let mut stdin_contents = String::new();
    io::stdin().read_to_string(&mut stdin_contents)?;

    // Check size after reading to prevent processing extremely large input
    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    // Make a copy of config that can be overridden by directives
    let mut file_config = config.clone();
    apply_directive_overrides(&mut file_config, &stdin_contents, args.debug, "stdin");

    let output = format_source(&stdin_contents, &file_config)?;

    // Always output to stdout when reading from stdin
    io::stdout().write_all(output.as_bytes())?;

    if !args.silent {
        eprintln!("Formatted stdin successfully.");
    }

    Ok(())
}

fn print_usage() {
    println!(
        "cstidy v{} - C# using/namespace header normalizer",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Sorts and deduplicates using directives, converts block-scoped");
    println!("namespaces to file-scoped syntax, and moves the namespace");
    println!("declaration to the top of the file.");
    println!();
    println!("Usage:");
    println!("  cstidy [OPTIONS] <FILE>...");
    println!("  cstidy [OPTIONS] -r <DIRECTORY>");
    println!("  cstidy [OPTIONS] -              # Read from stdin");
    println!("  cat File.cs | cstidy            # Pipe input");
    println!();
    println!("Examples:");
    println!("  cstidy File.cs                          # Format single file in-place");
    println!("  cstidy *.cs                             # Format multiple files");
    println!("  cstidy -r src/                          # Recursively format directory");
    println!("  cstidy --stdout File.cs                 # Output to stdout");
    println!("  cstidy -o \"System Microsoft\" File.cs    # Custom namespace priority");
    println!();
    println!("Options:");
    println!("  -o, --order <LIST>         Namespace priority list [default: \"System\"]");
    println!("  --no-sort-usings           Don't sort using directives");
    println!("  --split-groups[=BOOL]      Blank lines between using groups [default: true]");
    println!("  --no-split-groups          Same as --split-groups=false");
    println!("  -r, --recursive            Process directories recursively");
    println!("  -e, --exclude <PATTERN>    Exclude files/dirs matching pattern (repeatable)");
    println!("  -f, --csharp <EXT>         Additional C# extension (repeatable)");
    println!("  -s, --stdout               Output to stdout");
    println!("  -d, --diff                 Show formatted output without modifying files");
    println!("  -c, --config <FILE>        Config file path (overrides auto-discovery)");
    println!("  -j, --jobs <NUM>           Parallel jobs (0=auto, 1=sequential)");
    println!("  -S, --silent               Silent mode");
    println!("  -D, --debug                Enable debug output");
    println!("  -h, --help                 Print help");
    println!();
    println!("Supported extensions: .cs, .csx (case-insensitive)");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for cstidy.toml in parent directories starting from the");
    println!("  file being formatted up to the root directory, plus the home");
    println!("  directory. More specific configs override less specific ones.");
    println!();
    println!("In-file directives:");
    println!("  // cstidy: --order \"System Microsoft\" --no-split-groups");
}
