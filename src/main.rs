use clap::{Parser, Subcommand};
use docweave::{config, output, pipeline, scan};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docweave")]
#[command(about = "Static site builder for documentation trees")]
#[command(long_about = "\
Static site builder for documentation trees

Your content directory is the book. Markdown files with front-matter headers
become pages, directory nesting becomes the navigation hierarchy, and
nav_weight orders siblings (ties break by path, deterministically).

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── _index.md                    # Root index page
  ├── intro.md                     # Page at /intro/
  └── concepts/
      ├── _index.md                # Section index at /concepts/
      ├── immutability.md
      └── recursion.md

Each page may open with a front-matter block:

  ---
  title: \"Recursion\"
  linkTitle: \"Recursion\"
  nav_weight: 20
  tags:
  - \"fp\"
  ---

Pages may embed self-assessment quizzes:

  {{< quizdown >}}
  ### What does map return?
  - [x] A lazy sequence
  - [ ] A vector
  > **Explanation:** Nothing is realized until consumed.
  {{< /quizdown >}}

Authoring anomalies (broken metadata lines, quizzes without exactly one
correct answer) are collected as warnings and reported; only duplicate
logical paths abort a build.

Run 'docweave gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".docweave-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory into a manifest
    Scan,
    /// Run the full pipeline: scan → navigation tree → HTML
    Build,
    /// Validate content without writing output
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            init_thread_pool(&cli.source);
            let manifest = scan::scan(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);
        }
        Command::Build => {
            println!("==> Scanning {}", cli.source.display());
            init_thread_pool(&cli.source);
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest);

            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;

            println!("==> Rendering HTML \u{2192} {}", cli.output.display());
            let (site, report) = pipeline::build(&manifest, &cli.output)?;
            output::print_build_output(&site.tree, &report);

            if report.is_failure(manifest.config.strict) {
                return Ok(ExitCode::FAILURE);
            }
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check { strict } => {
            println!("==> Checking {}", cli.source.display());
            init_thread_pool(&cli.source);
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest);

            // Tree construction is the one fatal validation; run it even
            // though check writes nothing.
            let site = pipeline::render_site(&manifest)?;
            let report = pipeline::report_for(&manifest, site.pages.len());

            let strict = strict || manifest.config.strict;
            if report.is_failure(strict) {
                println!(
                    "==> Check failed: {} warnings, {} unreadable pages",
                    report.warning_count(),
                    report.failed_pages.len()
                );
                return Ok(ExitCode::FAILURE);
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Initialize the rayon thread pool from the content root's config.
///
/// Must run before the first parallel stage — rayon's global pool is fixed
/// at first use. Caps at the number of available CPU cores; users can
/// constrain down, not up. Config errors are ignored here: scan reloads the
/// config and reports them properly.
fn init_thread_pool(source: &std::path::Path) {
    let processing = config::load_config(source)
        .map(|c| c.processing)
        .unwrap_or_default();
    let threads = config::effective_threads(&processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
