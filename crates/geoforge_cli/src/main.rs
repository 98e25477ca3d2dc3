//! GEOFORGE CLI
//!
//! Inspect and exercise a project's path aliases from the command line.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use geoforge_alias::{
    extract_alias_and_subpath, is_alias_reference, list_available_aliases, validate_alias_reference,
    ResolutionContext, Resolver,
};
use geoforge_config::{PathRewriter, ProjectConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geoforge")]
#[command(about = "GEOFORGE - project path alias resolution", long_about = None)]
struct Cli {
    /// Path to the project file
    #[arg(short, long, global = true, default_value = "project.json")]
    project: String,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a reference to an absolute path
    Resolve {
        /// Reference such as `@data.input/file`
        reference: String,
        /// Context key used for extension inference (e.g. geojsonFile)
        #[arg(short, long)]
        context_key: Option<String>,
        /// Explicit candidate extensions, tried in order
        #[arg(short, long = "ext")]
        extensions: Vec<String>,
    },
    /// List aliases and their resolved paths
    List {
        /// Only aliases whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check alias syntax without resolving
    Check {
        /// Strings to check
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// Show candidate extensions for a context key
    Extensions {
        /// Context key
        context_key: String,
    },
    /// Resolve every alias reference in a JSON configuration file
    Rewrite {
        /// Path to the JSON document
        file: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    run(cli.command, &cli.project)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "geoforge=debug" } else { "geoforge=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_context(project: &str) -> Result<ResolutionContext> {
    let config = ProjectConfig::load(project)?;
    tracing::debug!(project = config.name(), root = config.root(), "building context");
    let context = config
        .to_context()
        .wrap_err_with(|| format!("Invalid aliases in {project}"))?;
    Ok(context)
}

fn run(command: Commands, project: &str) -> Result<()> {
    match command {
        Commands::Check { candidates } => {
            for candidate in candidates {
                println!("{}", describe_syntax(&candidate));
            }
            Ok(())
        }
        Commands::Resolve {
            reference,
            context_key,
            extensions,
        } => {
            let context = &load_context(project)?;
            let resolver = Resolver::new();
            let path = if extensions.is_empty() {
                resolver.resolve(&reference, context, context_key.as_deref())?
            } else {
                resolver.resolve_with_extensions(&reference, context, &extensions)?
            };
            println!("{path}");
            Ok(())
        }
        Commands::List { prefix, json } => {
            let context = &load_context(project)?;
            let aliases = list_available_aliases(context, prefix.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&aliases)?);
            } else {
                let width = aliases.keys().map(String::len).max().unwrap_or(0);
                for (name, path) in &aliases {
                    println!("@{name:<width$}  {path}");
                }
            }
            Ok(())
        }
        Commands::Extensions { context_key } => {
            let context = load_context(project)?;
            match context.context_extensions(&context_key) {
                Some(extensions) => println!("{}", extensions.join(" ")),
                None => println!("No extensions registered for {context_key}"),
            }
            Ok(())
        }
        Commands::Rewrite { file } => {
            let context = &load_context(project)?;
            let text = std::fs::read_to_string(&file)
                .wrap_err_with(|| format!("Failed to read {file}"))?;
            let document: serde_json::Value = serde_json::from_str(&text)
                .wrap_err_with(|| format!("Failed to parse {file}"))?;
            let rewritten = PathRewriter::new(context).rewrite(&document)?;
            println!("{}", serde_json::to_string_pretty(&rewritten)?);
            Ok(())
        }
    }
}

fn describe_syntax(candidate: &str) -> String {
    if !is_alias_reference(candidate) {
        return format!("{candidate}: not an alias reference");
    }
    match extract_alias_and_subpath(candidate) {
        Err(err) => format!("{candidate}: {err}"),
        Ok(_) if !validate_alias_reference(candidate) => {
            format!("{candidate}: invalid alias in sub-path")
        }
        Ok((alias, Some(sub_path))) => format!("{candidate}: alias {alias}, sub-path {sub_path}"),
        Ok((alias, None)) => format!("{candidate}: alias {alias}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "geoforge",
            "--project",
            "site.json",
            "resolve",
            "@data.in/model",
            "--context-key",
            "geojsonFile",
        ])
        .unwrap();
        assert_eq!(cli.project, "site.json");
        match cli.command {
            Commands::Resolve {
                reference,
                context_key,
                extensions,
            } => {
                assert_eq!(reference, "@data.in/model");
                assert_eq!(context_key.as_deref(), Some("geojsonFile"));
                assert!(extensions.is_empty());
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_parse_repeated_extensions() {
        let cli =
            Cli::try_parse_from(["geoforge", "resolve", "@a/b", "--ext", ".shp", "--ext", ".gpkg"])
                .unwrap();
        match cli.command {
            Commands::Resolve { extensions, .. } => assert_eq!(extensions, vec![".shp", ".gpkg"]),
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_describe_syntax() {
        assert_eq!(describe_syntax("plain/path"), "plain/path: not an alias reference");
        assert_eq!(describe_syntax("@data.in"), "@data.in: alias @data.in");
        assert_eq!(
            describe_syntax("@data.in/x.json"),
            "@data.in/x.json: alias @data.in, sub-path x.json"
        );
        assert_eq!(describe_syntax("@a/@b..c"), "@a/@b..c: invalid alias in sub-path");
        assert!(describe_syntax("@a..b").starts_with("@a..b: "));
        assert!(!describe_syntax("@a..b").contains("not an alias reference"));
    }

    #[test]
    fn test_load_context_and_run() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project.json");
        std::fs::write(
            &project,
            r#"{"name": "cli", "pathAliases": {"data": {"in": "in"}}}"#,
        )
        .unwrap();
        let project = project.to_string_lossy().into_owned();

        let context = load_context(&project).unwrap();
        assert_eq!(context.project_name(), "cli");
        assert!(run(
            Commands::Resolve {
                reference: "@data.in/x.csv".to_string(),
                context_key: None,
                extensions: Vec::new(),
            },
            &project,
        )
        .is_ok());
        assert!(run(
            Commands::Resolve {
                reference: "@missing".to_string(),
                context_key: None,
                extensions: Vec::new(),
            },
            &project,
        )
        .is_err());
    }

    #[test]
    fn test_check_runs_without_project() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json").to_string_lossy().into_owned();

        let check = Commands::Check {
            candidates: vec!["@data.in".to_string(), "plain".to_string()],
        };
        assert!(run(check, &missing).is_ok());

        let list = Commands::List {
            prefix: None,
            json: false,
        };
        assert!(run(list, &missing).is_err());
    }
}
