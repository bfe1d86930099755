use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// RAML doc generator - Document the axum routes of a Rust project as RAML
#[derive(Parser, Debug)]
#[command(name = "raml-docgen")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (raml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "raml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// API title
    #[arg(long, default_value = "API")]
    pub title: String,

    /// Base URI of the API
    #[arg(long = "base-uri", default_value = "")]
    pub base_uri: String,

    /// API version
    #[arg(long = "api-version", default_value = "v1.0")]
    pub api_version: String,

    /// Default media type
    #[arg(long = "media-type", default_value = "application/json")]
    pub media_type: String,

    /// Only document the router returned by this function (default: every root router)
    #[arg(short = 'r', long = "router", value_name = "FN")]
    pub router: Option<String>,

    /// Prefix of source links, followed by the file path relative to the project
    #[arg(long = "link-prefix", default_value = "https://")]
    pub link_prefix: String,

    /// Rewrite the first FROM in each source link to TO
    #[arg(long = "link-rewrite", value_name = "FROM=TO", value_parser = parse_rewrite)]
    pub link_rewrite: Option<(String, String)>,

    /// Protocol the API is served over (repeatable, e.g. HTTPS)
    #[arg(long = "protocol", value_name = "PROTOCOL")]
    pub protocols: Vec<String>,

    /// Top-level documentation page (repeatable)
    #[arg(long = "doc", value_name = "TITLE=CONTENT", value_parser = parse_doc)]
    pub docs: Vec<(String, String)>,

    /// Leave the middleware call chain out of descriptions
    #[arg(long = "no-middleware")]
    pub no_middleware: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// RAML 1.0 (YAML)
    Raml,
    /// JSON format
    Json,
}

fn parse_rewrite(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((from, to)) if !from.is_empty() => Ok((from.to_string(), to.to_string())),
        _ => Err(format!("expected FROM=TO, got {:?}", value)),
    }
}

fn parse_doc(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((title, content)) if !title.is_empty() && !content.is_empty() => {
            Ok((title.to_string(), content.to_string()))
        }
        _ => Err(format!("expected TITLE=CONTENT, got {:?}", value)),
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref router) = args.router {
        info!("Router: {}", router);
    } else {
        info!("Router: every root router");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::format::{DeveloperDocs, RepoLinker};
    use crate::parser::{AstParser, ParsedFile};
    use crate::raml::{Document, Documentation};
    use crate::scanner::FileScanner;
    use crate::serializer::{serialize_json, serialize_raml, write_to_file};
    use crate::source::axum::AxumRoutes;

    info!("Starting RAML document generation...");

    // Step 1: Scan directory for Rust files
    let scanner = FileScanner::new(args.project_path.clone());
    let scan_result = scanner.scan()?;

    info!("Found {} Rust files", scan_result.rust_files.len());
    if scan_result.rust_files.is_empty() {
        anyhow::bail!("No Rust files found in the project directory");
    }

    // Step 2: Parse files into AST
    let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.rust_files)
        .into_iter()
        .filter_map(|r| match r {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping file due to parse error: {:#}", e);
                None
            }
        })
        .collect();

    info!("Successfully parsed {} files", parsed_files.len());
    if parsed_files.is_empty() {
        anyhow::bail!("No files could be parsed successfully");
    }

    // Step 3: Walk the routers into the document
    let mut routes = AxumRoutes::new(&args.project_path, &parsed_files);
    if let Some(router) = &args.router {
        routes = routes.with_entry(router.clone());
    }

    let mut linker = RepoLinker::new(args.link_prefix.clone());
    if let Some((from, to)) = &args.link_rewrite {
        linker = linker.with_rewrite(from.clone(), to.clone());
    }
    let mut docs = DeveloperDocs::new(linker);
    if args.no_middleware {
        docs = docs.without_middleware();
    }

    let mut document = Document::new(
        args.title.clone(),
        args.base_uri.clone(),
        args.api_version.clone(),
        args.media_type.clone(),
    );
    document.protocols = args.protocols.iter().map(|p| p.to_uppercase()).collect();
    document.documentation = args
        .docs
        .iter()
        .map(|(title, content)| Documentation {
            title: title.clone(),
            content: content.clone(),
        })
        .collect();
    document.add_resources_from_walk(&routes, |method, path, handler, middlewares| {
        docs.format(method, path, handler, middlewares)
    })?;

    let method_count: usize = document.resources.values().map(|node| node.methods.len()).sum();
    if method_count == 0 {
        log::warn!("No routes found in the project");
    }

    // Step 4: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Raml => serialize_raml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 5: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Wrote RAML document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Summary:");
    info!("  - Files parsed: {}", parsed_files.len());
    info!("  - Paths documented: {}", document.resources.len());
    info!("  - Methods documented: {}", method_count);

    Ok(())
}
