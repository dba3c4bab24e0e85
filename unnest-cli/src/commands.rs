//! CLI command execution
//!
//! Resolves configuration, runs the loader over the requested declaration(s) and either prints
//! the result in the requested format or writes the rewritten file back.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use unnest_config::{ConfigError, Loader};
use unnest_parser::unnest::formats::{self, Format};
use unnest_parser::unnest::{FlatDeclaration, LoaderError, Markers, SourceLoader};

/// Optional per-directory configuration file picked up from the working directory.
const LOCAL_CONFIG: &str = "unnest.toml";

/// Which declarations to work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The declaration starting at this 1-based line
    Line(usize),
    All,
}

/// Everything the command line asked for.
#[derive(Debug, Clone)]
pub struct Request {
    pub path: PathBuf,
    pub target: Target,
    pub in_place: bool,
    pub format: Option<String>,
    pub config: Option<PathBuf>,
    pub declaration: Option<String>,
    pub nested: Option<String>,
}

/// Errors reported by the CLI
#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Usage(String),
    Loader(LoaderError),
    NotADeclaration { path: PathBuf, line: usize },
    Io { path: PathBuf, message: String },
    Json(String),
}

impl CliError {
    /// Source lines around the failure, when there is one to show.
    pub fn source_context(&self) -> &str {
        match self {
            CliError::Loader(err) => err.source_context(),
            _ => "",
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(err) => write!(f, "configuration error: {}", err),
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Loader(err) => write!(f, "{}", err),
            CliError::NotADeclaration { path, line } => write!(
                f,
                "{}:{}: line {} is not a declaration",
                path.display(),
                line,
                line
            ),
            CliError::Io { path, message } => {
                write!(f, "{}: IO error: {}", path.display(), message)
            }
            CliError::Json(msg) => write!(f, "JSON serialization failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err)
    }
}

impl From<LoaderError> for CliError {
    fn from(err: LoaderError) -> Self {
        CliError::Loader(err)
    }
}

/// Execute a request, printing to stdout unless it rewrites in place.
pub fn run(request: &Request) -> Result<(), CliError> {
    let (markers, format) = resolve_settings(request)?;
    let loader = SourceLoader::from_path(&request.path)?.with_markers(markers);

    if request.in_place {
        return rewrite_in_place(&loader, request);
    }

    let output = render(&loader, request, format)?;
    print!("{}", output);
    Ok(())
}

/// Layer defaults, `./unnest.toml`, `--config` and flag overrides.
fn resolve_settings(request: &Request) -> Result<(Markers, Format), CliError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = &request.config {
        loader = loader.with_file(path);
    }
    if let Some(marker) = &request.declaration {
        loader = loader.set_override("markers.declaration", marker.as_str())?;
    }
    if let Some(marker) = &request.nested {
        loader = loader.set_override("markers.nested", marker.as_str())?;
    }
    let config = loader.build()?;

    let format = match &request.format {
        Some(name) => name.parse::<Format>().map_err(CliError::Usage)?,
        None => config.output.format.into(),
    };
    tracing::debug!(format = %format, "resolved settings");
    Ok((config.markers.into(), format))
}

/// Produce the text to print for the requested target and format.
fn render(loader: &SourceLoader, request: &Request, format: Format) -> Result<String, CliError> {
    match format {
        Format::Tree => render_trees(loader, request),
        Format::Json => formats::to_json(&flat_declarations(loader, request)?)
            .map_err(|e| CliError::Json(e.to_string())),
        Format::Names => Ok(formats::to_names(&flat_declarations(loader, request)?)),
        Format::Text => Ok(formats::to_text(&flat_declarations(loader, request)?)),
    }
}

fn flat_declarations(
    loader: &SourceLoader,
    request: &Request,
) -> Result<Vec<FlatDeclaration>, CliError> {
    match request.target {
        Target::All => Ok(loader
            .flatten_all()?
            .into_iter()
            .flat_map(|group| group.declarations)
            .collect()),
        Target::Line(line) => {
            let flat = loader.flatten_one(line - 1)?;
            if flat.is_empty() {
                return Err(not_a_declaration(&request.path, line));
            }
            Ok(flat)
        }
    }
}

fn render_trees(loader: &SourceLoader, request: &Request) -> Result<String, CliError> {
    let starts = match request.target {
        Target::All => loader.declarations(),
        Target::Line(line) => vec![line - 1],
    };

    let mut rendered = Vec::with_capacity(starts.len());
    for start in starts {
        let tree = loader
            .tree(start)?
            .ok_or_else(|| not_a_declaration(&request.path, start + 1))?;
        rendered.push(formats::to_treeviz(&tree));
    }
    Ok(rendered.join("\n"))
}

fn rewrite_in_place(loader: &SourceLoader, request: &Request) -> Result<(), CliError> {
    let rewritten = match request.target {
        Target::All => loader.rewrite()?,
        Target::Line(line) => loader
            .rewrite_at(line - 1)?
            .ok_or_else(|| not_a_declaration(&request.path, line))?,
    };

    if rewritten == loader.source() {
        tracing::info!(path = %request.path.display(), "nothing to flatten");
        return Ok(());
    }
    fs::write(&request.path, rewritten).map_err(|err| CliError::Io {
        path: request.path.clone(),
        message: err.to_string(),
    })?;
    tracing::info!(path = %request.path.display(), "rewrote file");
    Ok(())
}

fn not_a_declaration(path: &Path, line: usize) -> CliError {
    CliError::NotADeclaration {
        path: path.to_path_buf(),
        line,
    }
}
