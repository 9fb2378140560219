use colored::Colorize;
use config::ConfigFileError;
use std::path::Path;

#[derive(Debug)]
pub struct UxError {
    pub what: String,
    pub why: Option<String>,
    pub how_to_fix: Vec<String>,
    pub suggested_command: Option<String>,
}

impl UxError {
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            why: None,
            how_to_fix: Vec::new(),
            suggested_command: None,
        }
    }

    pub fn why(mut self, reason: impl Into<String>) -> Self {
        self.why = Some(reason.into());
        self
    }

    pub fn fix(mut self, suggestion: impl Into<String>) -> Self {
        self.how_to_fix.push(suggestion.into());
        self
    }

    pub fn suggest(mut self, cmd: impl Into<String>) -> Self {
        self.suggested_command = Some(cmd.into());
        self
    }

    pub fn display(&self) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), self.what.white().bold());

        if let Some(why) = &self.why {
            eprintln!("       {}", why.dimmed());
        }

        if !self.how_to_fix.is_empty() {
            eprintln!();
            eprintln!("{}", "How to fix:".yellow().bold());
            for (i, fix) in self.how_to_fix.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, fix);
            }
        }

        if let Some(cmd) = &self.suggested_command {
            eprintln!();
            eprintln!("{}", "Try this:".green().bold());
            eprintln!("  $ {}", cmd.cyan());
        }
        eprintln!();
    }
}

impl std::fmt::Display for UxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.what)
    }
}

impl std::error::Error for UxError {}

/// Explains a configuration loading failure. `command` is the subcommand
/// that was run and `flag` the option that selects the offending file.
pub fn config_error(error: &ConfigFileError, path: &Path, command: &str, flag: &str) -> UxError {
    let path = path.display();

    match error {
        ConfigFileError::FileNotFound(_) => {
            UxError::new(format!("Configuration file not found: {}", path))
                .why("Endpoints and credentials are read from one file per platform")
                .fix(format!("Create {} with an entry for your cluster", path))
                .fix(format!("Or point {} at an existing file", flag))
                .suggest(format!(
                    "ctxprov {} {} /etc/ctxprov/platform.yml ...",
                    command, flag
                ))
        }
        ConfigFileError::NoExtension | ConfigFileError::UnsupportedFormat(_) => {
            UxError::new(format!("Cannot detect the format of {}", path))
                .why(error.to_string())
                .fix("Use a .yml, .yaml or .toml file")
        }
        ConfigFileError::TomlParse(_) | ConfigFileError::YamlParse(_) => {
            UxError::new(format!("Configuration file {} is not readable", path))
                .why(error.to_string())
                .fix("Fix the syntax error reported above")
        }
        ConfigFileError::UnknownCluster {
            cluster, available, ..
        } => {
            let why = if available.is_empty() {
                "The file contains no cluster entries".to_string()
            } else {
                format!("Known clusters: {}", available.join(", "))
            };
            UxError::new(format!("Cluster '{}' is not configured in {}", cluster, path))
                .why(why)
                .fix("Check the --cluster value")
                .fix(format!("Or add a '{}' entry to {}", cluster, path))
        }
        ConfigFileError::InvalidEntry { cluster, .. }
        | ConfigFileError::Validation { cluster, .. } => {
            UxError::new(format!("Invalid settings for cluster '{}' in {}", cluster, path))
                .why(error.to_string())
                .fix("Every entry needs url, user and password")
                .fix("url must be an http(s) URL or a list of them")
        }
    }
}
