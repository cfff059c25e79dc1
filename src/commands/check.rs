use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use serde_json::json;

use droprelay::config::LoadedConfig;
use droprelay::domain::entities::FolderMapping;

/// One mapping as `check` sees it
struct MappingStatus {
    mapping: FolderMapping,
    directory: PathBuf,
    problem: Option<String>,
}

impl MappingStatus {
    fn inspect(mapping: FolderMapping, root: &Path) -> Self {
        let directory = mapping.resolve(root);
        let problem = match mapping.validate() {
            Err(e) => Some(e.to_string()),
            Ok(()) if !directory.is_dir() => Some("directory does not exist".to_string()),
            Ok(()) => None,
        };
        Self {
            mapping,
            directory,
            problem,
        }
    }

    fn watchable(&self) -> bool {
        self.problem.is_none()
    }
}

pub fn cmd_check(config: Option<&Path>, json: bool) -> Result<ExitCode> {
    let loaded = match LoadedConfig::discover(config) {
        Ok(loaded) => loaded,
        Err(e) => {
            if json {
                println!(
                    "{}",
                    json!({ "valid": false, "errors": [e.to_string()] })
                );
            } else {
                eprintln!("Error: {}", e);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let errors: Vec<String> = match loaded.config.validate() {
        Ok(()) => Vec::new(),
        Err(e) => vec![e.to_string()],
    };
    let root = loaded.monitor_root();
    let mappings: Vec<MappingStatus> = loaded
        .config
        .mappings()
        .into_iter()
        .map(|m| MappingStatus::inspect(m, &root))
        .collect();
    let watchable = mappings.iter().filter(|m| m.watchable()).count();
    let ok = errors.is_empty() && watchable > 0;

    if json {
        let report = json!({
            "config": loaded.path.display().to_string(),
            "valid": ok,
            "errors": errors,
            "warnings": loaded.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            "root": root.display().to_string(),
            "endpoint": format!(
                "{}@{}:{}",
                loaded.config.sftp.username, loaded.config.sftp.host, loaded.config.sftp.port
            ),
            "mappings": mappings.iter().map(|m| json!({
                "local": m.mapping.local_subpath(),
                "remote": m.mapping.remote_folder(),
                "directory": m.directory.display().to_string(),
                "watchable": m.watchable(),
                "problem": m.problem,
            })).collect::<Vec<_>>(),
        });
        println!("{}", report);
    } else {
        println!("Config: {}", loaded.path.display());
        println!("Root:   {}", root.display());
        for warning in &loaded.warnings {
            println!("warning: {}", warning);
        }
        for error in &errors {
            println!("error: {}", error);
        }
        for m in &mappings {
            let mark = if m.watchable() { "ok" } else { "skip" };
            print!(
                "  [{}] {} -> {}",
                mark,
                m.directory.display(),
                m.mapping.remote_folder()
            );
            match &m.problem {
                Some(problem) => println!(" ({})", problem),
                None => println!(),
            }
        }
        if ok {
            println!("Configuration OK: {} of {} folders watchable", watchable, mappings.len());
        } else if errors.is_empty() {
            println!("No watchable folder mapping");
        }
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
