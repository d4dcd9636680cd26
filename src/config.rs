use std::path::Path;

use anyhow::anyhow;
use config::{Config, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// Offer whole `[label](target)` constructs when `[` is typed
    pub full_suggest_mode: bool,
    /// Offer headers of other Markdown files as link targets
    pub heading_completions: bool,
    /// A file is suggested only if no glob in this list matches it
    pub exclude_globs: Vec<String>,
}

impl Settings {
    pub fn new(root_dir: &Path) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/linkmark/settings");
        let settings = Config::builder()
            .add_source(File::with_name(&expanded).required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/.linkmark",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            )
            .set_default("full_suggest_mode", false)?
            .set_default("heading_completions", true)?
            .set_default("exclude_globs", default_exclude_globs())?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }
}

fn default_exclude_globs() -> Vec<String> {
    vec!["**/.git/**".to_string(), "**/node_modules/**".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            full_suggest_mode: false,
            heading_completions: true,
            exclude_globs: default_exclude_globs(),
        }
    }
}
