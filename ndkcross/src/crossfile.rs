use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::platform::Platform;
use crate::sdk::Sdk;

pub fn file_name(abi: &str) -> String {
    format!("android-{abi}.txt")
}

pub fn render(platform: &Platform) -> String {
    let mut out = String::new();

    for (section, entries) in platform.sections() {
        out.push_str(&format!("[{section}]\n"));
        for (key, value) in entries {
            out.push_str(&format!("{key} = '{value}'\n"));
        }
        out.push('\n');
    }

    out
}

pub fn write_all(sdk: &Sdk, targets: &[String], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let targets: Vec<&str> = if targets.is_empty() {
        sdk.abis().collect()
    } else {
        targets.iter().map(String::as_str).collect()
    };

    let mut written = Vec::with_capacity(targets.len());
    for abi in targets {
        let platform = sdk.platform(abi)?;
        let path = out_dir.join(file_name(abi));

        fs::write(&path, render(platform))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Cross-file written: {}", path.display());

        written.push(path);
    }

    Ok(written)
}
