use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::{glob, Pattern};
use log::{debug, warn};
use semver::{Prerelease, Version};
use serde_json::Value;

pub const NDK_WHICH: &str = "ndk-which";

#[derive(Debug)]
pub struct Ndk {
    pub root: PathBuf,
    pub ndk_which: PathBuf
}

// Metacharacters in `base` itself must not take effect.
fn pattern(base: &Path, rest: &str) -> Result<String> {
    let base = base.to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", base.display()))?;

    Ok(format!("{}/{rest}", Pattern::escape(base)))
}

// Build metadata does not take part in ordering.
fn precedence(version: &Version) -> (u64, u64, u64, &Prerelease) {
    (version.major, version.minor, version.patch, &version.pre)
}

fn find_ndk_which(root: &Path) -> Option<PathBuf> {
    let cmd = root.join(NDK_WHICH);
    cmd.is_file().then_some(cmd)
}

pub fn locate(sdk_root: &Path) -> Result<Ndk> {
    let mut latest: Option<(Version, Ndk)> = None;

    for entry in glob(&pattern(sdk_root, "ndk/*")?)? {
        let entry = entry?;
        if !entry.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        let version = match Version::parse(name) {
            Ok(version) => version,
            Err(err) => {
                warn!("skipping {}: {err}", entry.display());
                continue;
            }
        };

        if latest.as_ref().is_some_and(|(newest, _)| precedence(newest) >= precedence(&version)) {
            continue;
        }

        match find_ndk_which(&entry) {
            Some(ndk_which) => latest = Some((version, Ndk { root: entry, ndk_which })),
            None => debug!("no {NDK_WHICH} in {}, ignoring", entry.display())
        }
    }

    if let Some((version, ndk)) = latest {
        debug!("selected NDK {version}");
        return Ok(ndk);
    }

    let bundle = sdk_root.join("ndk-bundle");
    if bundle.is_dir() {
        if let Some(ndk_which) = find_ndk_which(&bundle) {
            return Ok(Ndk { root: bundle, ndk_which });
        }
    }

    bail!("No NDK detected under {}", sdk_root.display());
}

#[derive(Debug)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    pub fn load(ndk_root: &Path) -> Result<Self> {
        let mut meta = BTreeMap::new();

        for entry in glob(&pattern(ndk_root, "meta/*.json")?)? {
            let entry = entry?;
            let key = entry.file_stem()
                .and_then(|stem| stem.to_str())
                .with_context(|| format!("bad metadata file name: {}", entry.display()))?
                .to_owned();

            let text = fs::read_to_string(&entry)
                .with_context(|| format!("failed to read {}", entry.display()))?;
            let value = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {}", entry.display()))?;

            meta.insert(key, value);
        }

        Ok(Self(meta))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn abis(&self) -> Result<Vec<String>> {
        let abis = self.get("abis")
            .context("NDK metadata has no `abis` entry")?
            .as_object()
            .context("NDK metadata `abis` is not an object")?;

        Ok(abis.keys().cloned().collect())
    }

    pub fn max_platform(&self) -> Result<String> {
        let max = self.get("platforms")
            .and_then(|platforms| platforms.get("max"))
            .context("NDK metadata has no `platforms.max` entry")?;

        match max {
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(s.clone()),
            other => bail!("NDK metadata `platforms.max` is not a version: {other}")
        }
    }
}

pub fn find_sysroot(ndk_root: &Path) -> Result<PathBuf> {
    for entry in glob(&pattern(ndk_root, "toolchains/**/sysroot")?)? {
        let entry = entry?;
        if entry.is_dir() {
            return Ok(entry);
        }
    }

    bail!("No sysroot detected under {}", ndk_root.join("toolchains").display());
}
