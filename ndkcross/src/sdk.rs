use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;

use crate::ndk::{self, Metadata, Ndk};
use crate::platform::Platform;

pub const SDK_ROOT_VARS: [&str; 2] = ["ANDROID_SDK_ROOT", "ANDROID_HOME"];

pub fn resolve_root(lookup: impl Fn(&str) -> Option<OsString>) -> Result<PathBuf> {
    let (var, root) = SDK_ROOT_VARS.iter()
        .find_map(|var| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .map(|value| (*var, PathBuf::from(value)))
        })
        .context(
            "Need to set ANDROID_SDK_ROOT environment variable; see \
             https://developer.android.com/studio/command-line/variables for details."
        )?;

    if !root.is_dir() {
        bail!("{var} does not indicate a directory: {}", root.display());
    }

    Ok(root)
}

#[derive(Debug)]
pub struct Sdk {
    #[allow(dead_code)]
    pub root: PathBuf,
    #[allow(dead_code)]
    pub tools: PathBuf,
    pub ndk: Ndk,
    #[allow(dead_code)]
    pub meta: Metadata,
    pub sysroot: PathBuf,
    pub platforms: Vec<(String, Platform)>
}

impl Sdk {
    pub fn from_env() -> Result<Self> {
        Self::detect(resolve_root(|var| env::var_os(var))?)
    }

    pub fn detect(root: PathBuf) -> Result<Self> {
        let tools = root.join("tools").join("bin");
        if !tools.is_dir() {
            bail!("No tools/bin directory in the SDK root {}", root.display());
        }
        info!("SDK root: {}", root.display());
        info!("SDK tools: {}", tools.display());

        let ndk = ndk::locate(&root)?;
        info!("NDK root: {}", ndk.root.display());

        let meta = Metadata::load(&ndk.root)?;
        let sysroot = ndk::find_sysroot(&ndk.root)?;
        let max_platform = meta.max_platform()?;

        let platforms = meta.abis()?
            .into_iter()
            .map(|abi| {
                let platform = Platform::build(&abi, &ndk.ndk_which, &sysroot, &max_platform)?;
                Ok((abi, platform))
            })
            .collect::<Result<Vec<_>>>()?;

        if platforms.is_empty() {
            bail!("No platforms detected in {}", ndk.root.display());
        }

        let sdk = Self { root, tools, ndk, meta, sysroot, platforms };
        info!("Have configuration for platforms: {}", sdk.abis().collect::<Vec<_>>().join(", "));

        Ok(sdk)
    }

    pub fn abis(&self) -> impl Iterator<Item = &str> {
        self.platforms.iter().map(|(abi, _)| abi.as_str())
    }

    pub fn platform(&self, abi: &str) -> Result<&Platform> {
        match self.platforms.iter().find(|(name, _)| name == abi) {
            Some((_, platform)) => Ok(platform),
            None => bail!(
                "unknown ABI `{abi}`, available: {}",
                self.abis().collect::<Vec<_>>().join(", ")
            )
        }
    }
}
