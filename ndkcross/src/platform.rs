use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use log::debug;

const TOOLS: [&str; 4] = ["ar", "ld", "ranlib", "strip"];

const COMPILERS: [(&str, &str); 3] = [
    ("cc", "clang"),
    ("cpp", "clang"),
    ("cxx", "clang++")
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMachine {
    pub endian: &'static str,
    pub cpu: String,
    pub cpu_family: String,
    pub system: String
}

impl HostMachine {
    // ar is named <cpu>-<os>-<system>-ar, e.g. arm-linux-androideabi-ar
    pub fn from_archiver(ar: &Path, max_platform: &str) -> Result<Self> {
        let name = ar.file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("bad archiver path: {}", ar.display()))?;

        let parts: Vec<_> = name.split('-').collect();
        let &[cpu, _, system, _] = parts.as_slice() else {
            bail!("unexpected archiver name `{name}`, expected <cpu>-<os>-<system>-<tool>");
        };

        let (cpu, cpu_family) = match cpu {
            "arm" => ("armv7a", "arm"),
            cpu => (cpu, cpu)
        };

        Ok(Self {
            endian: "little",
            cpu: cpu.to_owned(),
            cpu_family: cpu_family.to_owned(),
            system: format!("{system}{max_platform}")
        })
    }

    pub fn compiler_prefix(&self) -> String {
        format!("{}-linux-{}", self.cpu, self.system)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    pub vendor: &'static str,
    pub sys_root: PathBuf,
    pub target_dir: String
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub binaries: Vec<(&'static str, PathBuf)>,
    pub host_machine: HostMachine,
    pub properties: Properties
}

pub type Section = (&'static str, Vec<(&'static str, String)>);

fn ndk_which(helper: &Path, abi: &str, tool: &str) -> Result<PathBuf> {
    let mut cmd = Command::new(helper);
    cmd.args(["--abi", abi, tool]);
    debug!("exec: {cmd:?}");

    let output = cmd.output()
        .with_context(|| format!("failed to run {}", helper.display()))?;

    if !output.status.success() {
        bail!("{} failed to resolve `{tool}` for {abi}: {}", helper.display(), output.status);
    }

    let path = String::from_utf8(output.stdout)
        .with_context(|| format!("{} printed non-UTF-8 for `{tool}` ({abi})", helper.display()))?;
    let path = path.trim();

    if path.is_empty() {
        bail!("{} found no `{tool}` for {abi}", helper.display());
    }

    Ok(PathBuf::from(path))
}

impl Platform {
    pub fn build(abi: &str, helper: &Path, sysroot: &Path, max_platform: &str) -> Result<Self> {
        let mut binaries = Vec::with_capacity(TOOLS.len() + COMPILERS.len());
        for tool in TOOLS {
            binaries.push((tool, ndk_which(helper, abi, tool)?));
        }

        let (_, ar) = binaries.first().context("no archiver resolved")?;
        let host_machine = HostMachine::from_archiver(ar, max_platform)?;
        let tool_dir = ar.parent().map(Path::to_path_buf).unwrap_or_default();

        let prefix = host_machine.compiler_prefix();
        for (name, suffix) in COMPILERS {
            let path = tool_dir.join(format!("{prefix}-{suffix}"));
            if !path.is_file() {
                bail!("Tool not found: `{name}` for {abi} at {}", path.display());
            }
            binaries.push((name, path));
        }

        Ok(Self {
            binaries,
            host_machine,
            properties: Properties {
                vendor: "linux",
                sys_root: sysroot.to_path_buf(),
                target_dir: abi.to_owned()
            }
        })
    }

    pub fn sections(&self) -> Vec<Section> {
        let binaries: Vec<_> = self.binaries.iter()
            .map(|(name, path)| (*name, path.display().to_string()))
            .collect();

        let host = &self.host_machine;
        let host_machine = vec![
            ("endian", host.endian.to_owned()),
            ("cpu", host.cpu.clone()),
            ("cpu_family", host.cpu_family.clone()),
            ("system", host.system.clone())
        ];

        let props = &self.properties;
        let properties = vec![
            ("vendor", props.vendor.to_owned()),
            ("sys_root", props.sys_root.display().to_string()),
            ("target_dir", props.target_dir.clone())
        ];

        vec![
            ("binaries", binaries),
            ("host_machine", host_machine),
            ("properties", properties)
        ]
    }
}
