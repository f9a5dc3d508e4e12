use std::fs;
use std::path::{Path, PathBuf};

pub fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

#[cfg(unix)]
pub use fake::FakeSdk;

#[cfg(unix)]
mod fake {
    use std::os::unix::fs::PermissionsExt;
    use std::sync::{Mutex, MutexGuard};

    use tempfile::{tempdir, TempDir};

    use super::*;

    const NDK_VERSION: &str = "25.1.8937393";
    const MAX_PLATFORM: u32 = 33;

    // Writing a script while another test forks can leave the script open
    // in the child and make exec fail with ETXTBSY.
    static EXEC_LOCK: Mutex<()> = Mutex::new(());

    pub struct FakeSdk {
        dir: TempDir,
        _lock: MutexGuard<'static, ()>
    }

    fn triple(abi: &str) -> (&'static str, &'static str) {
        match abi {
            "armeabi-v7a" => ("arm-linux-androideabi", "armv7a-linux-androideabi"),
            "arm64-v8a" => ("aarch64-linux-android", "aarch64-linux-android"),
            "x86" => ("i686-linux-android", "i686-linux-android"),
            "x86_64" => ("x86_64-linux-android", "x86_64-linux-android"),
            other => panic!("no fixture triple for {other}")
        }
    }

    impl FakeSdk {
        pub fn new(abis: &[&str]) -> Self {
            let lock = EXEC_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let sdk = Self { dir: tempdir().unwrap(), _lock: lock };

            fs::create_dir_all(sdk.root().join("tools/bin")).unwrap();
            fs::create_dir_all(sdk.sysroot()).unwrap();
            fs::create_dir_all(sdk.bin()).unwrap();

            let meta = sdk.ndk_root().join("meta");
            fs::create_dir_all(&meta).unwrap();
            let entries: Vec<_> = abis.iter()
                .map(|abi| format!(r#""{abi}": {{"llvm_triple": "{}"}}"#, triple(abi).0))
                .collect();
            fs::write(meta.join("abis.json"), format!("{{{}}}", entries.join(", "))).unwrap();
            fs::write(
                meta.join("platforms.json"),
                format!(r#"{{"min": 19, "max": {MAX_PLATFORM}}}"#)
            ).unwrap();

            let mut cases = String::new();
            for abi in abis {
                let (tools, clang) = triple(abi);
                cases.push_str(&format!("  {abi}) prefix={tools} ;;\n"));
                for tool in ["ar", "ld", "ranlib", "strip"] {
                    touch(&sdk.bin().join(format!("{tools}-{tool}")));
                }
                for suffix in ["clang", "clang++"] {
                    touch(&sdk.bin().join(format!("{clang}{MAX_PLATFORM}-{suffix}")));
                }
            }

            let script = format!(
                "#!/bin/sh\n\
                 [ \"$1\" = \"--abi\" ] || exit 2\n\
                 case \"$2\" in\n{cases}  *) exit 1 ;;\nesac\n\
                 echo \"{}/$prefix-$3\"\n",
                sdk.bin().display()
            );
            fs::write(sdk.ndk_which(), script).unwrap();
            fs::set_permissions(sdk.ndk_which(), fs::Permissions::from_mode(0o755)).unwrap();

            sdk
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn ndk_root(&self) -> PathBuf {
            self.root().join("ndk").join(NDK_VERSION)
        }

        pub fn ndk_which(&self) -> PathBuf {
            self.ndk_root().join(crate::ndk::NDK_WHICH)
        }

        pub fn sysroot(&self) -> PathBuf {
            self.ndk_root().join("toolchains/llvm/prebuilt/linux-x86_64/sysroot")
        }

        pub fn bin(&self) -> PathBuf {
            self.ndk_root().join("toolchains/llvm/prebuilt/linux-x86_64/bin")
        }
    }
}
