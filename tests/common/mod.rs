//! Shared test scaffolding: a throwaway project plus stub build tools.
//!
//! The stubs stand in for the interpreter, pip, and the packaging tool so
//! end-to-end runs exercise the real pipeline control flow without touching
//! a Python installation. Every stub appends to a call log so tests can
//! assert which steps ran.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const MANIFEST: &str = r#"
[package]
name = "PDFWatcher"
entry_script = "pdfwatcherapp1.py"

[python]
version = "3.11"

[install]
requirements = "requirements.txt"
tools = ["pyinstaller"]

[bundle]
mode = "onedir"
launcher = "windowed"
hidden_imports = [
    "jaraco.text",
    "jaraco.context",
    "jaraco.functools",
    "autocommand",
]

[artifact]
name = "windows-dist"

[trigger]
tags = ["v*"]
"#;

/// A temporary project directory with manifest, sources, stubs, and store.
pub struct TestProject {
    root: TempDir,
}

impl TestProject {
    /// Creates a fully populated project with working stub tools.
    pub fn new() -> Self {
        let project = Self {
            root: TempDir::new().expect("create test project"),
        };

        std::fs::write(project.path().join("dist.toml"), MANIFEST).unwrap();
        std::fs::write(
            project.path().join("pdfwatcherapp1.py"),
            "print('watching')\n",
        )
        .unwrap();
        std::fs::write(
            project.path().join("requirements.txt"),
            "PyMuPDF\nPySimpleGUI\nwatchdog\nopenpyxl\n",
        )
        .unwrap();

        std::fs::create_dir_all(project.stubs_dir()).unwrap();
        std::fs::create_dir_all(project.store_dir()).unwrap();
        project.write_stubs();
        project
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join("dist.toml")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.path().join("store")
    }

    pub fn stubs_dir(&self) -> PathBuf {
        self.path().join("stubs")
    }

    pub fn python_stub(&self) -> PathBuf {
        self.stubs_dir().join("python3.11")
    }

    fn calls_log(&self) -> PathBuf {
        self.stubs_dir().join("calls.log")
    }

    /// Tool invocations recorded by the stubs, in order.
    pub fn calls(&self) -> Vec<String> {
        match std::fs::read_to_string(self.calls_log()) {
            Ok(log) => log.lines().map(String::from).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Makes every subsequent pip invocation fail, as if a requirement
    /// were unresolvable.
    pub fn break_pip(&self) {
        std::fs::write(self.stubs_dir().join("pip.fail"), "").unwrap();
    }

    /// Replaces the interpreter stub with one that hangs, so the
    /// provisioning step can only end by timeout.
    #[cfg(unix)]
    pub fn stall_python(&self) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.python_stub();
        std::fs::write(&path, "#!/bin/sh\nsleep 60\nexit 1\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Removes the entry script so packaging must fail.
    pub fn remove_entry_script(&self) {
        std::fs::remove_file(self.path().join("pdfwatcherapp1.py")).unwrap();
    }

    /// Published artifact run directories for the configured artifact name.
    pub fn published_runs(&self) -> Vec<PathBuf> {
        let artifact_root = self.store_dir().join("windows-dist");
        match std::fs::read_dir(&artifact_root) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// A `run` command wired to this project's manifest, store, and stubs.
    pub fn run_cmd(&self) -> Command {
        let mut cmd = self.base_cmd();
        cmd.arg("run")
            .arg("--store")
            .arg(self.store_dir())
            .arg("--python")
            .arg(self.python_stub());
        cmd
    }

    /// A bare command with only the manifest wired up.
    pub fn base_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pdfwatcher-dist").expect("binary builds");
        cmd.arg("--manifest").arg(self.manifest_path());
        cmd
    }

    #[cfg(unix)]
    fn write_stubs(&self) {
        use std::os::unix::fs::PermissionsExt;

        let stubs = self.stubs_dir();
        let calls = self.calls_log();

        // Interpreter stub: answers --version and fakes venv creation by
        // copying the pip/pyinstaller stubs into the venv layout.
        let python = format!(
            r#"#!/bin/sh
echo "python $*" >> "{calls}"
if [ "$1" = "--version" ]; then
    echo "Python 3.11.9"
    exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
    mkdir -p "$3/bin"
    cp "{stubs}/pip" "$3/bin/pip"
    cp "{stubs}/pyinstaller" "$3/bin/pyinstaller"
    chmod +x "$3/bin/pip" "$3/bin/pyinstaller"
    exit 0
fi
echo "unexpected python invocation: $*" >&2
exit 1
"#,
            calls = calls.display(),
            stubs = stubs.display(),
        );

        // Installer stub: succeeds unless the pip.fail marker exists.
        let pip = format!(
            r#"#!/bin/sh
echo "pip $*" >> "{calls}"
if [ -f "{stubs}/pip.fail" ]; then
    echo "ERROR: No matching distribution found" >&2
    exit 1
fi
exit 0
"#,
            calls = calls.display(),
            stubs = stubs.display(),
        );

        // Packager stub: emits a minimal single-directory bundle.
        let pyinstaller = format!(
            r#"#!/bin/sh
echo "pyinstaller $*" >> "{calls}"
name=""
dist=""
while [ $# -gt 0 ]; do
    case "$1" in
        --name) name="$2"; shift 2 ;;
        --distpath) dist="$2"; shift 2 ;;
        *) shift ;;
    esac
done
mkdir -p "$dist/$name/_internal"
printf 'launcher' > "$dist/$name/$name"
printf 'runtime' > "$dist/$name/_internal/base_library.zip"
chmod +x "$dist/$name/$name"
exit 0
"#,
            calls = calls.display(),
        );

        for (name, body) in [
            ("python3.11", python),
            ("pip", pip),
            ("pyinstaller", pyinstaller),
        ] {
            let path = stubs.join(name);
            std::fs::write(&path, body).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[cfg(not(unix))]
    fn write_stubs(&self) {
        // End-to-end stub runs are exercised on unix only.
    }
}
