//! Integration tests for CLI commands
//!
//! Helm and kustomize are replaced by small shell scripts so the full
//! init/update/watch flow runs without either tool installed.
#![cfg(unix)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const FAKE_HELM: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/helm.log"
if [ "$1" = "template" ]; then
  if [ -n "$FAKE_HELM_FAIL" ]; then
    echo "template: parse error" >&2
    exit 1
  fi
  mkdir -p "$4/demo-chart/templates"
  for template in "$2"/templates/*.yaml; do
    name=$(basename "$template" .yaml)
    printf 'apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: %s-%s\n' "$6" "$name" > "$4/demo-chart/templates/$name.yaml"
  done
fi
"#;

const FAKE_KUSTOMIZE: &str = r##"#!/bin/sh
echo "# overlay: $2"
cat "$2"/../../base/demo-chart/templates/*.yaml 2>/dev/null || true
"##;

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures")
}

struct Sandbox {
    _root: TempDir,
    workspace: PathBuf,
    tools: PathBuf,
    home: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let workspace = root.path().join("workspace");
        let tools = root.path().join("tools");
        let home = root.path().join("home");
        for dir in [&workspace, &tools, &home] {
            std::fs::create_dir_all(dir).unwrap();
        }
        write_script(&tools.join("helm"), FAKE_HELM);
        write_script(&tools.join("kustomize"), FAKE_KUSTOMIZE);

        Self {
            _root: root,
            workspace,
            tools,
            home,
        }
    }

    /// Copy of the demo chart that tests may modify
    fn chart_copy(&self) -> PathBuf {
        let dest = self.home.join("demo-chart");
        copy_tree(&Path::new(fixtures_path()).join("demo-chart"), &dest);
        dest
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rigger"));
        cmd.args(args)
            .arg("--workspace")
            .arg(&self.workspace)
            .arg("--helm-binary")
            .arg(self.tools.join("helm"))
            .arg("--kustomize-binary")
            .arg(self.tools.join("kustomize"))
            .env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env_remove("RIGGER_CONFIG")
            .env_remove("RIGGER_CHART")
            .env_remove("RIGGER_RAW")
            .env_remove("RIGGER_WATCH_INTERVAL")
            .env_remove("FAKE_HELM_FAIL");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .expect("Failed to execute rigger")
    }

    fn run_with_input(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute rigger");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        child.wait_with_output().unwrap()
    }

    fn init(&self, chart: &Path) -> Output {
        self.run(&["init", "--chart", chart.to_str().unwrap()])
    }

    fn helm_log(&self) -> Vec<String> {
        std::fs::read_to_string(self.tools.join("helm.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn state(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.workspace.join(".rigger/state.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

fn write_script(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn copy_tree(src: &Path, dest: &Path) {
    std::fs::create_dir_all(dest).unwrap();
    for entry in std::fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dest.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            std::fs::copy(entry.path(), target).unwrap();
        }
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod help_command {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        let output = Command::new(env!("CARGO_BIN_EXE_rigger"))
            .arg("--help")
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = stdout(&output);
        for command in ["init", "update", "watch"] {
            assert!(stdout.contains(command), "missing {command} in help");
        }
    }

    #[test]
    fn test_chart_and_raw_conflict() {
        let sandbox = Sandbox::new();
        let output = sandbox.run(&["init", "--chart", "x", "--raw", "y"]);
        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_init_requires_a_source() {
        let sandbox = Sandbox::new();
        let output = sandbox.run(&["init"]);
        assert_eq!(output.status.code(), Some(64));
    }
}

mod init_command {
    use super::*;

    #[test]
    fn test_init_renders_and_overlays() {
        let sandbox = Sandbox::new();
        let chart = sandbox.chart_copy();

        let output = sandbox.init(&chart);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let state = sandbox.state();
        assert_eq!(
            state["v1"]["chartURL"],
            chart.canonicalize().unwrap().to_str().unwrap()
        );
        assert_eq!(
            state["v1"]["contentSHA"].as_str().map(str::len),
            Some(64)
        );

        let ws = &sandbox.workspace;
        assert!(ws.join(".rigger/tmp/chart/Chart.yaml").exists());
        assert_eq!(
            std::fs::read_to_string(ws.join(".rigger/tmp/values/values.yaml")).unwrap(),
            std::fs::read_to_string(chart.join("values.yaml")).unwrap()
        );

        let base = std::fs::read_to_string(ws.join("base/kustomization.yaml")).unwrap();
        assert!(base.contains("demo-chart/templates/configmap.yaml"));
        let overlay =
            std::fs::read_to_string(ws.join("overlays/rigger/kustomization.yaml")).unwrap();
        assert!(overlay.contains("../../base"));

        let rendered = std::fs::read_to_string(ws.join("rendered.yaml")).unwrap();
        assert!(rendered.contains("name: demo-chart-configmap"));

        let stdout = stdout(&output);
        assert!(stdout.contains("Chart: demo-chart 0.3.1"));
        assert!(stdout.contains("kubectl apply -f"));

        let log = sandbox.helm_log();
        assert_eq!(log.len(), 3, "helm calls: {log:?}");
        assert_eq!(log[0], "init --client-only");
        assert!(log[1].starts_with("dependency update "));
        assert!(log[2].starts_with("template "));
        assert!(log[2].contains("--name demo-chart"));
    }

    #[test]
    fn test_reinit_declined_keeps_state() {
        let sandbox = Sandbox::new();
        let chart = sandbox.chart_copy();
        assert!(sandbox.init(&chart).status.success());
        let before = sandbox.state();

        let output =
            sandbox.run_with_input(&["init", "--chart", chart.to_str().unwrap()], "n\n");

        assert_eq!(output.status.code(), Some(10));
        assert!(stdout(&output).contains("do you want to start from scratch?"));
        assert!(stderr(&output).contains("rigger update"));
        assert_eq!(sandbox.state(), before);
    }

    #[test]
    fn test_reinit_confirmed_starts_over() {
        let sandbox = Sandbox::new();
        let chart = sandbox.chart_copy();
        assert!(sandbox.init(&chart).status.success());

        let output =
            sandbox.run_with_input(&["init", "--chart", chart.to_str().unwrap()], "Y\n");

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(sandbox.helm_log().len(), 6);
    }

    #[test]
    fn test_missing_chart_is_resolution_error() {
        let sandbox = Sandbox::new();
        let missing = sandbox.home.join("no-such-chart");

        let output = sandbox.init(&missing);

        assert_eq!(output.status.code(), Some(12));
        assert!(!sandbox.workspace.join(".rigger/state.json").exists());
        assert!(sandbox.helm_log().is_empty());
    }

    #[test]
    fn test_failing_template_is_render_error() {
        let sandbox = Sandbox::new();
        let chart = sandbox.chart_copy();

        let output = sandbox
            .command(&["init", "--chart", chart.to_str().unwrap()])
            .env("FAKE_HELM_FAIL", "1")
            .stdin(Stdio::null())
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(3));
        assert!(stderr(&output).contains("parse error"));
        assert!(!sandbox.workspace.join("rendered.yaml").exists());
    }

    #[test]
    fn test_init_raw_overlays_without_state() {
        let sandbox = Sandbox::new();
        let raw = sandbox.workspace.join("base");
        copy_tree(&Path::new(fixtures_path()).join("demo-chart/templates"), &raw);

        let output = sandbox.run(&["init", "--raw", raw.to_str().unwrap()]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(!sandbox.workspace.join(".rigger/state.json").exists());
        assert!(raw.join("kustomization.yaml").exists());
        assert!(sandbox.workspace.join("rendered.yaml").exists());
        assert!(sandbox.helm_log().is_empty());
    }
}

mod update_command {
    use super::*;

    #[test]
    fn test_update_without_state() {
        let sandbox = Sandbox::new();

        let output = sandbox.run(&["update"]);

        assert_eq!(output.status.code(), Some(11));
        assert!(stderr(&output).contains("rigger init"));
    }

    #[test]
    fn test_update_records_new_sha() {
        let sandbox = Sandbox::new();
        let chart = sandbox.chart_copy();
        assert!(sandbox.init(&chart).status.success());
        let first = sandbox.state()["v1"]["contentSHA"].clone();

        std::fs::write(chart.join("values.yaml"), "greeting: bonjour\n").unwrap();
        let output = sandbox.run(&["update"]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let second = sandbox.state()["v1"]["contentSHA"].clone();
        assert_ne!(first, second);
        assert_eq!(sandbox.helm_log().len(), 6);
    }

    #[test]
    fn test_relative_chart_survives_cwd_change() {
        let sandbox = Sandbox::new();
        sandbox.chart_copy();

        let output = sandbox
            .command(&["init", "--chart", "demo-chart"])
            .current_dir(&sandbox.home)
            .stdin(Stdio::null())
            .output()
            .unwrap();
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let output = sandbox
            .command(&["update"])
            .current_dir(&sandbox.workspace)
            .stdin(Stdio::null())
            .output()
            .unwrap();
        assert!(output.status.success(), "stderr: {}", stderr(&output));
    }

    #[test]
    fn test_update_follows_upstream_templates() {
        let sandbox = Sandbox::new();
        let chart = sandbox.chart_copy();
        assert!(sandbox.init(&chart).status.success());

        std::fs::remove_file(chart.join("templates/configmap.yaml")).unwrap();
        std::fs::write(
            chart.join("templates/secret.yaml"),
            "apiVersion: v1\nkind: Secret\n",
        )
        .unwrap();
        let output = sandbox.run(&["update"]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let templates = sandbox.workspace.join("base/demo-chart/templates");
        assert!(templates.join("secret.yaml").exists());
        assert!(!templates.join("configmap.yaml").exists());

        let base =
            std::fs::read_to_string(sandbox.workspace.join("base/kustomization.yaml")).unwrap();
        assert!(base.contains("demo-chart/templates/secret.yaml"));
        assert!(!base.contains("configmap.yaml"));

        let rendered = std::fs::read_to_string(sandbox.workspace.join("rendered.yaml")).unwrap();
        assert!(rendered.contains("name: demo-chart-secret"));
        assert!(!rendered.contains("demo-chart-configmap"));
    }
}

mod watch_command {
    use super::*;

    #[test]
    fn test_watch_without_state() {
        let sandbox = Sandbox::new();
        let output = sandbox.run(&["watch", "--interval", "1s"]);
        assert_eq!(output.status.code(), Some(11));
    }

    #[test]
    fn test_watch_returns_on_change() {
        let sandbox = Sandbox::new();
        let chart = sandbox.chart_copy();
        assert!(sandbox.init(&chart).status.success());
        let before = sandbox.state();

        std::fs::write(chart.join("README.md"), "# demo-chart\n\nNew release.\n").unwrap();
        let output = sandbox.run(&["watch", "--interval", "1s"]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("Upstream chart changed"));
        assert_eq!(sandbox.state(), before);
    }

    #[test]
    fn test_watch_rejects_zero_interval() {
        let sandbox = Sandbox::new();
        let output = sandbox.run(&["watch", "--interval", "0s"]);
        assert_eq!(output.status.code(), Some(64));
    }
}
