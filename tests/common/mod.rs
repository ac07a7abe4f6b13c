#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mrpn_harness::terraform::{ToolError, ToolExecutor, ToolOutput};

/// Minimal `output -json` for a module run named `n` in project `p`.
pub const OUTPUT_JSON: &str = r#"{
    "id": {"sensitive": false, "type": "string", "value": "projects/p/global/networks/n"},
    "self_link": {"sensitive": false, "type": "string", "value": "https://www.googleapis.com/compute/v1/projects/p/global/networks/n"}
}"#;

/// Stand-in for the provisioning binary: records every invocation and
/// answers each phase with a canned result (success by default).
pub struct ScriptedExecutor {
    responses: HashMap<&'static str, ToolOutput>,
    calls: Mutex<Vec<Vec<String>>>,
    var_files: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            var_files: Mutex::new(Vec::new()),
        }
        .respond("output", ToolOutput::with_code(0).with_stdout(OUTPUT_JSON))
    }

    pub fn respond(mut self, phase: &'static str, output: ToolOutput) -> Self {
        self.responses.insert(phase, output);
        self
    }

    pub fn with_outputs(self, stdout: impl Into<Vec<u8>>) -> Self {
        self.respond("output", ToolOutput::with_code(0).with_stdout(stdout))
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn phases(&self) -> Vec<&'static str> {
        self.calls().iter().map(|args| phase_of(args)).collect()
    }

    /// Contents of every var file seen, read while the run was in progress.
    pub fn var_files(&self) -> Vec<String> {
        self.var_files.lock().unwrap().clone()
    }

    pub fn call(&self, phase: &str) -> Option<Vec<String>> {
        self.calls().into_iter().find(|args| phase_of(args) == phase)
    }
}

/// Classifies an invocation, ignoring the leading `-chdir=` argument.
pub fn phase_of(args: &[String]) -> &'static str {
    let args: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();
    match args.as_slice() {
        ["workspace", "select", "-or-create", ..] => "select",
        ["workspace", "select", "default"] => "reset",
        ["init", ..] => "init",
        ["plan", rest @ ..] if rest.contains(&"-detailed-exitcode") => "drift",
        ["plan", ..] => "plan",
        ["apply", ..] => "apply",
        ["output", ..] => "output",
        ["destroy", ..] => "destroy",
        _ => "unknown",
    }
}

pub fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter().find_map(|arg| arg.strip_prefix(flag))
}

#[async_trait]
impl ToolExecutor for ScriptedExecutor {
    fn program(&self) -> &str {
        "tofu"
    }

    async fn execute(&self, args: &[String]) -> Result<ToolOutput, ToolError> {
        self.calls.lock().unwrap().push(args.to_vec());
        if let Some(path) = arg_value(args, "-var-file=") {
            let contents = std::fs::read_to_string(path).unwrap_or_default();
            self.var_files.lock().unwrap().push(contents);
        }

        Ok(self
            .responses
            .get(phase_of(args))
            .cloned()
            .unwrap_or_else(|| ToolOutput::with_code(0)))
    }
}
