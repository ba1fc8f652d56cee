//! External checks supplied as WebAssembly units.
//!
//! A unit exports `memory`, `alloc`, `dealloc`, `claudelint_describe` and
//! `claudelint_check`. Both entry points take a JSON document written into
//! guest memory and return a packed `(ptr << 32) | len` pointing at a JSON
//! reply. Every call runs in a fresh instance.

use std::path::{Path, PathBuf};

use crate::config::{ExcludeFilter, LintConfig};
use crate::error::{LintError, Result};
use crate::repository::Repository;

use super::Check;

/// Load every check a unit describes, resolving `path` against the repository root.
///
/// # Errors
/// Returns [`LintError::CustomRuleNotFound`] if the unit does not exist and
/// [`LintError::CustomRuleLoad`] if it cannot be compiled or described. Without
/// the `wasm` feature every unit is rejected with
/// [`LintError::CustomRulesUnsupported`].
pub fn load_external_checks(
    path: &Path,
    config: &LintConfig,
    repository: &Repository,
    exclude: &ExcludeFilter,
) -> Result<Vec<Box<dyn Check>>> {
    let path = resolve_unit_path(path, repository.root());
    if !path.is_file() {
        return Err(LintError::CustomRuleNotFound(path));
    }

    #[cfg(feature = "wasm")]
    {
        wasm::load(&path, config, repository, exclude)
    }

    #[cfg(not(feature = "wasm"))]
    {
        let _ = (config, exclude);
        Err(LintError::CustomRulesUnsupported(path))
    }
}

fn resolve_unit_path(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(feature = "wasm")]
mod wasm {
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use anyhow::Context;
    use serde::Deserialize;
    use wasmtime::{Engine, Memory, Module, Store, TypedFunc};

    use crate::checker::{Check, CheckError, CheckSettings, Severity, Violation};
    use crate::config::{ExcludeFilter, LintConfig};
    use crate::error::{LintError, Result};
    use crate::repository::Repository;

    const ALLOC_FN: &str = "alloc";
    const DEALLOC_FN: &str = "dealloc";
    const DESCRIBE_FN: &str = "claudelint_describe";
    const CHECK_FN: &str = "claudelint_check";

    /// One entry of the describe reply.
    #[derive(Debug, Deserialize)]
    struct Descriptor {
        rule_id: String,
        description: String,
        default_severity: String,
    }

    /// The check reply: findings, or an error the unit reports about itself.
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    enum CheckReply {
        Failed { error: String },
        Findings(Vec<Finding>),
    }

    #[derive(Debug, Deserialize)]
    struct Finding {
        message: String,
        #[serde(default)]
        file_path: Option<PathBuf>,
        #[serde(default)]
        line: Option<usize>,
    }

    /// A compiled unit, shared by the checks it provides.
    struct Unit {
        path: PathBuf,
        engine: Engine,
        module: Module,
    }

    struct Guest {
        store: Store<()>,
        memory: Memory,
        alloc: TypedFunc<i32, i32>,
        dealloc: TypedFunc<(i32, i32), ()>,
        instance: wasmtime::Instance,
    }

    impl Unit {
        fn compile(path: &Path) -> anyhow::Result<Self> {
            let engine = Engine::default();
            // Text units are accepted too; the runtime compiles WAT on load.
            let module = Module::from_file(&engine, path)
                .with_context(|| format!("failed to compile {}", path.display()))?;
            let unit = Self {
                path: path.to_path_buf(),
                engine,
                module,
            };
            // Fail at load time rather than on the first check call.
            unit.instantiate()?;
            Ok(unit)
        }

        fn instantiate(&self) -> anyhow::Result<Guest> {
            let mut store = Store::new(&self.engine, ());
            let instance = wasmtime::Instance::new(&mut store, &self.module, &[])
                .context("failed to instantiate module")?;
            let memory = instance
                .get_memory(&mut store, "memory")
                .context("module does not export 'memory'")?;
            let alloc = instance
                .get_typed_func::<i32, i32>(&mut store, ALLOC_FN)
                .with_context(|| format!("module does not export '{ALLOC_FN}'"))?;
            let dealloc = instance
                .get_typed_func::<(i32, i32), ()>(&mut store, DEALLOC_FN)
                .with_context(|| format!("module does not export '{DEALLOC_FN}'"))?;
            for export in [DESCRIBE_FN, CHECK_FN] {
                instance
                    .get_typed_func::<(i32, i32), i64>(&mut store, export)
                    .with_context(|| format!("module does not export '{export}'"))?;
            }

            Ok(Guest {
                store,
                memory,
                alloc,
                dealloc,
                instance,
            })
        }

        /// Call `export` with `input` in a fresh instance and return its reply.
        fn call_json(&self, export: &str, input: &str) -> anyhow::Result<String> {
            let mut guest = self.instantiate()?;
            let function = guest
                .instance
                .get_typed_func::<(i32, i32), i64>(&mut guest.store, export)?;

            let (in_ptr, in_len) = guest.write(input.as_bytes())?;
            let packed = function
                .call(&mut guest.store, (in_ptr, in_len))
                .with_context(|| format!("'{export}' failed"))?;
            let _ = guest.dealloc.call(&mut guest.store, (in_ptr, in_len));

            let (out_ptr, out_len) = unpack(packed)?;
            let bytes = guest.read(out_ptr, out_len)?;
            let _ = guest.dealloc.call(&mut guest.store, (out_ptr, out_len));

            String::from_utf8(bytes).context("reply is not valid UTF-8")
        }

        fn describe(&self) -> anyhow::Result<Vec<Descriptor>> {
            let reply = self.call_json(DESCRIBE_FN, "{}")?;
            serde_json::from_str(&reply).context("describe reply is not a list of checks")
        }
    }

    impl Guest {
        fn write(&mut self, bytes: &[u8]) -> anyhow::Result<(i32, i32)> {
            let len = i32::try_from(bytes.len()).context("input too large")?;
            let ptr = self
                .alloc
                .call(&mut self.store, len)
                .context("alloc failed")?;
            let offset = usize::try_from(ptr).context("alloc returned a negative pointer")?;
            self.memory
                .write(&mut self.store, offset, bytes)
                .context("input does not fit in guest memory")?;
            Ok((ptr, len))
        }

        fn read(&mut self, ptr: i32, len: i32) -> anyhow::Result<Vec<u8>> {
            let offset = usize::try_from(ptr).context("negative reply pointer")?;
            let len = usize::try_from(len).context("negative reply length")?;
            let mut buffer = vec![0_u8; len];
            self.memory
                .read(&self.store, offset, &mut buffer)
                .context("reply lies outside guest memory")?;
            Ok(buffer)
        }
    }

    fn unpack(packed: i64) -> anyhow::Result<(i32, i32)> {
        let raw = u64::try_from(packed).context("negative packed reply")?;
        let ptr = i32::try_from(raw >> 32).context("reply pointer out of range")?;
        let len = i32::try_from(raw & 0xffff_ffff).context("reply length out of range")?;
        Ok((ptr, len))
    }

    fn load_error(path: &Path, error: &anyhow::Error) -> LintError {
        LintError::CustomRuleLoad {
            path: path.to_path_buf(),
            message: format!("{error:#}"),
        }
    }

    pub(super) fn load(
        path: &Path,
        config: &LintConfig,
        repository: &Repository,
        exclude: &ExcludeFilter,
    ) -> Result<Vec<Box<dyn Check>>> {
        let unit = Unit::compile(path).map_err(|e| load_error(path, &e))?;
        let descriptors = unit.describe().map_err(|e| load_error(path, &e))?;
        let unit = Arc::new(unit);

        let mut seen = HashSet::new();
        let mut checks: Vec<Box<dyn Check>> = Vec::new();
        for descriptor in descriptors {
            if !seen.insert(descriptor.rule_id.clone()) {
                tracing::debug!(rule = %descriptor.rule_id, "duplicate external check ignored");
                continue;
            }
            let default_severity: Severity =
                descriptor
                    .default_severity
                    .parse()
                    .map_err(|_| LintError::CustomRuleLoad {
                        path: path.to_path_buf(),
                        message: format!(
                            "check '{}' has invalid default severity '{}'",
                            descriptor.rule_id, descriptor.default_severity
                        ),
                    })?;
            if !config.is_rule_enabled(&descriptor.rule_id, repository) {
                tracing::debug!(rule = %descriptor.rule_id, "rule disabled");
                continue;
            }
            let settings = CheckSettings::resolve(
                &descriptor.rule_id,
                default_severity,
                config,
                repository,
                exclude,
            )?;

            checks.push(Box::new(WasmCheck {
                unit: Arc::clone(&unit),
                rule_id: descriptor.rule_id,
                description: descriptor.description,
                default_severity,
                settings,
            }));
        }

        tracing::debug!(path = %path.display(), checks = checks.len(), "loaded external check unit");
        Ok(checks)
    }

    struct WasmCheck {
        unit: Arc<Unit>,
        rule_id: String,
        description: String,
        default_severity: Severity,
        settings: CheckSettings,
    }

    impl Check for WasmCheck {
        fn rule_id(&self) -> &str {
            &self.rule_id
        }

        fn description(&self) -> &str {
            &self.description
        }

        fn default_severity(&self) -> Severity {
            self.default_severity
        }

        fn settings(&self) -> &CheckSettings {
            &self.settings
        }

        fn check(&self, repository: &Repository) -> std::result::Result<Vec<Violation>, CheckError> {
            let payload = serde_json::json!({
                "rule_id": self.rule_id,
                "severity": self.severity(),
                "repository": repository.snapshot(),
            });
            let reply = self
                .unit
                .call_json(CHECK_FN, &payload.to_string())
                .map_err(|e| {
                    CheckError::External(format!("{}: {e:#}", self.unit.path.display()))
                })?;

            let findings = match serde_json::from_str(&reply) {
                Ok(CheckReply::Findings(findings)) => findings,
                Ok(CheckReply::Failed { error }) => return Err(CheckError::External(error)),
                Err(e) => {
                    return Err(CheckError::External(format!("malformed check reply: {e}")));
                }
            };

            Ok(findings
                .into_iter()
                .filter_map(|finding| {
                    let mut violation = self.violation(finding.message);
                    if let Some(file) = finding.file_path {
                        let file = repository.root().join(file);
                        if self.settings.is_excluded(repository.root(), &file) {
                            return None;
                        }
                        violation = violation.at(file);
                    }
                    if let Some(line) = finding.line {
                        violation = violation.line(line);
                    }
                    Some(violation)
                })
                .collect())
        }
    }
}

#[cfg(test)]
#[path = "external_tests.rs"]
mod tests;
