use crate::errors::{GeneratorError, Result};
use crate::theme::StylesheetResolver;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// The external utility-CSS JIT engine, treated as a black box.
///
/// Given composed theme CSS and the harvested candidate class list, returns
/// CSS text with zero or one rule per class the engine recognizes. Classes
/// the engine does not recognize simply produce no rule.
pub trait UtilityCompiler {
    fn compile(
        &mut self,
        input_css: &str,
        candidates: &[String],
        resolver: &dyn StylesheetResolver,
    ) -> Result<String>;
}

const NODE_SCRIPT_FILENAME: &str = "tailwind-compile.mjs";
const NODE_SCRIPT_SOURCE: &str = r#"import { createInterface } from 'node:readline';
import { stdin, stdout } from 'node:process';
import { createRequire } from 'node:module';
import { pathToFileURL } from 'node:url';

let compile = null;
try {
  const require = createRequire(pathToFileURL(process.cwd() + '/'));
  const mod = await import(pathToFileURL(require.resolve('tailwindcss')).href);
  compile = mod.compile;
} catch (err) {
  const message = err && err.message ? err.message : String(err);
  stdout.write(JSON.stringify({ type: 'fatal', message }) + '\n');
  process.exit(2);
}

const rl = createInterface({ input: stdin, crlfDelay: Infinity });
const lines = rl[Symbol.asyncIterator]();

async function ask(request) {
  stdout.write(JSON.stringify(request) + '\n');
  const { value } = await lines.next();
  return JSON.parse(value);
}

const first = await lines.next();
const job = JSON.parse(first.value);

try {
  const compiled = await compile(job.css, {
    base: job.base,
    async loadStylesheet(id, base) {
      const reply = await ask({ type: 'resolve', id, base });
      return { path: reply.path, base: reply.base, content: reply.content };
    },
    async loadModule() {
      return { module: {}, base: job.base };
    },
  });
  const css = compiled.build(job.candidates);
  stdout.write(JSON.stringify({ type: 'result', css }) + '\n');
} catch (err) {
  const message = err && err.message ? err.message : String(err);
  stdout.write(JSON.stringify({ type: 'error', message }) + '\n');
  process.exit(1);
}
"#;

#[derive(Debug, Serialize)]
struct CompileJob<'a> {
    css: &'a str,
    candidates: &'a [String],
    base: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EngineMessage {
    Resolve { id: String, base: String },
    Result { css: String },
    Error { message: String },
    Fatal { message: String },
}

#[derive(Debug, Serialize)]
struct ResolveReply {
    path: String,
    base: String,
    content: String,
}

/// Utility compiler backed by the real Tailwind engine running in a Node
/// one-shot helper process.
///
/// The helper speaks newline-delimited JSON on stdin/stdout: one compile job
/// in, stylesheet-resolution requests answered through the injected resolver,
/// one result back.
pub struct NodeTailwindCompiler {
    node_command: String,
    base_dir: PathBuf,
    script_dir: tempfile::TempDir,
}

impl NodeTailwindCompiler {
    pub fn new(node_command: impl Into<String>, base_dir: &Path) -> Result<Self> {
        let script_dir = tempfile::tempdir()?;
        std::fs::write(
            script_dir.path().join(NODE_SCRIPT_FILENAME),
            NODE_SCRIPT_SOURCE,
        )?;

        Ok(Self {
            node_command: node_command.into(),
            base_dir: base_dir.to_path_buf(),
            script_dir,
        })
    }
}

impl UtilityCompiler for NodeTailwindCompiler {
    fn compile(
        &mut self,
        input_css: &str,
        candidates: &[String],
        resolver: &dyn StylesheetResolver,
    ) -> Result<String> {
        let script_path = self.script_dir.path().join(NODE_SCRIPT_FILENAME);

        let mut child = Command::new(&self.node_command)
            .arg(&script_path)
            .current_dir(&self.base_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                GeneratorError::EngineError(format!(
                    "failed to spawn '{}': {}",
                    self.node_command, e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GeneratorError::EngineError("engine stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GeneratorError::EngineError("engine stdout unavailable".to_string()))?;

        let job = CompileJob {
            css: input_css,
            candidates,
            base: self.base_dir.display().to_string(),
        };
        let mut line = serde_json::to_string(&job)?;
        line.push('\n');
        stdin.write_all(line.as_bytes())?;
        stdin.flush()?;

        let mut compiled = None;
        for line in BufReader::new(stdout).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let message: EngineMessage = serde_json::from_str(&line).map_err(|e| {
                GeneratorError::EngineError(format!("unparseable engine message: {}", e))
            })?;

            match message {
                EngineMessage::Resolve { id, base } => {
                    let resolved = resolver.resolve(&id, Path::new(&base));
                    let reply = ResolveReply {
                        path: resolved.path.display().to_string(),
                        base: resolved.base.display().to_string(),
                        content: resolved.content,
                    };
                    let mut out = serde_json::to_string(&reply)?;
                    out.push('\n');
                    stdin.write_all(out.as_bytes())?;
                    stdin.flush()?;
                }
                EngineMessage::Result { css } => {
                    compiled = Some(css);
                    break;
                }
                EngineMessage::Error { message } | EngineMessage::Fatal { message } => {
                    let _ = child.wait();
                    return Err(GeneratorError::EngineError(message));
                }
            }
        }

        drop(stdin);
        let status = child.wait()?;

        match compiled {
            Some(css) => Ok(css),
            None => Err(GeneratorError::EngineError(format!(
                "engine exited without a result (status {})",
                status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_message_parsing() {
        let message: EngineMessage =
            serde_json::from_str(r#"{"type":"resolve","id":"tailwindcss/theme.css","base":"/srv"}"#)
                .unwrap();
        assert!(matches!(message, EngineMessage::Resolve { .. }));

        let message: EngineMessage =
            serde_json::from_str(r#"{"type":"result","css":".p-4{padding:1rem}"}"#).unwrap();
        match message {
            EngineMessage::Result { css } => assert!(css.contains("padding")),
            _ => panic!("expected result message"),
        }

        let message: EngineMessage =
            serde_json::from_str(r#"{"type":"error","message":"boom"}"#).unwrap();
        assert!(matches!(message, EngineMessage::Error { .. }));
    }

    #[test]
    fn test_compile_job_serialization() {
        let candidates = vec!["p-4".to_string(), "mt-1".to_string()];
        let job = CompileJob {
            css: "@import \"tailwindcss/theme.css\";",
            candidates: &candidates,
            base: "/srv/app".to_string(),
        };

        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains("\"candidates\":[\"p-4\",\"mt-1\"]"));
        assert!(json.contains("\"base\":\"/srv/app\""));
    }
}
