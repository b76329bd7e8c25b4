//! The fixed Python program that hosts a script.
//!
//! It reads the script from stdin, compiles it as `<ppt_script>`, and
//! executes it in a namespace holding only `__name__`, `__file__` and the
//! builtins. Exceptions are written as JSON to the file named by
//! [`REPORT_ENV`], which is removed from the environment before the script
//! starts.

use crate::error::ScriptError;

/// Environment key carrying the report file path into the bootstrap.
pub(crate) const REPORT_ENV: &str = "PPTX_SANDBOX_REPORT";

/// Name prefix of the report file.
pub(crate) const REPORT_PREFIX: &str = "dome_ppt_report_";

pub(crate) const BOOTSTRAP: &str = r#"
import json
import os
import sys
import traceback

_report_path = os.environ.pop('PPTX_SANDBOX_REPORT')


def _clean(text):
    # Lone surrogates (from os.fsdecode and friends) are not valid JSON text.
    return text.encode('utf-8', 'backslashreplace').decode('utf-8')


def _describe(exc):
    try:
        return str(exc)
    except Exception:
        return repr(exc)


def _report(kind, message, trace):
    report = {'kind': _clean(kind), 'message': _clean(message), 'traceback': _clean(trace)}
    with open(_report_path, 'w', encoding='utf-8') as fh:
        json.dump(report, fh)


_source = sys.stdin.buffer.read().decode('utf-8')
sys.argv = ['<ppt_script>']
_namespace = {
    '__name__': '__main__',
    '__file__': '<ppt_script>',
    '__builtins__': __builtins__,
}

try:
    exec(compile(_source, '<ppt_script>', 'exec'), _namespace)
except SystemExit as exc:
    if exc.code is None or exc.code == 0:
        sys.exit(0)
    _report('SystemExit', str(exc.code), '')
    sys.exit(1)
except Exception as exc:
    _trace = ''.join(traceback.format_exception(type(exc), exc, exc.__traceback__.tb_next))
    _report(type(exc).__name__, _describe(exc), _trace)
    sys.exit(1)
"#;

/// Kind used when the report exists but is not the expected JSON.
pub(crate) const UNPARSED_KIND: &str = "ScriptError";

/// Parse the report file contents. An empty file means nothing was raised.
///
/// Anything else is a script failure: a report that does not parse is
/// passed through as the message rather than dropped.
pub(crate) fn parse_report(contents: &str) -> Option<ScriptError> {
    if contents.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(contents) {
        Ok(report) => Some(report),
        Err(e) => {
            log::warn!("Malformed script report ({}), using raw text", e);
            Some(ScriptError {
                kind: UNPARSED_KIND.to_string(),
                message: contents.trim().to_string(),
                traceback: String::new(),
            })
        }
    }
}
