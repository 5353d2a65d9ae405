use serde_json::Value;

use crate::response::{DeployResult, Output, Status};

/// Output mode selected by the `--json` flag. Json mode is byte-for-byte
/// stable and is the one to use for machine consumption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputMode {
    Json,
    Text,
}

/// Renders a decoded response value.
///
/// Json mode is a straight pass-through: the canonical re-encoding of the
/// decoded value, never otherwise transformed. Text mode applies the
/// scalar/structured dispatch (`"OOF"` prints as `OOF`, `{}` stays `{}`).
pub fn render_value(value: &Value, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => value.to_string(),
        OutputMode::Text => Output::classify(Some(value)).to_text(),
    }
}

/// Renders a deploy response as text, one block per result in response
/// order.
///
/// Per-item `failed` entries render like any other block and give the
/// caller nothing to turn into a non-zero exit; the exit code reflects only
/// transport-level outcomes.
pub fn render_deploy_text(results: &[DeployResult]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&render_result_block(result));
    }
    out
}

fn render_result_block(result: &DeployResult) -> String {
    match result.status {
        Status::Ok if result.kind == "exec" => {
            format!(
                "[exec]: ok\n  {}\n\n",
                Output::classify(result.output.as_ref()).to_text()
            )
        }
        Status::Ok => format!(
            "[{}] {}: ok\n  {}\n\n",
            result.kind,
            result.display_name(),
            result.link.as_deref().unwrap_or_default()
        ),
        Status::Failed => format!(
            "[{}] {}: failed\n  {}\n\n",
            result.kind,
            result.display_name(),
            result.error.as_deref().unwrap_or_default()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::decode_deploy;
    use serde_json::json;

    fn result(body: &str) -> DeployResult {
        decode_deploy(format!("[{}]", body).as_bytes())
            .unwrap()
            .remove(0)
    }

    #[test]
    fn exec_ok_renders_integer_output_bare() {
        let r = result(r#"{"status":"ok","type":"exec","output":42}"#);
        assert_eq!(render_deploy_text(&[r]), "[exec]: ok\n  42\n\n");
    }

    #[test]
    fn exec_ok_renders_structured_output_as_json() {
        let r = result(r#"{"status":"ok","type":"exec","output":{"a":1}}"#);
        assert_eq!(render_deploy_text(&[r]), "[exec]: ok\n  {\"a\":1}\n\n");
    }

    #[test]
    fn exec_ok_with_absent_output_renders_null() {
        let r = result(r#"{"status":"ok","type":"exec"}"#);
        assert_eq!(render_deploy_text(&[r]), "[exec]: ok\n  null\n\n");
    }

    #[test]
    fn deploy_ok_with_empty_name_uses_placeholder() {
        let r = result(r#"{"status":"ok","type":"deploy","name":"","link":"https://x"}"#);
        assert_eq!(
            render_deploy_text(&[r]),
            "[deploy] (undefined): ok\n  https://x\n\n"
        );
    }

    #[test]
    fn failed_result_renders_error_regardless_of_kind() {
        let r = result(r#"{"status":"failed","type":"exec","name":"svc","error":"boom"}"#);
        assert_eq!(render_deploy_text(&[r]), "[exec] svc: failed\n  boom\n\n");
    }

    #[test]
    fn blocks_concatenate_in_response_order() {
        let results = decode_deploy(
            r#"[
                {"status":"ok","type":"exec","output":"started"},
                {"status":"ok","type":"proc","name":"deployed","link":"proc.run/lib/deployed:dev"},
                {"status":"ok","type":"exec","output":"finished"}
            ]"#
            .as_bytes(),
        )
        .unwrap();
        assert_eq!(
            render_deploy_text(&results),
            "[exec]: ok\n  started\n\n\
             [proc] deployed: ok\n  proc.run/lib/deployed:dev\n\n\
             [exec]: ok\n  finished\n\n"
        );
    }

    // Documented gap: a failed item still renders as plain output and the
    // renderer gives the caller nothing to turn into a non-zero exit.
    #[test]
    fn failed_items_do_not_signal_failure() {
        let results = decode_deploy(
            r#"[
                {"status":"ok","type":"proc","name":"a","link":"x"},
                {"status":"failed","type":"proc","error":"boom"}
            ]"#
            .as_bytes(),
        )
        .unwrap();
        assert_eq!(
            render_deploy_text(&results),
            "[proc] a: ok\n  x\n\n[proc] (undefined): failed\n  boom\n\n"
        );
    }

    #[test]
    fn json_mode_passes_values_through() {
        assert_eq!(render_value(&json!("OOF"), OutputMode::Json), "\"OOF\"");
        assert_eq!(render_value(&json!({"a":1}), OutputMode::Json), "{\"a\":1}");
        // A deploy body in json mode passes through untouched too, even
        // with a status the text renderer would reject.
        let value = json!([{"status":"pending","type":"proc"}]);
        assert_eq!(
            render_value(&value, OutputMode::Json),
            r#"[{"status":"pending","type":"proc"}]"#
        );
    }

    #[test]
    fn text_mode_renders_scalars_bare() {
        assert_eq!(render_value(&json!("OOF"), OutputMode::Text), "OOF");
        assert_eq!(render_value(&json!(42), OutputMode::Text), "42");
        assert_eq!(render_value(&json!(42.42), OutputMode::Text), "42.42");
        assert_eq!(render_value(&json!(true), OutputMode::Text), "true");
        assert_eq!(render_value(&json!({}), OutputMode::Text), "{}");
        assert_eq!(render_value(&json!([]), OutputMode::Text), "[]");
    }
}
