//! Claude Code CLI Provider
//!
//! Default provider, driving the local `claude` CLI in print mode.
//! Single-shot execution; the caller owns the timeout.

use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

use super::{
    ErrorClassifier, GenerationRequest, LlmProvider, LlmResponse, ResponseMetadata,
    ResponseTiming, TokenUsage,
};
use crate::config::{LlmConfig, TierModels};
use crate::types::{CrewError, ModelTier, Result};

const PROVIDER: &str = "claude-code";

/// Claude Code CLI Provider
pub struct ClaudeCodeProvider {
    models: TierModels,
    temperature: f32,
}

impl ClaudeCodeProvider {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            models: config.models,
            temperature: config.temperature,
        }
    }

    fn fault(message: impl AsRef<str>) -> CrewError {
        CrewError::Llm(ErrorClassifier::classify(message.as_ref(), PROVIDER))
    }

    async fn execute(&self, request: &GenerationRequest) -> Result<LlmResponse> {
        let model = self.model_for(request.tier).to_string();
        let start_time = Instant::now();

        debug!(
            "Executing Claude Code CLI (model={}, temperature={})",
            model, self.temperature
        );

        let mut cmd = Command::new("claude");
        cmd.arg("-p")
            .arg(&request.prompt)
            .arg("--output-format")
            .arg("json")
            .arg("--model")
            .arg(&model)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if !request.system.is_empty() {
            cmd.arg("--append-system-prompt").arg(&request.system);
        }

        cmd.env("CLAUDE_CODE_TEMPERATURE", self.temperature.to_string());

        let child = cmd.spawn().map_err(|e| {
            Self::fault(format!(
                "Failed to spawn Claude Code CLI: {}. Is it installed?",
                e
            ))
        })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Self::fault(format!("Claude Code execution failed: {}", e)))?;

        let elapsed = start_time.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            // API errors are reported as JSON on stdout
            if let Ok(response) = serde_json::from_str::<Value>(&stdout)
                && response
                    .get("is_error")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false)
            {
                let error_msg = response
                    .get("result")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown API error");
                return Err(Self::fault(format!("Claude Code API error: {}", error_msg)));
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            let error_msg = if stderr.trim().is_empty() {
                "Process exited with non-zero status"
            } else {
                stderr.trim()
            };
            return Err(Self::fault(format!("Claude Code failed: {}", error_msg)));
        }

        let response: Value = serde_json::from_str(&stdout)
            .map_err(|e| Self::fault(format!("Failed to parse Claude Code output: {}", e)))?;

        let content = extract_text(&response)
            .ok_or_else(|| Self::fault("No result text in Claude Code response"))?;

        Ok(LlmResponse {
            content,
            usage: extract_usage(&response),
            cost_usd: extract_cost(&response),
            timing: ResponseTiming::with_api_time(
                elapsed,
                response.get("duration_api_ms").and_then(|v| v.as_u64()),
            ),
            metadata: ResponseMetadata {
                model,
                provider: PROVIDER.to_string(),
            },
        })
    }
}

/// Generated text from the CLI's `result` field
fn extract_text(response: &Value) -> Option<String> {
    response
        .get("result")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_usage(response: &Value) -> TokenUsage {
    let usage = response.get("usage");
    let field = |name: &str| {
        usage
            .and_then(|u| u.get(name))
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    };

    TokenUsage {
        input_tokens: field("input_tokens"),
        output_tokens: field("output_tokens"),
        cache_read_tokens: field("cache_read_input_tokens"),
        cache_write_tokens: field("cache_creation_input_tokens"),
    }
}

fn extract_cost(response: &Value) -> f64 {
    response
        .get("total_cost_usd")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

#[async_trait]
impl LlmProvider for ClaudeCodeProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse> {
        info!(
            "Generating with Claude Code CLI (tier: {}, model: {})",
            request.tier,
            self.model_for(request.tier)
        );
        self.execute(request).await
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        self.models.for_tier(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCategory;

    #[test]
    fn test_model_per_tier() {
        let provider = ClaudeCodeProvider::new(LlmConfig::default());
        assert_eq!(provider.model_for(ModelTier::Low), "claude-haiku-4-5");
        assert_eq!(provider.model_for(ModelTier::High), "claude-opus-4-1");
    }

    #[test]
    fn test_extract_usage() {
        let response = serde_json::json!({
            "usage": {
                "input_tokens": 1000,
                "output_tokens": 500,
                "cache_read_input_tokens": 100,
                "cache_creation_input_tokens": 50
            }
        });

        let usage = extract_usage(&response);
        assert_eq!(usage.input_tokens, 1000);
        assert_eq!(usage.output_tokens, 500);
        assert_eq!(usage.cache_read_tokens, 100);
        assert_eq!(usage.cache_write_tokens, 50);
        assert_eq!(usage.total(), 1500);
    }

    #[test]
    fn test_extract_cost() {
        let response = serde_json::json!({ "total_cost_usd": 0.0471472 });
        assert!((extract_cost(&response) - 0.0471472).abs() < 0.0000001);
        assert_eq!(extract_cost(&serde_json::json!({})), 0.0);
    }

    #[test]
    fn test_extract_text() {
        let response = serde_json::json!({ "result": "  # Testing skill\n" });
        assert_eq!(extract_text(&response).as_deref(), Some("# Testing skill"));
        assert_eq!(extract_text(&serde_json::json!({ "result": "   " })), None);
        assert_eq!(extract_text(&serde_json::json!({ "result": 3 })), None);
    }

    #[test]
    fn test_faults_are_classified() {
        match ClaudeCodeProvider::fault("Claude Code API error: rate limit reached") {
            CrewError::Llm(err) => {
                assert_eq!(err.category, ErrorCategory::RateLimit);
                assert_eq!(err.provider.as_deref(), Some("claude-code"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
