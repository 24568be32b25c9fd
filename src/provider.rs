use std::sync::Arc;

use adk_rust::prelude::*;
use anyhow::{Context, Result};

use crate::cli::Provider;
use crate::config::RuntimeConfig;

/// Model the trip agents were tuned against.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Credential variable per provider, in auto-detection order. Gemini comes
/// first because the trip agents default to it.
pub const PROVIDER_ENV: &[(Provider, &str)] = &[
    (Provider::Gemini, "GOOGLE_API_KEY"),
    (Provider::Openai, "OPENAI_API_KEY"),
    (Provider::Anthropic, "ANTHROPIC_API_KEY"),
    (Provider::Deepseek, "DEEPSEEK_API_KEY"),
    (Provider::Groq, "GROQ_API_KEY"),
    (Provider::Ollama, "OLLAMA_HOST"),
];

pub fn default_model_for_provider(provider: Provider) -> &'static str {
    match provider {
        Provider::Gemini | Provider::Auto => DEFAULT_GEMINI_MODEL,
        Provider::Openai => "gpt-4.1-mini",
        Provider::Anthropic => "claude-sonnet-4-20250514",
        Provider::Deepseek => "deepseek-chat",
        Provider::Groq => "llama-3.3-70b-versatile",
        Provider::Ollama => "llama4",
    }
}

/// Reject model ids that clearly belong to another provider. Groq and
/// Ollama host arbitrary model names, so only emptiness is checked there.
pub fn validate_model_for_provider(provider: Provider, model: &str) -> Result<()> {
    let prefixes: &[&str] = match provider {
        Provider::Gemini => &["gemini"],
        Provider::Openai => &["gpt-", "o1", "o3", "o4"],
        Provider::Anthropic => &["claude"],
        Provider::Deepseek => &["deepseek"],
        Provider::Groq | Provider::Ollama | Provider::Auto => &[""],
    };

    let model = model.trim();
    if !model.is_empty() && prefixes.iter().any(|prefix| model.starts_with(prefix)) {
        return Ok(());
    }
    anyhow::bail!("model '{model}' is not compatible with provider '{provider:?}'")
}

pub fn env_present(key: &str) -> bool {
    std::env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

pub fn detect_provider() -> Option<Provider> {
    PROVIDER_ENV
        .iter()
        .find(|(_, key)| env_present(key))
        .map(|(provider, _)| *provider)
}

fn api_key(key: &str, provider: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} is required for the {provider} provider"))
}

/// Build the model every trip agent shares. Returns the concrete provider
/// and model id alongside it for logging.
pub fn resolve_model(cfg: &RuntimeConfig) -> Result<(Arc<dyn Llm>, Provider, String)> {
    let provider = match cfg.provider {
        Provider::Auto => detect_provider().context(
            "no provider could be auto-detected. Set GOOGLE_API_KEY (or OPENAI_API_KEY, \
             ANTHROPIC_API_KEY, DEEPSEEK_API_KEY, GROQ_API_KEY, OLLAMA_HOST)",
        )?,
        chosen => chosen,
    };
    let model_name = cfg
        .model
        .clone()
        .unwrap_or_else(|| default_model_for_provider(provider).to_string());
    validate_model_for_provider(provider, &model_name)?;

    let model: Arc<dyn Llm> = match provider {
        Provider::Gemini | Provider::Auto => Arc::new(GeminiModel::new(
            api_key("GOOGLE_API_KEY", "Gemini")?,
            &model_name,
        )?),
        Provider::Openai => Arc::new(OpenAIClient::new(OpenAIConfig::new(
            api_key("OPENAI_API_KEY", "OpenAI")?,
            &model_name,
        ))?),
        Provider::Anthropic => Arc::new(AnthropicClient::new(AnthropicConfig::new(
            api_key("ANTHROPIC_API_KEY", "Anthropic")?,
            &model_name,
        ))?),
        Provider::Deepseek => Arc::new(DeepSeekClient::new(DeepSeekConfig::new(
            api_key("DEEPSEEK_API_KEY", "DeepSeek")?,
            &model_name,
        ))?),
        Provider::Groq => Arc::new(GroqClient::new(GroqConfig::new(
            api_key("GROQ_API_KEY", "Groq")?,
            &model_name,
        ))?),
        Provider::Ollama => {
            let host =
                std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());
            Arc::new(OllamaModel::new(OllamaConfig::with_host(host, &model_name))?)
        }
    };

    Ok((model, provider, model_name))
}
