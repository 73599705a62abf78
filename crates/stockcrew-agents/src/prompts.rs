use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use stockcrew_models::{AgentDefinition, AgentRequest, Capability, InstrumentQuote, MarketContext};

use crate::context::RunContext;

/// Variables a task template may reference.
pub const TEMPLATE_VARIABLES: [&str; 3] = ["ticker", "market_context", "current_date"];

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("static regex"));

/// Names of all `{placeholder}` references in a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .collect()
}

/// Substitute `{name}` references from `vars`. Unknown names are left as written.
pub fn render_template(template: &str, vars: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            vars.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Template values for one run.
pub fn template_vars(ctx: &RunContext) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("ticker".to_string(), ctx.ticker().to_string()),
        ("current_date".to_string(), ctx.current_date()),
        (
            "market_context".to_string(),
            market_context_summary(ctx.market_context()),
        ),
    ])
}

/// One-line description of the market snapshot for prompt text.
pub fn market_context_summary(market: Option<&MarketContext>) -> String {
    match market {
        Some(m) if !m.is_empty() => format!(
            "USD/BRL {}; BTC/USD {}",
            quote_summary(&m.dollar),
            quote_summary(&m.bitcoin)
        ),
        _ => "not available".to_string(),
    }
}

fn quote_summary(quote: &InstrumentQuote) -> String {
    let variation = quote
        .variation_percent
        .map(|v| format!("{:+.2}%", v.round_dp(2)))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "current {}, previous {}, variation {variation}",
        fmt_value(quote.current),
        fmt_value(quote.previous)
    )
}

fn fmt_value(value: Option<Decimal>) -> String {
    value
        .map(|v| v.round_dp(4).normalize().to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

/// System prompt describing who the agent is.
pub fn agent_system_prompt(agent: &AgentDefinition) -> String {
    let mut prompt = format!(
        "You are {}.\n\n{}\n\nYour personal goal is: {}\n",
        agent.role, agent.backstory, agent.goal
    );
    if agent.has_capability(Capability::WebSearch) {
        prompt.push_str(
            "\nYou can search the web. Prefer Brazilian sources and results from the last \
             few months, and mention the date of each piece of information.\n",
        );
    }
    prompt.push_str(
        "\nRespond with the requested deliverable only, in markdown, without wrapping it in \
         a code block.\n",
    );
    prompt
}

/// User prompt for one task invocation, carrying every earlier output.
pub fn task_prompt(request: &AgentRequest) -> String {
    let mut prompt = format!(
        "# Task: {}\n\nTicker: {}\n\n{}\n\n## Expected output\n\n{}\n",
        request.task, request.ticker, request.description, request.expected_output
    );

    if let Some(dep) = &request.dependency_output {
        prompt.push_str(&format!(
            "\n## Input from {} ({})\n\n{}\n",
            dep.task, dep.agent, dep.output
        ));
    }

    let others: Vec<_> = request
        .prior_outputs
        .iter()
        .filter(|p| request.dependency_output.as_ref() != Some(*p))
        .collect();
    if !others.is_empty() {
        prompt.push_str("\n## Context from earlier tasks\n");
        for prior in others {
            prompt.push_str(&format!(
                "\n### {} ({})\n\n{}\n",
                prior.task, prior.agent, prior.output
            ));
        }
    }

    prompt
}
