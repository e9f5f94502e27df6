//! AI command implementations (suggest, learn, insights)

use anyhow::{Context, Result};
use mymoney_core::suggest::should_autofill;
use mymoney_core::{format_currency, ClientConfig, ConfidenceBadge, FinanceApi};

pub async fn cmd_suggest<A: FinanceApi>(
    api: &A,
    config: &ClientConfig,
    description: &str,
    json: bool,
) -> Result<()> {
    let suggestion = api
        .categorize(description, &config.user_id)
        .await
        .context("AI categorization failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
        return Ok(());
    }

    let badge = ConfidenceBadge::for_suggestion(&suggestion);
    println!("{}", badge.label());
    if let Some(source) = &suggestion.source {
        println!("   Source: {}", source);
    }
    if !suggestion.alternatives.is_empty() {
        println!("   Alternatives: {}", suggestion.alternatives.join(", "));
    }
    if should_autofill(&suggestion, config.suggestions.autofill_threshold) {
        println!("   The form would fill this category in automatically.");
    }

    Ok(())
}

pub async fn cmd_learn<A: FinanceApi>(
    api: &A,
    config: &ClientConfig,
    description: &str,
    category: &str,
) -> Result<()> {
    api.learn_correction(description, category, &config.user_id)
        .await
        .context("Failed to report correction")?;

    println!("🤖 AI learned: \"{}\" → {}", description, category);
    Ok(())
}

pub async fn cmd_insights<A: FinanceApi>(api: &A, config: &ClientConfig, json: bool) -> Result<()> {
    let insights = api
        .spending_insights(&config.user_id)
        .await
        .context("Failed to fetch spending insights")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    if insights.category_breakdown.is_empty() {
        println!("No expenses to analyze yet.");
        return Ok(());
    }

    println!();
    println!("📊 Spending by Category");
    let mut breakdown: Vec<_> = insights.category_breakdown.iter().collect();
    breakdown.sort_by(|a, b| b.1.total_cmp(a.1));
    for (category, amount) in breakdown {
        println!("   {:<24} {:>14}", category, format_currency(*amount));
    }

    if !insights.insights.is_empty() {
        println!();
        println!("💡 Insights");
        for line in &insights.insights {
            println!("   • {}", line);
        }
    }

    if !insights.recommendations.is_empty() {
        println!();
        println!("🎯 Recommendations");
        for line in &insights.recommendations {
            println!("   • {}", line);
        }
    }

    Ok(())
}
