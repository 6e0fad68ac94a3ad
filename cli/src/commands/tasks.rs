//! One-shot task subcommands for scripting and quick checks without the
//! full dashboard.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use evaldash_core::display::{format_percent, format_timestamp};
use evaldash_core::draft::TaskDraft;
use evaldash_core::ApiClient;

use super::cli::{ConfirmedArgs, CreateArgs};

pub async fn list(api: &ApiClient) -> anyhow::Result<()> {
    let tasks = api.list_tasks().await?;
    if tasks.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    println!(
        "{:>5}  {:<28} {:<10} {:>8}  {}",
        "ID", "NAME", "STATUS", "PROGRESS", "UPDATED"
    );
    for task in &tasks {
        println!(
            "{:>5}  {:<28} {:<10} {:>8}  {}",
            task.id,
            truncate(&task.name, 28),
            task.status.label(),
            task.progress.as_deref().unwrap_or("-"),
            format_timestamp(task.updated_at.as_deref().unwrap_or("")),
        );
    }
    Ok(())
}

pub async fn create(api: &ApiClient, args: &CreateArgs) -> anyhow::Result<()> {
    let mut draft = TaskDraft {
        name: args.name.clone(),
        description: args.description.clone(),
        api_endpoint: args.endpoint.clone(),
        api_key: args.api_key.clone(),
        dataset_type: args.dataset_type.clone(),
        dataset_path: args.dataset_path.clone(),
        selected_indicators: args.indicators.clone(),
        ..TaskDraft::default()
    };
    for pair in &args.weights {
        let (id, weight) = parse_weight(pair)?;
        draft.indicator_weights.insert(id, weight);
    }

    let response = api.create_task(&draft.create_payload()).await?;
    match response.get("id") {
        Some(id) => println!("task {id} created"),
        None => println!("task created"),
    }
    Ok(())
}

pub async fn start(api: &ApiClient, args: &ConfirmedArgs) -> anyhow::Result<()> {
    if !confirmed(&format!("Start task {}?", args.id), args.yes)? {
        println!("aborted");
        return Ok(());
    }
    api.start_task(args.id).await?;
    println!("task {} started", args.id);
    Ok(())
}

pub async fn delete(api: &ApiClient, args: &ConfirmedArgs) -> anyhow::Result<()> {
    let prompt = format!("Delete task {}? This cannot be undone.", args.id);
    if !confirmed(&prompt, args.yes)? {
        println!("aborted");
        return Ok(());
    }
    api.delete_task(args.id).await?;
    println!("task {} deleted", args.id);
    Ok(())
}

/// Print the selected task's result summary without entering the TUI.
pub async fn result(api: &ApiClient, task_id: i64) -> anyhow::Result<()> {
    let result = api.task_result(task_id).await?;
    if let Some(overall) = result.overall_score {
        println!("overall: {}", format_percent(overall));
    }
    for item in &result.result_items {
        println!(
            "{:<32} {:>7}  {}",
            truncate(&item.indicator_name, 32),
            format_percent(item.score),
            evaldash_core::ScoreTier::from_score(item.score).label(),
        );
    }
    Ok(())
}

fn parse_weight(pair: &str) -> anyhow::Result<(String, f64)> {
    let (id, weight) = pair
        .split_once('=')
        .with_context(|| format!("invalid weight '{pair}', expected id=weight"))?;
    let weight: f64 = weight
        .parse()
        .with_context(|| format!("invalid weight value in '{pair}'"))?;
    Ok((id.to_string(), weight))
}

fn confirmed(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_len.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn weight_pairs_parse() {
        assert_eq!(parse_weight("3=0.5").unwrap(), ("3".to_string(), 0.5));
        assert!(parse_weight("3").is_err());
        assert!(parse_weight("3=x").is_err());
    }

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("short", 28), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }
}
