use evaldash_core::display::format_bytes;
use evaldash_core::ApiClient;

pub async fn stats(api: &ApiClient) -> anyhow::Result<()> {
    let stats = api.system_stats().await?;
    println!(
        "cpu:    {:.1}%{}",
        stats.cpu.percent,
        stats
            .cpu
            .count
            .map(|c| format!(" ({c} cores)"))
            .unwrap_or_default()
    );
    println!(
        "memory: {} / {} ({:.1}%)",
        format_bytes(stats.memory.used),
        format_bytes(stats.memory.total),
        stats.memory.percent
    );
    println!(
        "disk:   {} used, {} free of {}",
        format_bytes(stats.disk.used),
        format_bytes(stats.disk.free),
        format_bytes(stats.disk.total)
    );
    Ok(())
}

pub async fn health(api: &ApiClient) -> anyhow::Result<()> {
    if api.health().await? {
        println!("service is healthy");
    } else {
        println!("service responded but is unhealthy");
    }
    Ok(())
}
