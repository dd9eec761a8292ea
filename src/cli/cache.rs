//! Cache management commands
//!
//! The response cache is in-memory and process-wide: stats and clear operate
//! on the current process's instance.

use crate::cache::ScopedCache;
use crate::cli::OutputFormat;
use crate::error::Result;

/// Show cache statistics
pub fn stats(cache: &ScopedCache, format: OutputFormat) -> Result<()> {
    let stats = cache
        .stats()
        .ok_or_else(|| crate::error::Error::Other("Cache unavailable".to_string()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "total_entries": stats.total_entries,
                "valid_entries": stats.valid_entries,
                "expired_entries": stats.expired_entries,
                "max_size": stats.max_size,
                "oldest_age_secs": stats.oldest_age.map(|d| d.as_secs()),
                "newest_age_secs": stats.newest_age.map(|d| d.as_secs()),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("Cache Statistics");
            println!("────────────────────────────────────────");
            println!("Valid entries:   {}", stats.valid_entries);
            println!("Expired:         {}", stats.expired_entries);
            println!("Capacity:        {}", stats.max_size);

            if let Some(oldest) = stats.oldest_age {
                println!("Oldest entry:    {}s ago", oldest.as_secs());
            }
            if let Some(newest) = stats.newest_age {
                println!("Newest entry:    {}s ago", newest.as_secs());
            }
        }
    }

    Ok(())
}

/// Clear all cache entries
pub fn clear(cache: &ScopedCache, format: OutputFormat) -> Result<()> {
    let removed = cache.clear_all();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if removed > 0 {
                println!("Cleared {} cache entries", removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}
