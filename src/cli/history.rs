use tabled::Table;

use crate::{config, info, service, utils, warning};

/// Prints stored playlists, newest first, optionally limited to `limit` rows.
pub async fn history(limit: Option<usize>) {
    let mut records = match service::history(&config::data_dir()).await {
        Ok(records) => records,
        Err(e) => {
            warning!("Failed to load playlist history. Err: {}", e);
            return;
        }
    };

    if records.is_empty() {
        info!("No playlists generated yet.");
        return;
    }

    if let Some(limit) = limit {
        records.truncate(limit);
    }

    let table = Table::new(utils::history_table_rows(&records));
    println!("{}", table);
}
