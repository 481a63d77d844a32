use tokio::sync::Mutex;

use crate::{
    config, error, error::GenerateError, info, service, success, types::GeneratedPlaylist,
};

use super::progress::spinner;

/// Generates a playlist for `prompt` and prints where to find it.
pub async fn generate(prompt: String) {
    let pb = spinner("Analyzing mood and collecting tracks...");
    let history_lock = Mutex::new(());
    let result = service::generate_and_store(&config::data_dir(), &prompt, &history_lock).await;
    pb.finish_and_clear();

    match result {
        Ok(generated) => print_generated(&generated),
        Err(GenerateError::Unauthorized) => {
            error!("Not authorized with Spotify. Run `moodlist auth` first.")
        }
        Err(GenerateError::InvalidPrompt) => error!(
            "Prompt must not be empty and at most {} characters.",
            crate::generator::MAX_PROMPT_CHARS
        ),
        Err(e) => error!("Failed to generate playlist. Err: {}", e),
    }
}

fn print_generated(generated: &GeneratedPlaylist) {
    let mood = &generated.record.mood_analysis;
    success!(
        "Created playlist \"{}\" with {} tracks",
        generated.record.name,
        generated.record.track_ids.len()
    );
    info!("Mood: {} (energy {}/10)", mood.primary_mood, mood.energy);
    if !mood.genres.is_empty() {
        info!("Genres: {}", mood.genres.join(", "));
    }
    if let Some(uri) = &generated.playlist.uri {
        info!("Open in Spotify: {}", uri);
    }
}
