//! Subcommand handlers
//!
//! Each handler writes its result to `out` so the output can be checked in
//! tests; diagnostics go through `tracing` to stderr.

use std::io::{BufRead, Write};

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use songlink_domain::SongLinkError;

use crate::context::AppContext;

/// Shown once per storage location
pub const PUBLIC_AVAILABILITY_NOTICE: &str =
    "songlink is now publicly available. Run `songlink connect` to link your Spotify account.";

/// Print the authorize URL, read the redirect URL back, store the token
pub async fn connect(
    ctx: &AppContext,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let request = ctx.service.start_connect();
    writeln!(out, "Open this URL in your browser and approve access:\n\n  {}\n", request.url())?;
    writeln!(out, "Then paste the URL you were redirected to:")?;
    out.flush()?;

    let mut callback = String::new();
    input.read_line(&mut callback).context("Failed to read the redirect URL")?;

    ctx.service.complete_connect(&request, callback.trim()).await?;
    writeln!(out, "✅ Spotify connected")?;
    Ok(())
}

/// Print the Markdown link for the song playing now
pub async fn link(ctx: &AppContext, out: &mut impl Write) -> anyhow::Result<()> {
    let link = ctx.service.song_link().await?;
    writeln!(out, "{link}")?;
    Ok(())
}

/// Print the connected account
pub async fn profile(ctx: &AppContext, out: &mut impl Write) -> anyhow::Result<()> {
    let profile = ctx.service.profile().await?;
    writeln!(out, "Connected as {}", profile.name())?;
    if let Some(url) = profile.profile_url() {
        writeln!(out, "Profile: {url}")?;
    }
    if let Some(image) = profile.image_url() {
        writeln!(out, "Image: {image}")?;
    }
    Ok(())
}

/// Print whether a token is stored and when it expires, without refreshing
pub async fn status(ctx: &AppContext, out: &mut impl Write) -> anyhow::Result<()> {
    let backend = ctx.config.storage.backend;
    match ctx.tokens.seconds_until_expiry().await {
        None => writeln!(out, "Not connected (storage: {backend})")?,
        Some(remaining) => {
            writeln!(out, "Connected (storage: {backend})")?;
            writeln!(out, "{}", describe_expiry(Utc::now(), remaining))?;
        }
    }
    Ok(())
}

/// Forget the stored token
pub async fn disconnect(ctx: &AppContext, out: &mut impl Write) -> anyhow::Result<()> {
    ctx.service.disconnect().await?;
    writeln!(out, "Spotify disconnected")?;
    Ok(())
}

/// Print the public-availability notice once
pub async fn notify_once(ctx: &AppContext, out: &mut impl Write) -> anyhow::Result<()> {
    if ctx.notices.has_notified().await {
        return Ok(());
    }
    writeln!(out, "{PUBLIC_AVAILABILITY_NOTICE}")?;
    ctx.notices.mark_notified().await;
    Ok(())
}

/// One-line expiry description relative to `now`
#[must_use]
pub fn describe_expiry(now: DateTime<Utc>, remaining_seconds: i64) -> String {
    let expires_at =
        Duration::try_seconds(remaining_seconds).and_then(|delta| now.checked_add_signed(delta));
    let Some(expires_at) = expires_at else {
        return if remaining_seconds > 0 {
            "Access token expires far in the future".to_string()
        } else {
            "Access token expired long ago; it is refreshed on next use".to_string()
        };
    };

    let stamp = expires_at.format("%Y-%m-%d %H:%M:%S UTC");
    if remaining_seconds > 0 {
        format!("Access token expires at {stamp} (in {})", human_duration(remaining_seconds))
    } else {
        format!(
            "Access token expired at {stamp} ({} ago); it is refreshed on next use",
            human_duration(remaining_seconds.saturating_neg())
        )
    }
}

fn human_duration(seconds: i64) -> String {
    match seconds {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m", s / 60),
        s => format!("{}h {}m", s / 3600, (s % 3600) / 60),
    }
}

/// Message shown to the user for a failed command
#[must_use]
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SongLinkError>() {
        Some(SongLinkError::NotConnected) => {
            "❌ Connect Spotify first with `songlink connect`".to_string()
        }
        Some(SongLinkError::NothingPlaying) => "❌ No song playing".to_string(),
        Some(SongLinkError::Auth(msg)) => format!("❌ Could not connect Spotify: {msg}"),
        _ => format!("❌ {err:#}"),
    }
}
