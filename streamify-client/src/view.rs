use std::fmt::Write;

use streamify_core::player::PlaybackState;

use crate::data::{AlertStyle, AppState, AvatarCategory, Focus, PinPrompt, PromiseState, Route};

/// Text rendering of the state for the terminal front end.
pub fn render(state: &AppState) -> String {
    let mut out = String::new();
    for alert in &state.alerts {
        let tag = match alert.style {
            AlertStyle::Info => "info",
            AlertStyle::Error => "error",
        };
        let _ = writeln!(out, "[{tag} {}] {}", alert.id, alert.message);
    }
    match state.route {
        Route::SignedOut => render_signed_out(state, &mut out),
        Route::ProfileSelect => render_profiles(state, &mut out),
        Route::Browse => render_browse(state, &mut out),
        Route::Account => render_account(state, &mut out),
    }
    out
}

fn render_signed_out(state: &AppState, out: &mut String) {
    if state.auth_pending.is_some() {
        out.push_str("Signing in...\n");
    } else {
        out.push_str("Not signed in. Use `login` or `register`.\n");
    }
}

fn render_profiles(state: &AppState, out: &mut String) {
    out.push_str("Who is watching?\n");
    match state.profiles.profiles.state() {
        PromiseState::Deferred => out.push_str("  loading profiles...\n"),
        PromiseState::Rejected => out.push_str("  profiles are unavailable\n"),
        PromiseState::Empty | PromiseState::Resolved => {
            for (i, profile) in state.profiles.list().iter().enumerate() {
                let lock = if profile.is_protected() { " (PIN)" } else { "" };
                let _ = writeln!(out, "  {}. {}{}", i + 1, profile.name, lock);
            }
        }
    }
    match &state.profiles.prompt {
        PinPrompt::Closed => {}
        PinPrompt::Required(profile) => {
            let _ = writeln!(out, "PIN for {}: use `profile <n> <pin>`", profile.name);
        }
        PinPrompt::Validating { profile, .. } => {
            let _ = writeln!(out, "Checking PIN for {}...", profile.name);
        }
    }
}

fn render_browse(state: &AppState, out: &mut String) {
    if let Some(profile) = &state.active_profile {
        let _ = writeln!(out, "Watching as {}", profile.name);
    }
    if state.catalog.pending.is_some() {
        out.push_str("Loading catalog...\n");
    }
    if let (Some(item), Some(index)) = (state.featured(), state.hero.current()) {
        let _ = writeln!(
            out,
            "Featured {}/{}: {}",
            index + 1,
            state.catalog.catalog.featured.len(),
            item.name
        );
    }
    for (i, shelf) in state.catalog.catalog.shelves.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({})", i + 1, shelf.title, shelf.items.len());
        for (j, item) in shelf.items.iter().enumerate() {
            let _ = writeln!(out, "   {}. {}", j + 1, item.name);
        }
    }
    match &state.focus {
        Focus::None => {}
        Focus::Detail(view) => {
            let _ = writeln!(out, "== {} ==", view.item.name);
            let _ = writeln!(out, "{}", view.description());
            if view.favorited {
                out.push_str("(in your favorites)\n");
            }
            out.push_str("`play` to watch, `favorite`, `close`\n");
        }
        Focus::Player(session) => {
            let status = match session.state() {
                PlaybackState::Resolving => "unavailable",
                PlaybackState::Ready { attached: true } => "ready",
                PlaybackState::Ready { attached: false } => "not attached, `play` to retry",
                PlaybackState::Playing => "playing",
                PlaybackState::Paused => "paused",
                PlaybackState::Closed => "closed",
            };
            let _ = writeln!(out, "> {} [{}]", session.item().name, status);
            if let Some(url) = session.url() {
                let _ = writeln!(out, "  {}", url);
            }
        }
    }
}

fn render_account(state: &AppState, out: &mut String) {
    if let Some(identity) = &state.identity {
        let _ = writeln!(out, "Account: {} <{}>", identity.name, identity.email);
        if !identity.avatar.is_empty() {
            let _ = writeln!(out, "Avatar: {}", identity.avatar);
        }
    }
    if let Some(avatar) = &state.account.avatar {
        let _ = writeln!(out, "Chosen avatar: {avatar}");
    }
    if state.account.pending.is_some() {
        out.push_str("Saving...\n");
    }
    for category in AvatarCategory::ALL {
        let visible = state.avatars.visible(category);
        if visible.is_empty() {
            continue;
        }
        let more = if state.avatars.has_more(category) {
            ", `more` for the rest"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{} avatars ({} of {}{}):",
            category,
            visible.len(),
            state.avatars.names(category).len(),
            more
        );
        for (i, name) in visible.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, name);
        }
    }
}
