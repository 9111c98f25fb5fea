use itertools::Itertools;
use streamify_core::session::AccountForm;

use crate::{
    cmd::Command,
    data::{AvatarCategory, ItemRef},
};

pub const HELP: &str = "\
commands:
  login <email> <password>            register <email> <password> <name>
  logout                              account | back
  update name=.. email=.. avatar=.. password=..
  profiles                            profile <n> [pin]
  new-profile <name>                  cancel
  catalog                             hero
  open <shelf> <n> | open hero <n>    close
  favorite                            play | pause | toggle | stop | esc
  avatars                             more <perfil|perfix>
  choose <perfil|perfix> <n>          dismiss <alert>
  quit";

/// Parse one input line.  `Ok(None)` for blank lines.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let words = line.split_whitespace().collect_vec();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };
    let cmd = match (name, args) {
        ("login", [email, password]) => Command::Login {
            email: email.to_string(),
            password: password.to_string(),
        },
        ("register", [email, password, name @ ..]) if !name.is_empty() => Command::Register {
            name: name.iter().join(" "),
            email: email.to_string(),
            password: password.to_string(),
        },
        ("logout", []) => Command::Logout,
        ("account", []) => Command::OpenAccount,
        ("back", []) => Command::CloseAccount,
        ("update", fields) if !fields.is_empty() => Command::UpdateAccount(account_form(fields)?),
        ("profiles", []) => Command::LoadProfiles,
        ("profile", [n]) => Command::SelectProfile {
            index: position(n)?,
            pin: None,
        },
        ("profile", [n, pin]) => Command::SelectProfile {
            index: position(n)?,
            pin: Some(pin.to_string()),
        },
        ("new-profile", name) if !name.is_empty() => Command::CreateProfile {
            name: name.iter().join(" "),
        },
        ("cancel", []) => Command::CancelPin,
        ("catalog", []) => Command::LoadCatalog,
        ("hero", []) => Command::SelectHero,
        ("open", ["hero", n]) => Command::OpenDetail(ItemRef::Featured(position(n)?)),
        ("open", [shelf, n]) => Command::OpenDetail(ItemRef::Shelf {
            shelf: position(shelf)?,
            index: position(n)?,
        }),
        ("close", []) => Command::CloseDetail,
        ("favorite" | "fav", []) => Command::Favorite,
        ("play", []) => Command::Play,
        ("pause", []) => Command::Pause,
        ("toggle", []) => Command::TogglePlayback,
        ("stop", []) => Command::ClosePlayer,
        ("esc", []) => Command::Dismiss,
        ("avatars", []) => Command::LoadAvatars,
        ("more", [category]) => Command::LoadMoreAvatars(category_of(category)?),
        ("choose", [category, n]) => Command::ChooseAvatar {
            category: category_of(category)?,
            index: position(n)?,
        },
        ("dismiss", [id]) => Command::DismissAlert(
            id.parse()
                .map_err(|_| format!("not an alert number: {id}"))?,
        ),
        ("quit" | "exit" | "q", []) => Command::Quit,
        _ => return Err(format!("unknown command: {}\n{}", line.trim(), HELP)),
    };
    Ok(Some(cmd))
}

/// 1-based position as typed, 0-based index as used.
fn position(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("not a position: {word}")),
    }
}

fn category_of(word: &str) -> Result<AvatarCategory, String> {
    word.parse()
        .map_err(|_| format!("unknown avatar category: {word}"))
}

fn account_form(fields: &[&str]) -> Result<AccountForm, String> {
    let mut form = AccountForm::default();
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            return Err(format!("expected key=value, got {field}"));
        };
        let slot = match key {
            "name" => &mut form.name,
            "email" => &mut form.email,
            "avatar" => &mut form.avatar,
            "password" => &mut form.password,
            _ => return Err(format!("unknown account field: {key}")),
        };
        *slot = value.to_string();
    }
    Ok(form)
}
