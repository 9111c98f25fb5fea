use streamify_core::{
    error::Error,
    session::{AccountForm, Identity},
    webapi::{AccountUpdate, Credentials, Registration},
};

use crate::{
    cmd::Event,
    data::{RequestId, Route},
    delegate::Delegate,
};

fn required(value: String, field: &'static str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::Validation(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn password(value: String) -> Result<String, Error> {
    if value.is_empty() {
        Err(Error::Validation("password"))
    } else {
        Ok(value)
    }
}

fn credentials(email: String, secret: String) -> Result<Credentials, Error> {
    Ok(Credentials {
        email: required(email, "email")?,
        password: password(secret)?,
    })
}

fn registration(name: String, email: String, secret: String) -> Result<Registration, Error> {
    Ok(Registration {
        name: required(name, "name")?,
        email: required(email, "email")?,
        password: password(secret)?,
    })
}

impl Delegate {
    pub(crate) fn login(&mut self, email: String, password: String) {
        let credentials = match credentials(email, password) {
            Ok(credentials) => credentials,
            Err(err) => {
                self.state.error_alert(&err);
                return;
            }
        };
        let key = self.state.next_request();
        self.state.auth_pending = Some(key);
        log::info!("signing in as {}", credentials.email);
        self.spawn(move |backend| Event::LoggedIn {
            key,
            result: backend.login(&credentials),
        });
    }

    /// Create the account, then sign in with the same credentials.
    pub(crate) fn register(&mut self, name: String, email: String, password: String) {
        let registration = match registration(name, email, password) {
            Ok(registration) => registration,
            Err(err) => {
                self.state.error_alert(&err);
                return;
            }
        };
        let key = self.state.next_request();
        self.state.auth_pending = Some(key);
        log::info!("registering {}", registration.email);
        self.spawn(move |backend| Event::LoggedIn {
            key,
            result: backend
                .register(&registration)
                .and_then(|_| backend.login(&registration.credentials())),
        });
    }

    pub(crate) fn logged_in(&mut self, key: RequestId, result: Result<Identity, Error>) {
        if self.state.auth_pending != Some(key) {
            log::info!("discarding stale sign-in result {}", key);
            return;
        }
        self.state.auth_pending = None;
        let identity = match result {
            Ok(identity) => identity,
            Err(err) => {
                log::error!("sign-in failed: {}", err);
                self.state.error_alert(&err);
                return;
            }
        };
        if let Err(err) = self.session.sign_in(identity) {
            log::error!("failed to persist session: {}", err);
            self.state.error_alert(&err);
            return;
        }
        self.refresh_session();
        if let Some(identity) = &self.state.identity {
            let greeting = format!("Welcome, {}!", identity.name);
            self.state.info_alert(greeting);
        }
        self.state.route = Route::ProfileSelect;
        self.load_profiles();
    }

    pub(crate) fn logout(&mut self) {
        self.stop_hero();
        if let Err(err) = self.session.clear() {
            log::error!("failed to remove persisted session: {}", err);
            self.state.error_alert(&err);
        }
        self.state.sign_out();
        self.refresh_session();
        log::info!("signed out");
    }

    pub(crate) fn open_account(&mut self) {
        if !self.session.is_signed_in() {
            self.state.error_alert(&Error::NotSignedIn);
            return;
        }
        self.state.route = Route::Account;
        if self.state.avatars.sets.resolved().is_none() {
            self.load_avatars();
        }
    }

    pub(crate) fn close_account(&mut self) {
        self.state.account.avatar = None;
        self.state.route = if self.state.active_profile.is_some() {
            Route::Browse
        } else if self.state.identity.is_some() {
            Route::ProfileSelect
        } else {
            Route::SignedOut
        };
    }

    /// Submit the changed fields of `form`.  An empty diff never reaches the
    /// backend.
    pub(crate) fn update_account(&mut self, mut form: AccountForm) {
        if form.avatar.trim().is_empty() {
            if let Some(avatar) = &self.state.account.avatar {
                form.avatar = avatar.clone();
            }
        }
        let update = match self.session.diff(&form) {
            Ok(update) => update,
            Err(err) => {
                self.state.error_alert(&err);
                return;
            }
        };
        let Some(token) = self.token() else {
            return;
        };
        let key = self.state.next_request();
        self.state.account.pending = Some(key);
        self.spawn(move |backend| {
            let result = backend.update_account(&token, &update);
            Event::AccountUpdated {
                key,
                update,
                result,
            }
        });
    }

    pub(crate) fn account_updated(
        &mut self,
        key: RequestId,
        update: AccountUpdate,
        result: Result<(), Error>,
    ) {
        if self.state.account.pending != Some(key) {
            log::info!("discarding stale account update {}", key);
            return;
        }
        self.state.account.pending = None;
        if let Err(err) = result.and_then(|_| self.session.apply(&update)) {
            log::error!("account update failed: {}", err);
            self.state.error_alert(&err);
            return;
        }
        self.refresh_session();
        self.state.account.avatar = None;
        self.state.info_alert("Account updated.");
    }
}
