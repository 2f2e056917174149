//! Interactive console. Each route maps to a view; protected views mount the
//! guard first and load their data only when access is allowed. Commands that
//! change routes go through the shared navigator, and the console follows it
//! after every command so a 401 redirect and a guard redirect land once.

pub mod commands;
pub mod views;

use crate::{
    api::AppError,
    features::{
        admin::{ActivityFilter, UserDraft, UserFilter},
        auth::RegisterRequest,
        me::{PasswordChange, ProfileUpdate},
        validation,
    },
    guard::Guard,
    navigation::{Navigator, Route},
    service::SessionService,
    session::Role,
};
use commands::{FormInput, Input};
use secrecy::SecretString;
use std::{collections::HashSet, fmt::Write};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};
use ulid::Ulid;
use views::View;

/// Upper bound on redirects followed after a single command.
const MAX_REDIRECTS: usize = 4;
const NEWEST_USERS: usize = 5;
const NEWEST_LOGINS: usize = 10;

/// Output of one console command.
#[derive(Debug, Default)]
pub struct Reply {
    pub output: String,
    pub quit: bool,
}

pub struct Console {
    service: SessionService,
    navigator: Navigator,
    guard: Guard,
    shown: Option<Route>,
    view: View,
    seen: HashSet<Ulid>,
}

impl Console {
    #[must_use]
    pub fn new(service: SessionService, navigator: Navigator) -> Self {
        let guard = Guard::new(service.clone(), navigator.clone());
        Self {
            service,
            navigator,
            guard,
            shown: None,
            view: View::Blank,
            seen: HashSet::new(),
        }
    }

    /// Route of the view currently on screen.
    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        self.shown.as_ref()
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Re-checks the cached session, then opens `initial` (or the dashboard
    /// when a session is still alive).
    pub async fn start(&mut self, initial: Option<Route>) -> String {
        let session = self.service.session().clone();
        let restored = match session.init(self.service.api()).await {
            Ok(restored) => restored,
            Err(err) => {
                warn!("Session probe failed: {err}");
                session.get()
            }
        };

        let target = initial.unwrap_or(if restored.is_some() {
            Route::Dashboard
        } else {
            Route::Login
        });
        self.navigator.navigate(target);

        let mut output = String::new();
        self.settle(&mut output).await;
        output.push_str(&self.new_toasts());
        output
    }

    /// Runs one input line and follows any redirect it caused.
    pub async fn execute(&mut self, line: &str) -> Reply {
        let mut reply = Reply::default();

        match commands::parse(line) {
            Ok(None) => return reply,
            Ok(Some(Input::Quit)) => {
                reply.quit = true;
                return reply;
            }
            Ok(Some(input)) => {
                let message = self.dispatch(input).await;
                reply.output.push_str(&message);
            }
            Err(rendered) => reply.output.push_str(&rendered),
        }

        self.settle(&mut reply.output).await;
        reply.output.push_str(&self.new_toasts());
        reply
    }

    /// Reads commands from stdin until `quit` or end of input.
    ///
    /// # Errors
    /// Returns an error if stdin or stdout fails.
    pub async fn run(mut self, initial: Option<Route>) -> std::io::Result<()> {
        let mut stdout = io::stdout();
        let mut lines = BufReader::new(io::stdin()).lines();

        let banner = self.start(initial).await;
        stdout.write_all(banner.as_bytes()).await?;

        loop {
            let prompt = format!("{}> ", self.shown.as_ref().map_or_else(String::new, Route::path));
            stdout.write_all(prompt.as_bytes()).await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let reply = self.execute(&line).await;
            stdout.write_all(reply.output.as_bytes()).await?;
            if reply.quit {
                break;
            }
        }

        stdout.flush().await
    }

    async fn settle(&mut self, output: &mut String) {
        for _ in 0..MAX_REDIRECTS {
            let target = self.navigator.current();
            if self.shown.as_ref() == Some(&target) {
                return;
            }
            let rendered = self.mount(target).await;
            output.push_str(&rendered);
        }
        warn!("redirect limit reached");
    }

    async fn mount(&mut self, route: Route) -> String {
        debug!(route = %route, "mount");
        self.shown = Some(route.clone());

        if let Some(access) = route.access() {
            let decision = self.guard.mount(access).resolve().await;
            if !decision.is_allowed() {
                self.view = View::Blank;
                return String::new();
            }
        }

        self.view = self.load(&route).await;
        views::render(&self.view)
    }

    async fn load(&self, route: &Route) -> View {
        match route {
            Route::Root | Route::Login => View::Login,
            Route::Register => View::Register,
            Route::NotFound(path) => View::NotFound(path.clone()),
            Route::Dashboard => self.load_dashboard().await,
            Route::Profile => match self.service.profile().await {
                Ok(profile) => View::Profile(profile),
                Err(_) => View::Failed("Failed to load profile".to_string()),
            },
            Route::Admin => self.load_admin().await,
            Route::AdminUsers => self.load_users(UserFilter::default()).await,
            Route::AdminUserCreate => View::UserForm { editing: None },
            Route::AdminUserEdit(id) => match self.service.user(*id).await {
                Ok(user) => View::UserForm {
                    editing: Some(user),
                },
                Err(_) => View::Failed(format!("Failed to load user #{id}")),
            },
            Route::AdminLoginActivities => self.load_activities(ActivityFilter::default()).await,
        }
    }

    async fn load_dashboard(&self) -> View {
        let result: Result<View, AppError> = async {
            let profile = self.service.profile().await?;
            let history = self.service.login_history().await?;
            let admin = if profile.role.is_admin() {
                Some(self.service.admin_dashboard().await?)
            } else {
                None
            };
            Ok(View::Dashboard {
                profile,
                history,
                admin,
            })
        }
        .await;

        result.unwrap_or_else(|_| View::Failed("Failed to load dashboard".to_string()))
    }

    async fn load_admin(&self) -> View {
        let users_filter = UserFilter {
            ordering: Some("-created_at".to_string()),
            ..UserFilter::default()
        };
        let activity_filter = ActivityFilter {
            ordering: Some("-timestamp".to_string()),
            ..ActivityFilter::default()
        };

        let loaded = tokio::try_join!(
            self.service.admin_dashboard(),
            self.service.users(&users_filter),
            self.service.login_activities(&activity_filter),
        );

        match loaded {
            Ok((stats, mut newest_users, mut newest_logins)) => {
                newest_users.truncate(NEWEST_USERS);
                newest_logins.truncate(NEWEST_LOGINS);
                View::Admin {
                    stats,
                    newest_users,
                    newest_logins,
                }
            }
            Err(_) => View::Failed("Failed to load admin dashboard".to_string()),
        }
    }

    async fn load_users(&self, filter: UserFilter) -> View {
        match self.service.users(&filter).await {
            Ok(users) => View::Users { filter, users },
            Err(err) => View::Failed(views::load_error(&err, "users")),
        }
    }

    async fn load_activities(&self, filter: ActivityFilter) -> View {
        match self.service.login_activities(&filter).await {
            Ok(rows) => View::Activities { filter, rows },
            Err(err) => View::Failed(views::load_error(&err, "login activities")),
        }
    }

    /// Forces the current route to mount again.
    fn remount(&mut self) {
        self.shown = None;
    }

    async fn dispatch(&mut self, input: Input) -> String {
        match input {
            Input::Quit => String::new(),
            Input::Help => commands::help(),
            Input::Go(route) => {
                self.remount();
                self.navigator.navigate(route);
                String::new()
            }
            Input::Refresh => {
                self.remount();
                String::new()
            }
            Input::Toasts => {
                self.seen.clear();
                String::new()
            }
            Input::Dismiss => {
                self.service.notifier().clear();
                String::new()
            }
            Input::Logout => self.logout().await,
            Input::Login { email, password } => self.login(&email, &password).await,
            Input::Register {
                email,
                username,
                password,
                confirm,
                role,
            } => self.register(email, username, password, &confirm, role).await,
            Input::UpdateProfile { email, username } => self.update_profile(email, username).await,
            Input::ChangePassword { old, new, confirm } => {
                self.change_password(old, new, confirm).await
            }
            Input::Users(filter) => self.search_users(filter).await,
            Input::Delete { id, confirmed } => self.delete_user(id, confirmed).await,
            Input::Save(form) => self.save_user(form).await,
            Input::Activities(filter) => self.search_activities(filter).await,
            Input::Reset => self.reset().await,
        }
    }

    fn unavailable(&self) -> String {
        let here = self.shown.as_ref().map_or_else(String::new, Route::path);
        format!("Not available on {here}\n")
    }

    async fn logout(&mut self) -> String {
        if self.service.logout().await.is_ok() {
            self.service.notifier().success("Logged out successfully", None);
            self.navigator.navigate(Route::Login);
        }
        String::new()
    }

    async fn login(&mut self, email: &str, password: &SecretString) -> String {
        if !matches!(self.view, View::Login) {
            return self.unavailable();
        }
        if self.service.login(email, password).await.is_ok() {
            self.service
                .notifier()
                .success("Login successful! Redirecting...", None);
            self.navigator.navigate(Route::Dashboard);
        }
        String::new()
    }

    async fn register(
        &mut self,
        email: String,
        username: Option<String>,
        password: SecretString,
        confirm: &SecretString,
        role: Option<Role>,
    ) -> String {
        if !matches!(self.view, View::Register) {
            return self.unavailable();
        }
        if let Err(err) = validation::validate_registration(&email, &password, confirm) {
            return format!("{err}\n");
        }

        let request = RegisterRequest {
            email,
            username,
            password,
            role,
        };
        match self.service.register(&request).await {
            Ok(_) => {
                self.service
                    .notifier()
                    .success("Registration successful! Please login.", None);
                self.navigator.navigate(Route::Login);
                String::new()
            }
            Err(err) => {
                let mut inline = String::new();
                for problem in err.field_errors() {
                    let _ = writeln!(inline, "{problem}");
                }
                inline
            }
        }
    }

    async fn update_profile(&mut self, email: Option<String>, username: Option<String>) -> String {
        if !matches!(self.view, View::Profile(_)) {
            return self.unavailable();
        }
        let update = ProfileUpdate { email, username };
        if update.is_empty() {
            return "Nothing to update\n".to_string();
        }

        if let Ok(profile) = self.service.update_profile(&update).await {
            self.service
                .notifier()
                .success("Profile updated successfully!", None);
            self.view = View::Profile(profile);
            return views::render(&self.view);
        }
        String::new()
    }

    async fn change_password(
        &mut self,
        old: SecretString,
        new: SecretString,
        confirm: SecretString,
    ) -> String {
        if !matches!(self.view, View::Profile(_)) {
            return self.unavailable();
        }
        if let Err(err) = validation::validate_password_change(&new, &confirm) {
            self.service.notifier().error(err.to_string(), None);
            return String::new();
        }

        let change = PasswordChange {
            old_password: old,
            new_password: new,
            confirm_password: confirm,
        };
        if self.service.change_password(&change).await.is_ok() {
            self.service
                .notifier()
                .success("Password changed successfully!", None);
        }
        String::new()
    }

    async fn search_users(&mut self, filter: UserFilter) -> String {
        if !matches!(self.view, View::Users { .. } | View::Failed(_))
            || self.shown != Some(Route::AdminUsers)
        {
            return self.unavailable();
        }
        self.view = self.load_users(filter).await;
        views::render(&self.view)
    }

    async fn delete_user(&mut self, id: u64, confirmed: bool) -> String {
        let View::Users { users, .. } = &self.view else {
            return self.unavailable();
        };
        let email = users
            .iter()
            .find(|user| user.id == id)
            .map_or_else(|| format!("#{id}"), |user| user.email.clone());

        if !confirmed {
            return format!(
                "Are you sure you want to delete user: {email}? Re-run with --yes to confirm.\n"
            );
        }

        if self.service.delete_user(id).await.is_err() {
            return String::new();
        }

        if let View::Users { users, .. } = &mut self.view {
            users.retain(|user| user.id != id);
        }
        self.service
            .notifier()
            .success(format!("User {email} deleted successfully"), None);
        views::render(&self.view)
    }

    async fn save_user(&mut self, form: FormInput) -> String {
        let View::UserForm { editing } = &self.view else {
            return self.unavailable();
        };

        let editing_id = editing.as_ref().map(|user| user.id);
        let mut draft = editing.as_ref().map_or_else(
            || UserDraft {
                email: String::new(),
                username: None,
                role: Role::User,
                is_active: true,
                password: None,
            },
            UserDraft::from_user,
        );

        if let Some(email) = form.email {
            draft.email = email;
        }
        if let Some(username) = form.username {
            draft.username = Some(username);
        }
        if let Some(role) = form.role {
            draft.role = role;
        }
        if let Some(active) = form.active {
            draft.is_active = active;
        }

        if let Err(err) = validation::validate_user_form(
            &draft.email,
            form.password.as_ref(),
            form.confirm.as_ref(),
            editing_id.is_some(),
        )
        .and_then(|()| draft.check_role())
        {
            self.service.notifier().error(err.to_string(), None);
            return String::new();
        }
        draft.password = form.password;

        let saved = match editing_id {
            Some(id) => self
                .service
                .update_user(id, &draft)
                .await
                .map(|_| "User updated successfully!"),
            None => self
                .service
                .create_user(&draft)
                .await
                .map(|_| "User created successfully!"),
        };

        if let Ok(message) = saved {
            self.service.notifier().success(message, None);
            self.navigator.navigate(Route::AdminUsers);
        }
        String::new()
    }

    async fn search_activities(&mut self, filter: ActivityFilter) -> String {
        if self.shown != Some(Route::AdminLoginActivities) || matches!(self.view, View::Blank) {
            return self.unavailable();
        }
        self.view = self.load_activities(filter).await;
        views::render(&self.view)
    }

    async fn reset(&mut self) -> String {
        match self.shown.clone() {
            Some(Route::AdminUsers) => self.search_users(UserFilter::default()).await,
            Some(Route::AdminLoginActivities) => {
                self.search_activities(ActivityFilter::default()).await
            }
            _ => self.unavailable(),
        }
    }

    /// Notifications added since the last command, oldest first.
    fn new_toasts(&mut self) -> String {
        let active = self.service.notifier().snapshot();
        self.seen
            .retain(|id| active.iter().any(|notification| notification.id == *id));

        let mut out = String::new();
        for notification in active {
            if self.seen.insert(notification.id) {
                let _ = writeln!(out, "[{}] {}", notification.kind, notification.message);
            }
        }
        out
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Console")
            .field("shown", &self.shown)
            .finish_non_exhaustive()
    }
}
