//! Plain-text rendering of the console views.

use crate::{
    api::AppError,
    features::{
        admin::{ActivityFilter, AdminDashboard, User, UserFilter},
        me::{LoginRecord, Profile},
    },
};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// What the console is showing, with the data it loaded on mount.
#[derive(Debug)]
pub enum View {
    Blank,
    Login,
    Register,
    NotFound(String),
    Failed(String),
    Dashboard {
        profile: Profile,
        history: Vec<LoginRecord>,
        admin: Option<AdminDashboard>,
    },
    Profile(Profile),
    Admin {
        stats: AdminDashboard,
        newest_users: Vec<User>,
        newest_logins: Vec<LoginRecord>,
    },
    Users {
        filter: UserFilter,
        users: Vec<User>,
    },
    UserForm {
        editing: Option<User>,
    },
    Activities {
        filter: ActivityFilter,
        rows: Vec<LoginRecord>,
    },
}

/// Inline message for a list that failed to load.
#[must_use]
pub fn load_error(err: &AppError, what: &str) -> String {
    if err.status() == Some(500) {
        return format!("Server error occurred while fetching {what}");
    }
    err.detail()
        .map_or_else(|| format!("Failed to load {what}"), ToString::to_string)
}

fn when(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

fn date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

#[must_use]
pub fn render(view: &View) -> String {
    let mut out = String::new();
    match view {
        View::Blank => {}
        View::Login => {
            let _ = writeln!(out, "== Login ==");
            let _ = writeln!(out, "login <email> <password>   (or `go /register`)");
        }
        View::Register => {
            let _ = writeln!(out, "== Register ==");
            let _ = writeln!(
                out,
                "register <email> <password> <confirm> [--username NAME] [--role user|admin]"
            );
        }
        View::NotFound(path) => {
            let _ = writeln!(out, "No view at {path}");
        }
        View::Failed(message) => {
            let _ = writeln!(out, "{message}");
        }
        View::Dashboard {
            profile,
            history,
            admin,
        } => {
            let _ = writeln!(out, "== Dashboard ==");
            profile_lines(&mut out, profile);
            let _ = writeln!(out, "-- Login history --");
            login_lines(&mut out, history);
            if let Some(admin) = admin {
                let _ = writeln!(out, "-- Admin overview --");
                counts(&mut out, admin);
            }
        }
        View::Profile(profile) => {
            let _ = writeln!(out, "== Profile ==");
            profile_lines(&mut out, profile);
            let _ = writeln!(out, "update [--email EMAIL] [--username NAME]");
            let _ = writeln!(out, "password <old> <new> <confirm>");
        }
        View::Admin {
            stats,
            newest_users,
            newest_logins,
        } => {
            let _ = writeln!(out, "== Admin ==");
            counts(&mut out, stats);
            let _ = writeln!(out, "-- Newest users --");
            user_lines(&mut out, newest_users);
            let _ = writeln!(out, "-- Recent logins --");
            login_lines(&mut out, newest_logins);
        }
        View::Users { filter, users } => {
            let _ = writeln!(out, "== Users ==");
            if !filter.to_params().is_empty() {
                let _ = writeln!(out, "filter: {}", describe(filter));
            }
            user_lines(&mut out, users);
        }
        View::UserForm { editing } => match editing {
            Some(user) => {
                let _ = writeln!(out, "== Edit user #{} ==", user.id);
                let _ = writeln!(out, "email: {}", user.email);
                let _ = writeln!(out, "username: {}", or_dash(user.username.as_deref()));
                let _ = writeln!(out, "role: {}", user.role);
                let _ = writeln!(out, "active: {}", user.is_active);
                let _ = writeln!(
                    out,
                    "save [--email ..] [--username ..] [--role ..] [--active ..] [--password P --confirm P]"
                );
            }
            None => {
                let _ = writeln!(out, "== Create user ==");
                let _ = writeln!(
                    out,
                    "save --email EMAIL --password P --confirm P [--username ..] [--role ..] [--active ..]"
                );
            }
        },
        View::Activities { rows, .. } => {
            let _ = writeln!(out, "== Login activities ==");
            login_lines(&mut out, rows);
        }
    }
    out
}

fn profile_lines(out: &mut String, profile: &Profile) {
    let _ = writeln!(out, "email: {}", profile.email);
    let _ = writeln!(out, "username: {}", or_dash(profile.username.as_deref()));
    let _ = writeln!(out, "role: {}", profile.role);
    let _ = writeln!(out, "member since: {}", date(&profile.created_at));
}

fn counts(out: &mut String, stats: &AdminDashboard) {
    let _ = writeln!(
        out,
        "users: {}  admins: {}  regular: {}",
        stats.total_users, stats.total_admins, stats.total_regular_users
    );
}

fn user_lines(out: &mut String, users: &[User]) {
    if users.is_empty() {
        let _ = writeln!(out, "(no users)");
        return;
    }
    for user in users {
        let _ = writeln!(
            out,
            "#{:<5} {:<30} {:<16} {:<6} {:<8} joined {}",
            user.id,
            user.email,
            or_dash(user.username.as_deref()),
            user.role,
            if user.is_active { "active" } else { "inactive" },
            date(&user.created_at),
        );
    }
}

fn login_lines(out: &mut String, records: &[LoginRecord]) {
    if records.is_empty() {
        let _ = writeln!(out, "(no logins)");
        return;
    }
    for record in records {
        let _ = writeln!(
            out,
            "{}  {:<30} {}",
            when(&record.timestamp),
            record.user_email,
            or_dash(record.ip_address.as_deref()),
        );
    }
}

fn describe(filter: &UserFilter) -> String {
    filter
        .to_params()
        .as_pairs()
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}
