//! Line commands understood by the console. Each input line is split on
//! whitespace and parsed with clap, so every command gets `-h` for free.

use crate::{
    features::admin::{ActivityFilter, UserFilter},
    navigation::Route,
    session::Role,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

#[derive(Debug)]
pub enum Input {
    Help,
    Quit,
    Go(Route),
    Refresh,
    Toasts,
    Dismiss,
    Logout,
    Login {
        email: String,
        password: SecretString,
    },
    Register {
        email: String,
        username: Option<String>,
        password: SecretString,
        confirm: SecretString,
        role: Option<Role>,
    },
    UpdateProfile {
        email: Option<String>,
        username: Option<String>,
    },
    ChangePassword {
        old: SecretString,
        new: SecretString,
        confirm: SecretString,
    },
    Users(UserFilter),
    Delete {
        id: u64,
        confirmed: bool,
    },
    Save(FormInput),
    Activities(ActivityFilter),
    Reset,
}

/// Fields typed into the user form; unset fields keep the loaded values.
#[derive(Debug, Default)]
pub struct FormInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub password: Option<SecretString>,
    pub confirm: Option<SecretString>,
}

#[must_use]
pub fn new() -> Command {
    Command::new("goldenlock")
        .no_binary_name(true)
        .disable_help_subcommand(true)
        .disable_version_flag(true)
        .subcommand_required(true)
        .subcommand(Command::new("help").about("List commands"))
        .subcommand(Command::new("quit").alias("exit").about("Leave the console"))
        .subcommand(
            Command::new("go")
                .about("Open a view, e.g. /dashboard or /admin/users/edit/7")
                .arg(Arg::new("path").required(true)),
        )
        .subcommand(Command::new("refresh").about("Reload the current view"))
        .subcommand(Command::new("toasts").about("Show active notifications"))
        .subcommand(Command::new("dismiss").about("Dismiss all notifications"))
        .subcommand(Command::new("logout").about("End the session"))
        .subcommand(
            Command::new("login")
                .about("Sign in")
                .arg(Arg::new("email").required(true))
                .arg(Arg::new("password").required(true)),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account")
                .arg(Arg::new("email").required(true))
                .arg(Arg::new("password").required(true))
                .arg(Arg::new("confirm").required(true))
                .arg(Arg::new("username").long("username"))
                .arg(role_arg()),
        )
        .subcommand(
            Command::new("update")
                .about("Update profile email and/or username")
                .arg(Arg::new("email").long("email"))
                .arg(Arg::new("username").long("username")),
        )
        .subcommand(
            Command::new("password")
                .about("Change password")
                .arg(Arg::new("old").required(true))
                .arg(Arg::new("new").required(true))
                .arg(Arg::new("confirm").required(true)),
        )
        .subcommand(
            Command::new("users")
                .about("Search users")
                .arg(Arg::new("search").long("search").num_args(1..))
                .arg(
                    Arg::new("role")
                        .long("role")
                        .value_parser(["all", "admin", "user"])
                        .default_value("all"),
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_parser(["all", "active", "inactive"])
                        .default_value("all"),
                )
                .arg(Arg::new("ordering").long("ordering")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a user")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::SetTrue)
                        .help("Confirm the deletion"),
                ),
        )
        .subcommand(
            Command::new("save")
                .about("Submit the user form")
                .arg(Arg::new("email").long("email"))
                .arg(Arg::new("username").long("username"))
                .arg(role_arg())
                .arg(
                    Arg::new("active")
                        .long("active")
                        .value_parser(clap::value_parser!(bool)),
                )
                .arg(Arg::new("password").long("password"))
                .arg(Arg::new("confirm").long("confirm")),
        )
        .subcommand(
            Command::new("activities")
                .about("Filter login activities")
                .arg(Arg::new("user-id").long("user-id"))
                .arg(Arg::new("start-date").long("start-date"))
                .arg(Arg::new("end-date").long("end-date"))
                .arg(Arg::new("ordering").long("ordering")),
        )
        .subcommand(Command::new("reset").about("Clear the current filters"))
}

fn role_arg() -> Arg {
    Arg::new("role")
        .long("role")
        .value_parser(["admin", "user"])
}

/// Parses one input line. Blank lines yield `Ok(None)`; clap errors (including
/// `-h` output) come back rendered.
///
/// # Errors
/// Returns the rendered clap message when the line does not parse.
pub fn parse(line: &str) -> Result<Option<Input>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }

    let matches = new()
        .try_get_matches_from(words)
        .map_err(|err| err.render().to_string())?;

    let Some((name, sub)) = matches.subcommand() else {
        return Err("missing command".to_string());
    };

    let input = match name {
        "help" => Input::Help,
        "quit" => Input::Quit,
        "go" => Input::Go(Route::parse(&string(sub, "path").unwrap_or_default())),
        "refresh" => Input::Refresh,
        "toasts" => Input::Toasts,
        "dismiss" => Input::Dismiss,
        "logout" => Input::Logout,
        "login" => Input::Login {
            email: string(sub, "email").unwrap_or_default(),
            password: secret(sub, "password").unwrap_or_default(),
        },
        "register" => Input::Register {
            email: string(sub, "email").unwrap_or_default(),
            username: string(sub, "username"),
            password: secret(sub, "password").unwrap_or_default(),
            confirm: secret(sub, "confirm").unwrap_or_default(),
            role: role(sub),
        },
        "update" => Input::UpdateProfile {
            email: string(sub, "email"),
            username: string(sub, "username"),
        },
        "password" => Input::ChangePassword {
            old: secret(sub, "old").unwrap_or_default(),
            new: secret(sub, "new").unwrap_or_default(),
            confirm: secret(sub, "confirm").unwrap_or_default(),
        },
        "users" => Input::Users(UserFilter {
            search: sub
                .get_many::<String>("search")
                .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
                .unwrap_or_default(),
            role: string(sub, "role").and_then(|value| UserFilter::parse_role(&value)),
            active: string(sub, "status").and_then(|value| UserFilter::parse_status(&value)),
            ordering: string(sub, "ordering"),
        }),
        "delete" => Input::Delete {
            id: sub.get_one::<u64>("id").copied().unwrap_or_default(),
            confirmed: sub.get_flag("yes"),
        },
        "save" => Input::Save(FormInput {
            email: string(sub, "email"),
            username: string(sub, "username"),
            role: role(sub),
            active: sub.get_one::<bool>("active").copied(),
            password: secret(sub, "password"),
            confirm: secret(sub, "confirm"),
        }),
        "activities" => Input::Activities(ActivityFilter {
            user_id: string(sub, "user-id").unwrap_or_default(),
            start_date: string(sub, "start-date").unwrap_or_default(),
            end_date: string(sub, "end-date").unwrap_or_default(),
            ordering: string(sub, "ordering"),
        }),
        "reset" => Input::Reset,
        other => return Err(format!("unknown command: {other}")),
    };

    Ok(Some(input))
}

/// Renders the command list shown by `help`.
#[must_use]
pub fn help() -> String {
    new().render_help().to_string()
}

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn secret(matches: &ArgMatches, id: &str) -> Option<SecretString> {
    string(matches, id).map(SecretString::from)
}

fn role(matches: &ArgMatches) -> Option<Role> {
    string(matches, "role").and_then(|value| UserFilter::parse_role(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn blank_line_is_ignored() {
        assert!(matches!(parse("   "), Ok(None)));
    }

    #[test]
    fn go_parses_route() {
        let Ok(Some(Input::Go(route))) = parse("go /admin/users/edit/9") else {
            panic!("expected go");
        };
        assert_eq!(route, Route::AdminUserEdit(9));
    }

    #[test]
    fn login_keeps_password_secret() {
        let Ok(Some(Input::Login { email, password })) = parse("login ada@example.com hunter22")
        else {
            panic!("expected login");
        };
        assert_eq!(email, "ada@example.com");
        assert_eq!(password.expose_secret(), "hunter22");
        assert!(!format!("{password:?}").contains("hunter22"));
    }

    #[test]
    fn users_defaults_to_all() {
        let Ok(Some(Input::Users(filter))) = parse("users") else {
            panic!("expected users");
        };
        assert_eq!(filter, UserFilter::default());
    }

    #[test]
    fn users_joins_search_words() {
        let Ok(Some(Input::Users(filter))) =
            parse("users --search grace hopper --role admin --status active")
        else {
            panic!("expected users");
        };
        assert_eq!(filter.search, "grace hopper");
        assert_eq!(filter.role, Some(Role::Admin));
        assert_eq!(filter.active, Some(true));
    }

    #[test]
    fn activities_leaves_missing_dates_empty() {
        let Ok(Some(Input::Activities(filter))) =
            parse("activities --user-id 7 --start-date 2024-01-01")
        else {
            panic!("expected activities");
        };
        assert_eq!(filter.user_id, "7");
        assert!(filter.end_date.is_empty());
    }

    #[test]
    fn delete_requires_numeric_id() {
        assert!(parse("delete seven").is_err());
        let Ok(Some(Input::Delete { id, confirmed })) = parse("delete 7 --yes") else {
            panic!("expected delete");
        };
        assert_eq!(id, 7);
        assert!(confirmed);
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse("fly").is_err());
    }

    #[test]
    fn exit_is_quit() {
        assert!(matches!(parse("exit"), Ok(Some(Input::Quit))));
    }
}
