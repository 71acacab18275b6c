//! Interactive console over the session subsystem and the admin client.
//! Stands in for the UI layer: it drives login/logout, inspects session
//! state and exercises the admin CRUD endpoints against a running backend.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use serde_json::Value;

use crate::admin::{AdminService, UserFilters};
use crate::session::guard::{decide, RouteDecision};
use crate::session::models::Role;
use crate::session::store::SessionStore;

fn print_help() {
    println!(
        "Commands:\n  \
         login <user> <password>     sign in with username or email\n  \
         me                          show the current profile\n  \
         refresh                     re-fetch the current profile\n  \
         status                      session state and route decisions\n  \
         users [search]              list users (admin)\n  \
         user <id>                   show one user (admin)\n  \
         toggle <id>                 flip a user's active flag (admin)\n  \
         roles                       list available roles (admin)\n  \
         logout                      sign out\n  \
         help                        this help\n  \
         quit | exit                 leave"
    );
}

fn print_user(v: &Value) {
    match serde_json::to_string_pretty(v) {
        Ok(s) => println!("{}", s),
        Err(_) => println!("{}", v),
    }
}

pub async fn run(store: Arc<SessionStore>, admin: AdminService) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    println!("aulanet console. Type 'help' for commands.");
    loop {
        input.clear();
        print!("> ");
        let _ = stdout.flush();
        if stdin.lock().read_line(&mut input).is_err() {
            break;
        }
        if input.is_empty() {
            // EOF
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_ascii_lowercase();
        match cmd.as_str() {
            "quit" | "exit" => break,
            "help" => print_help(),
            "login" => {
                let (Some(user), Some(pass)) = (parts.next(), parts.next()) else {
                    eprintln!("usage: login <user> <password>");
                    continue;
                };
                match store.login(user, pass).await {
                    Ok(profile) => {
                        let dashboard = profile
                            .role()
                            .map(|r| r.dashboard_path())
                            .unwrap_or("/");
                        println!("signed in as {} ({}) -> {}", profile.username, profile.role.name, dashboard);
                    }
                    Err(err) => eprintln!("login failed: {}", err),
                }
            }
            "logout" => {
                store.logout().await;
                println!("signed out");
            }
            "me" => match store.state().user {
                Some(user) => print_user(&serde_json::to_value(&user).unwrap_or(Value::Null)),
                None => println!("not signed in"),
            },
            "refresh" => {
                if store.refresh_user().await {
                    println!("profile refreshed");
                } else {
                    eprintln!("could not refresh profile");
                }
            }
            "status" => {
                let state = store.state();
                println!(
                    "authenticated={} loading={} role={:?} error={:?}",
                    state.is_authenticated(),
                    state.loading,
                    state.role().map(|r| r.as_str()),
                    state.error
                );
                for role in [Role::Admin, Role::Estudiante, Role::Empresa] {
                    let decision = decide(&state, &[role]);
                    let verdict = match &decision {
                        RouteDecision::Pending => "pending".to_string(),
                        RouteDecision::Admit => "admit".to_string(),
                        RouteDecision::Redirect(to) => format!("redirect {}", to),
                    };
                    println!("  {} -> {}", role.dashboard_path(), verdict);
                }
            }
            "users" => {
                let filters = UserFilters {
                    search: parts.next().map(str::to_string),
                    ..Default::default()
                };
                match admin.list(&filters).await {
                    Ok(page) => {
                        println!("{} users (showing {})", page.count, page.results.len());
                        for u in &page.results {
                            println!(
                                "  [{}] {} <{}> {} active={}",
                                u.id, u.username, u.email, u.role.name, u.is_active
                            );
                        }
                    }
                    Err(err) => eprintln!("list failed: {}", err),
                }
            }
            "user" => {
                let Some(id) = parts.next().and_then(|s| s.parse::<i64>().ok()) else {
                    eprintln!("usage: user <id>");
                    continue;
                };
                match admin.get(id).await {
                    Ok(user) => print_user(&serde_json::to_value(&user).unwrap_or(Value::Null)),
                    Err(err) => eprintln!("fetch failed: {}", err),
                }
            }
            "toggle" => {
                let Some(id) = parts.next().and_then(|s| s.parse::<i64>().ok()) else {
                    eprintln!("usage: toggle <id>");
                    continue;
                };
                match admin.toggle_active(id).await {
                    Ok(out) => println!("is_active={} {}", out.is_active, out.message),
                    Err(err) => eprintln!("toggle failed: {}", err),
                }
            }
            "roles" => match admin.roles().await {
                Ok(roles) => {
                    for r in &roles {
                        println!("  {} (id={:?})", r.name, r.id);
                    }
                }
                Err(err) => eprintln!("roles failed: {}", err),
            },
            other => eprintln!("unknown command '{}'; type 'help'", other),
        }
    }
    Ok(())
}
