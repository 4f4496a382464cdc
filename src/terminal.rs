//! Terminal front-end
//!
//! Renders the window controllers with dialoguer prompts. Navigation replaces the current
//! screen with the next one; only one screen is active at a time.

use std::fmt::Display;

use console::style;
use dialoguer::{Confirm, Input, Password, Select};
use sea_orm::{DatabaseConnection, Iterable};

use crate::config::StoreConfig;
use crate::database::dto::{NewRole, SignupData, SortOption, SortOrder};
use crate::entity::enums::{Gender, Genre, Pegi, Platform};
use crate::error::Result;
use crate::ui::admin_shop::AdminShopWindow;
use crate::ui::cart::CartWindow;
use crate::ui::delete_profile::DeleteProfileWindow;
use crate::ui::game_form::GameFormWindow;
use crate::ui::login::LoginWindow;
use crate::ui::menu::MenuWindow;
use crate::ui::review::ReviewWindow;
use crate::ui::shop::ShopWindow;
use crate::ui::signup::SignupWindow;
use crate::ui::{Dialogs, Navigation, Session, Window};
use crate::utils::logs::{LogLevel, get_store_log_level, set_store_log_level};

// ==================== Dialogs ====================

/// Message boxes printed to the terminal
#[derive(Debug, Default)]
pub struct TerminalDialogs;

impl Dialogs for TerminalDialogs {
    fn info(&mut self, title: &str, message: &str) {
        println!("{} {}", style(format!("[{}]", title)).green().bold(), message);
    }

    fn error(&mut self, title: &str, message: &str) {
        eprintln!("{} {}", style(format!("[{}]", title)).red().bold(), message);
    }

    fn confirm(&mut self, title: &str, question: &str) -> bool {
        let prompt = format!("{} {}", style(format!("[{}]", title)).yellow().bold(), question);
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("confirmation prompt failed: {}", e);
                false
            }
        }
    }
}

// ==================== Prompt helpers ====================

fn heading(title: &str) {
    println!();
    println!("{}", style(title).cyan().bold());
}

fn choose(prompt: &str, items: &[&str]) -> Result<usize> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?)
}

/// Row picker; Esc or `q` returns `None`
fn pick_row(prompt: &str, rows: &[String]) -> Result<Option<usize>> {
    if rows.is_empty() {
        return Ok(None);
    }
    Ok(Select::new()
        .with_prompt(prompt)
        .items(rows)
        .default(0)
        .interact_opt()?)
}

fn text(prompt: &str, initial: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?)
}

fn secret(prompt: &str) -> Result<String> {
    Ok(Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?)
}

fn choose_value<T: Copy + PartialEq + Display>(prompt: &str, values: &[T], current: T) -> Result<T> {
    let labels: Vec<String> = values.iter().map(ToString::to_string).collect();
    let default = values.iter().position(|v| *v == current).unwrap_or(0);
    let index = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(values[index])
}

/// Like [`choose_value`] with an extra "Any" entry mapping to `None`
fn choose_optional<T: Copy + PartialEq + Display>(
    prompt: &str,
    values: &[T],
    current: Option<T>,
) -> Result<Option<T>> {
    let mut labels = vec!["Any".to_string()];
    labels.extend(values.iter().map(ToString::to_string));
    let default = current
        .and_then(|c| values.iter().position(|v| *v == c))
        .map_or(0, |i| i + 1);
    let index = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(index.checked_sub(1).map(|i| values[i]))
}

fn print_rows(rows: &[String], empty: &str) {
    if rows.is_empty() {
        println!("  {}", style(empty).dim());
    }
    for row in rows {
        println!("  {}", row);
    }
}

fn is_stay(nav: &Navigation) -> bool {
    matches!(nav, Navigation::Stay)
}

// ==================== Shell ====================

/// Runs the window loop until the user exits
pub async fn run_shell(db: &DatabaseConnection, config: &StoreConfig) -> Result<()> {
    let mut dialogs = TerminalDialogs;
    let mut session: Option<Session> = None;
    let mut window = Window::Login;

    println!("{}", style("Game Store").magenta().bold());

    loop {
        let nav = match (window, session.as_mut()) {
            (Window::Login, _) => login_screen(db, &mut dialogs).await?,
            (Window::Signup, _) => signup_screen(db, &mut dialogs).await?,
            (_, None) => Navigation::Open(Window::Login),
            (Window::Menu, Some(session)) => menu_screen(db, &mut dialogs, session, config).await?,
            (Window::Shop, Some(session)) => shop_screen(db, &mut dialogs, session).await?,
            (Window::Cart, Some(session)) => cart_screen(db, &mut dialogs, session).await?,
            (Window::Review(game_id), Some(session)) => {
                review_screen(db, &mut dialogs, session, game_id).await?
            }
            (Window::AdminShop, Some(session)) => {
                admin_shop_screen(db, &mut dialogs, session).await?
            }
            (Window::GameForm(game_id), Some(session)) => {
                game_form_screen(db, &mut dialogs, session, game_id).await?
            }
            (Window::DeleteProfile, Some(session)) => {
                delete_profile_screen(db, &mut dialogs, session).await?
            }
        };

        match nav {
            Navigation::Stay => {}
            Navigation::Open(next) => window = next,
            Navigation::LoggedIn(account) => {
                log::info!("session started for {}", account.username());
                session = Some(Session::new(account));
                window = Window::Menu;
            }
            Navigation::LoggedOut => {
                if let Some(ended) = session.take() {
                    log::info!("session ended for {}", ended.account.username());
                }
                window = Window::Login;
            }
            Navigation::Quit => break,
        }
    }

    println!("{}", style("Bye!").magenta());
    Ok(())
}

// ==================== Screens ====================

async fn login_screen(db: &DatabaseConnection, dialogs: &mut TerminalDialogs) -> Result<Navigation> {
    let mut window = LoginWindow::new();
    loop {
        heading("Login");
        let nav = match choose("Choose an action", &["Log in", "Sign up", "Exit"])? {
            0 => {
                window.username = text("Username", &window.username)?;
                window.password = secret("Password")?;
                window.on_login(db, dialogs).await
            }
            1 => window.on_signup(),
            _ => window.on_exit(),
        };
        if !is_stay(&nav) {
            return Ok(nav);
        }
    }
}

async fn signup_screen(db: &DatabaseConnection, dialogs: &mut TerminalDialogs) -> Result<Navigation> {
    let mut window = SignupWindow::new();
    loop {
        heading("Sign up");
        window.username = text("Username", &window.username)?;
        window.password = secret("Password")?;
        window.password_confirmation = secret("Repeat password")?;
        window.email = text("Email", &window.email)?;
        window.name = text("Name", &window.name)?;
        window.surname = text("Surname", &window.surname)?;
        window.telephone = text("Telephone", &window.telephone)?;
        let genders: Vec<Gender> = Gender::iter().collect();
        window.gender = choose_value("Gender", &genders, window.gender)?;
        window.card_number = text("Card number", &window.card_number)?;

        let nav = match choose("Choose an action", &["Create account", "Edit again", "Cancel"])? {
            0 => window.on_submit(db, dialogs).await,
            1 => Navigation::Stay,
            _ => window.on_cancel(),
        };
        if !is_stay(&nav) {
            return Ok(nav);
        }
    }
}

#[derive(Clone, Copy)]
enum MenuAction {
    Shop,
    Cart,
    Orders,
    EditProfile,
    ChangePassword,
    DeleteProfile,
    CreateAdmin,
    Backup,
    LogLevel,
    Logout,
    Exit,
}

async fn menu_screen(
    db: &DatabaseConnection,
    dialogs: &mut TerminalDialogs,
    session: &mut Session,
    config: &StoreConfig,
) -> Result<Navigation> {
    let mut window = MenuWindow::new(session);
    let actions: &[(&str, MenuAction)] = if session.account.is_admin() {
        &[
            ("Manage catalog", MenuAction::Shop),
            ("Edit profile", MenuAction::EditProfile),
            ("Change password", MenuAction::ChangePassword),
            ("Delete profiles", MenuAction::DeleteProfile),
            ("Add administrator", MenuAction::CreateAdmin),
            ("Back up database", MenuAction::Backup),
            ("Log level", MenuAction::LogLevel),
            ("Log out", MenuAction::Logout),
            ("Exit", MenuAction::Exit),
        ]
    } else {
        &[
            ("Shop", MenuAction::Shop),
            ("Cart", MenuAction::Cart),
            ("Order history", MenuAction::Orders),
            ("Edit profile", MenuAction::EditProfile),
            ("Change password", MenuAction::ChangePassword),
            ("Delete my account", MenuAction::DeleteProfile),
            ("Log out", MenuAction::Logout),
            ("Exit", MenuAction::Exit),
        ]
    };
    let labels: Vec<&str> = actions.iter().map(|(label, _)| *label).collect();

    loop {
        heading(&format!("Menu | {}", window.greeting(session)));
        let nav = match actions[choose("Choose an action", &labels)?].1 {
            MenuAction::Shop => window.on_shop(session),
            MenuAction::Cart => window.on_cart(session, dialogs),
            MenuAction::Orders => {
                let rows = window.order_history(db, session, dialogs).await;
                print_rows(&rows, "No orders yet");
                Navigation::Stay
            }
            MenuAction::EditProfile => {
                edit_profile_form(&mut window)?;
                if dialogs.confirm("Profile", "Save these changes?") {
                    window.on_save_profile(db, session, dialogs).await
                } else {
                    window.on_discard();
                    Navigation::Stay
                }
            }
            MenuAction::ChangePassword => {
                let current = secret("Current password")?;
                let new = secret("New password")?;
                let confirmation = secret("Repeat new password")?;
                window
                    .on_change_password(db, session, dialogs, &current, &new, &confirmation)
                    .await
            }
            MenuAction::DeleteProfile => window.on_delete_profile(),
            MenuAction::CreateAdmin => {
                let data = admin_form()?;
                window.on_create_admin(db, session, dialogs, data).await
            }
            MenuAction::Backup => {
                window
                    .on_backup(db, session, dialogs, &config.backup_dir)
                    .await
            }
            MenuAction::LogLevel => {
                let levels: Vec<LogLevel> = vec![
                    LogLevel::Error,
                    LogLevel::Warn,
                    LogLevel::Info,
                    LogLevel::Debug,
                    LogLevel::Trace,
                    LogLevel::Off,
                ];
                let labels: Vec<String> = levels.iter().map(|l| format!("{:?}", l)).collect();
                let current = get_store_log_level();
                let default = levels.iter().position(|l| *l == current).unwrap_or(0);
                let index = Select::new()
                    .with_prompt("Log level")
                    .items(&labels)
                    .default(default)
                    .interact()?;
                match set_store_log_level(&labels[index]) {
                    Ok(()) => dialogs.info("Log level", &format!("Log level set to {}", labels[index])),
                    Err(e) => dialogs.error("Log level", &e),
                }
                Navigation::Stay
            }
            MenuAction::Logout => window.on_logout(dialogs, session),
            MenuAction::Exit => Navigation::Quit,
        };
        if !is_stay(&nav) {
            return Ok(nav);
        }
    }
}

fn admin_form() -> Result<SignupData> {
    let username = text("Username", "")?;
    let password = secret("Password")?;
    let password_confirmation = secret("Repeat password")?;
    Ok(SignupData {
        username,
        password,
        password_confirmation,
        email: text("Email", "")?,
        name: text("Name", "")?,
        surname: text("Surname", "")?,
        telephone: text("Telephone", "")?,
        role: NewRole::Admin {
            current_account: text("Current account", "")?,
        },
    })
}

fn edit_profile_form(window: &mut MenuWindow) -> Result<()> {
    let form = &mut window.form;
    form.email = text("Email", &form.email)?;
    form.name = text("Name", &form.name)?;
    form.surname = text("Surname", &form.surname)?;
    form.telephone = text("Telephone", &form.telephone)?;
    match form.gender {
        Some(gender) => {
            let genders: Vec<Gender> = Gender::iter().collect();
            form.gender = Some(choose_value("Gender", &genders, gender)?);
            form.card_number = text("Card number", &form.card_number)?;
        }
        None => form.current_account = text("Current account", &form.current_account)?,
    }
    Ok(())
}

fn edit_filter(window: &mut ShopWindow) -> Result<()> {
    let name = text("Name contains", window.filter.name.as_deref().unwrap_or_default())?;
    window.filter.name = Some(name).filter(|n| !n.trim().is_empty());
    let genres: Vec<Genre> = Genre::iter().collect();
    window.filter.genre = choose_optional("Genre", &genres, window.filter.genre)?;
    let platforms: Vec<Platform> = Platform::iter().collect();
    window.filter.platform = choose_optional("Platform", &platforms, window.filter.platform)?;
    let ratings: Vec<Pegi> = Pegi::iter().collect();
    window.filter.max_pegi = choose_optional("Maximum PEGI", &ratings, window.filter.max_pegi)?;
    window.filter.in_stock_only = Confirm::new()
        .with_prompt("Only games in stock?")
        .default(window.filter.in_stock_only)
        .interact()?;
    Ok(())
}

async fn shop_screen(
    db: &DatabaseConnection,
    dialogs: &mut TerminalDialogs,
    session: &mut Session,
) -> Result<Navigation> {
    let mut window = ShopWindow::new();
    window.refresh(db, dialogs).await;

    loop {
        heading(&format!(
            "Shop | {} item(s) in cart",
            session.cart.total_items()
        ));
        print_rows(&window.rows(), "No games match the filter");
        if let Some(game) = window.selected() {
            println!("  {} {}", style("Selected:").bold(), game.name);
        }

        let actions = [
            "Select game",
            "Add to cart",
            "Reviews",
            "Search / filter",
            "Sort",
            "Open cart",
            "Back",
        ];
        let nav = match choose("Choose an action", &actions)? {
            0 => {
                if let Some(index) = pick_row("Game", &window.rows())? {
                    let id = window.games()[index].id;
                    window.select(id);
                }
                Navigation::Stay
            }
            1 => {
                window.quantity = text("Quantity", &window.quantity)?;
                window.on_add_to_cart(session, dialogs)
            }
            2 => window.on_review(dialogs),
            3 => {
                edit_filter(&mut window)?;
                window.refresh(db, dialogs).await;
                Navigation::Stay
            }
            4 => {
                let options = [
                    SortOption::Name,
                    SortOption::Price,
                    SortOption::ReleaseDate,
                    SortOption::Addtime,
                ];
                let labels = ["Name", "Price", "Release date", "Newest"];
                window.sort_option = options[choose("Sort by", &labels)?];
                window.sort_order = match choose("Order", &["Ascending", "Descending"])? {
                    0 => SortOrder::Asc,
                    _ => SortOrder::Desc,
                };
                window.refresh(db, dialogs).await;
                Navigation::Stay
            }
            5 => window.on_open_cart(),
            _ => window.on_back(),
        };
        if !is_stay(&nav) {
            return Ok(nav);
        }
    }
}

async fn cart_screen(
    db: &DatabaseConnection,
    dialogs: &mut TerminalDialogs,
    session: &mut Session,
) -> Result<Navigation> {
    let mut window = CartWindow::new();

    loop {
        heading(&format!("Cart | {}", window.summary(&session.cart)));
        let rows = window.rows(session);
        print_rows(&rows, "Your cart is empty");

        let actions = [
            "Select line",
            "Increment",
            "Decrement",
            "Remove",
            "Checkout",
            "Back",
        ];
        let nav = match choose("Choose an action", &actions)? {
            0 => {
                if let Some(index) = pick_row("Line", &rows)? {
                    let id = session.cart.lines()[index].game_id;
                    window.select(&session.cart, id);
                }
                Navigation::Stay
            }
            1 => {
                window.on_increment(&mut session.cart, dialogs);
                Navigation::Stay
            }
            2 => {
                window.on_decrement(&mut session.cart, dialogs);
                Navigation::Stay
            }
            3 => {
                window.on_remove(&mut session.cart, dialogs);
                Navigation::Stay
            }
            4 => window.on_checkout(db, &mut session.cart, dialogs).await,
            _ => window.on_back(),
        };
        if !is_stay(&nav) {
            return Ok(nav);
        }
    }
}

async fn review_screen(
    db: &DatabaseConnection,
    dialogs: &mut TerminalDialogs,
    session: &mut Session,
    game_id: i32,
) -> Result<Navigation> {
    let mut window = match ReviewWindow::open(db, session, game_id).await {
        Ok(window) => window,
        Err(e) => {
            dialogs.error("Reviews", &e.to_string());
            return Ok(Navigation::Open(Window::Shop));
        }
    };

    loop {
        heading(&window.header());
        print_rows(&window.rows(), "Be the first to review this game");

        let mut actions = vec!["Back"];
        if window.can_submit() {
            actions.insert(0, "Write a review");
        }
        let nav = match actions[choose("Choose an action", &actions)?] {
            "Write a review" => {
                window.rating = text("Rating (0-5, steps of 0.5)", &window.rating)?;
                window.comment = text("Comment", &window.comment)?;
                window.on_submit(db, session, dialogs).await
            }
            _ => window.on_back(),
        };
        if !is_stay(&nav) {
            return Ok(nav);
        }
    }
}

async fn admin_shop_screen(
    db: &DatabaseConnection,
    dialogs: &mut TerminalDialogs,
    session: &mut Session,
) -> Result<Navigation> {
    let mut window = AdminShopWindow::new();
    window.refresh(db, dialogs).await;

    loop {
        heading(&format!("Catalog | {} game(s)", window.games().len()));
        let rows = window.rows();
        print_rows(&rows, "The catalog is empty");

        let actions = [
            "Select game",
            "Add game",
            "Modify game",
            "Delete game",
            "Search",
            "Back",
        ];
        let nav = match choose("Choose an action", &actions)? {
            0 => {
                if let Some(index) = pick_row("Game", &rows)? {
                    let id = window.games()[index].id;
                    window.select(id);
                }
                Navigation::Stay
            }
            1 => window.on_add(),
            2 => window.on_modify(dialogs),
            3 => window.on_delete(db, session, dialogs).await,
            4 => {
                let name = text("Name contains", window.filter.name.as_deref().unwrap_or_default())?;
                window.filter.name = Some(name).filter(|n| !n.trim().is_empty());
                window.refresh(db, dialogs).await;
                Navigation::Stay
            }
            _ => window.on_back(),
        };
        if !is_stay(&nav) {
            return Ok(nav);
        }
    }
}

async fn game_form_screen(
    db: &DatabaseConnection,
    dialogs: &mut TerminalDialogs,
    session: &mut Session,
    game_id: Option<i32>,
) -> Result<Navigation> {
    let mut window = match game_id {
        Some(id) => match GameFormWindow::edit(db, id).await {
            Ok(window) => window,
            Err(e) => {
                dialogs.error("Modify game", &e.to_string());
                return Ok(Navigation::Open(Window::AdminShop));
            }
        },
        None => GameFormWindow::new(),
    };

    loop {
        heading(window.title());
        window.name = text("Name", &window.name)?;
        window.company_name = text("Company", &window.company_name)?;
        let genres: Vec<Genre> = Genre::iter().collect();
        window.genre = choose_value("Genre", &genres, window.genre)?;
        let platforms: Vec<Platform> = Platform::iter().collect();
        window.platform = choose_value("Platform", &platforms, window.platform)?;
        let ratings: Vec<Pegi> = Pegi::iter().collect();
        window.pegi = choose_value("PEGI", &ratings, window.pegi)?;
        window.price = text("Price", &window.price)?;
        window.stock = text("Stock", &window.stock)?;
        window.release_date = text("Release date (YYYY-MM-DD)", &window.release_date)?;

        let nav = match choose("Choose an action", &["Save", "Edit again", "Cancel"])? {
            0 => window.on_save(db, session, dialogs).await,
            1 => Navigation::Stay,
            _ => window.on_cancel(),
        };
        if !is_stay(&nav) {
            return Ok(nav);
        }
    }
}

async fn delete_profile_screen(
    db: &DatabaseConnection,
    dialogs: &mut TerminalDialogs,
    session: &mut Session,
) -> Result<Navigation> {
    let mut window = DeleteProfileWindow::new();
    window.refresh(db, session, dialogs).await;

    loop {
        let nav = if session.account.is_admin() {
            heading("Delete profiles");
            let rows = window.rows();
            print_rows(&rows, "No profiles");
            match choose("Choose an action", &["Select profile", "Delete", "Back"])? {
                0 => {
                    if let Some(index) = pick_row("Profile", &rows)? {
                        let id = window.accounts()[index].id();
                        window.select(id);
                    }
                    Navigation::Stay
                }
                1 => window.on_delete(db, session, dialogs).await,
                _ => window.on_back(),
            }
        } else {
            heading("Delete my account");
            match choose("Choose an action", &["Delete my account", "Back"])? {
                0 => window.on_delete(db, session, dialogs).await,
                _ => window.on_back(),
            }
        };
        if !is_stay(&nav) {
            return Ok(nav);
        }
    }
}
