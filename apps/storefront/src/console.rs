//! Line-oriented terminal surface for the storefront.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::domain::{ColorFilter, ProductId};
use storefront_core::{Notifier, Redraw, Storefront};
use tracing::{debug, error};

pub const HELP: &str = "\
commands:
  list                   show the product cards
  colors                 show filter options
  filter <color|all>     change the color filter (empties the cart)
  qty <id> <quantity>    set a product quantity
  cart                   show the cart summary
  name <text>            set the customer name
  location <text>        set the delivery location
  order                  place the order
  banner                 show the status banner
  help                   show this help
  quit                   exit";

/// One REPL line, parsed with the same derive machinery as the binary's flags.
#[derive(Parser, Debug)]
#[command(
    name = "storefront",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(alias = "ls")]
    List,
    Colors,
    Filter {
        #[arg(required = true)]
        color: Vec<String>,
    },
    #[command(alias = "quantity")]
    Qty {
        id: String,
        #[arg(allow_hyphen_values = true)]
        quantity: Option<String>,
    },
    Cart,
    Name {
        #[arg(allow_hyphen_values = true)]
        text: Vec<String>,
    },
    Location {
        #[arg(allow_hyphen_values = true)]
        text: Vec<String>,
    },
    #[command(alias = "submit")]
    Order,
    Banner,
    #[command(alias = "?")]
    Help,
    #[command(alias = "exit")]
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, clap::Error> {
    ReplLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
}

fn write_prompt(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "\n{}\n[press Enter to continue]", message.trim_end())?;
    out.flush()
}

/// Prints the message and blocks until the user presses Enter.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        if let Err(err) = write_prompt(&mut io::stdout().lock(), message) {
            debug!("console: alert write failed: {err}");
        }

        let mut ack = String::new();
        if let Err(err) = io::stdin().lock().read_line(&mut ack) {
            debug!("console: acknowledgment read failed: {err}");
        }
    }
}

pub fn redraw(out: &mut impl Write, storefront: &Storefront, what: Redraw) -> io::Result<()> {
    if what == Redraw::All {
        let view = storefront.catalog_view();
        write!(out, "{view}")?;
        if matches!(&view, storefront_core::CatalogView::Cards(cards) if cards.is_empty()) {
            writeln!(out, "(no flowers to show)")?;
        }
        writeln!(out)?;
    }

    match storefront.cart_summary() {
        Ok(summary) => write!(out, "{summary}")?,
        Err(err) => {
            error!("cart: {err}");
            writeln!(out, "cart unavailable: {err}")?;
        }
    }
    Ok(())
}

pub fn run(storefront: &mut Storefront, notifier: &dyn Notifier) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                write!(stdout, "{}", err.render())?;
                writeln!(stdout, "type `help` for the list of commands")?;
                continue;
            }
        };
        if !dispatch(&mut stdout, storefront, notifier, command)? {
            return Ok(());
        }

        if let Some(message) = storefront.banner().message() {
            writeln!(stdout, "** {message} **")?;
        }
    }
}

/// Applies one command. Returns `false` when the session should end.
pub fn dispatch(
    out: &mut impl Write,
    storefront: &mut Storefront,
    notifier: &dyn Notifier,
    command: Command,
) -> Result<bool> {
    match command {
        Command::List => redraw(out, storefront, Redraw::All)?,
        Command::Colors => writeln!(out, "{}", storefront.filter_options().join(", "))?,
        Command::Filter { color } => {
            let filter: ColorFilter = color.join(" ").parse()?;
            let what = storefront.change_filter(filter);
            redraw(out, storefront, what)?;
        }
        Command::Qty { id, quantity } => {
            let id = ProductId::from(id.as_str());
            match storefront.set_quantity(&id, quantity.as_deref().unwrap_or_default()) {
                Ok(what) => redraw(out, storefront, what)?,
                Err(err) => writeln!(out, "{err}")?,
            }
        }
        Command::Cart => redraw(out, storefront, Redraw::CartSummary)?,
        Command::Name { text } => storefront.set_customer_name(text.join(" ")),
        Command::Location { text } => storefront.set_customer_location(text.join(" ")),
        Command::Order => {
            if storefront.submit_order(notifier).is_ok() {
                redraw(out, storefront, Redraw::CartSummary)?;
            }
        }
        Command::Banner => match storefront.banner().message() {
            Some(message) => writeln!(out, "{message}")?,
            None => writeln!(out, "(no banner)")?,
        },
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}
