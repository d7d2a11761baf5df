use super::Console;
use super::command::Cli;
use crate::domain::contact::{Contact, ContactField, capitalize, normalize};
use crate::domain::{Command, ContactManager, Listing};
use crate::errors::AppError;
use crate::store::{self, ContactStore, StorageMediums};
use std::io::{self, BufRead, Write};

const ID_RETRY: &str = "ID must be a number. Please try again.";
const AGE_RETRY: &str = "Age must be a number. Please try again.";

/// Opens the configured store and runs the menu on stdin/stdout.
pub fn run_app(cli: &Cli) -> Result<(), AppError> {
    let medium = StorageMediums::from(&cli.storage_choice)?;
    let storage = store::open_store(medium, &cli.json_path, &cli.sqlite_path)?;
    let mut manager = ContactManager::new(storage);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    console.say(format!(
        "Current storage choice is: {}",
        manager.medium()
    ))?;

    run_menu(&mut manager, &mut console)
}

/// Runs the menu loop until option 0 or end of input.
pub fn run_menu<S, R, W>(
    manager: &mut ContactManager<S>,
    console: &mut Console<R, W>,
) -> Result<(), AppError>
where
    S: ContactStore,
    R: BufRead,
    W: Write,
{
    loop {
        show_menu(console)?;

        let input = match console.prompt("Select option> ") {
            Ok(input) => input,
            Err(AppError::InputClosed) => break,
            Err(e) => return Err(e),
        };

        let command = match parse_command(&input) {
            Ok(command) => command,
            Err(AppError::ParseInt(_)) => {
                console.say("*** The option must be a number. Please try again. ***")?;
                continue;
            }
            Err(_) => {
                console.say("*** Not a valid option. Please try again. ***")?;
                continue;
            }
        };

        let outcome = match command {
            Command::Exit => break,
            Command::Create => create_contact(manager, console),
            Command::Search => search_one(manager, console),
            Command::ShowAll => show_all(manager, console),
            Command::Update => update(manager, console),
            Command::Delete => delete(manager, console),
        };

        match outcome {
            Ok(()) => {}
            Err(AppError::InputClosed) => break,
            Err(e) => report(console, &e)?,
        }
    }

    console.say("Thanks for using this app! Cya!")
}

pub fn parse_command(input: &str) -> Result<Command, AppError> {
    let option = input.trim().parse::<i64>()?;
    Command::from_option(option).ok_or_else(|| AppError::ParseCommand(input.trim().to_string()))
}

fn show_menu<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<(), AppError> {
    console.say("Menu:")?;
    console.say("  0. Exit")?;
    console.say("  1. Create")?;
    console.say("  2. Search")?;
    console.say("  3. Show All")?;
    console.say("  4. Update")?;
    console.say("  5. Delete")
}

// Failures of a single operation are reported and the menu carries on.
fn report<R: BufRead, W: Write>(console: &mut Console<R, W>, err: &AppError) -> Result<(), AppError> {
    match err {
        AppError::NotFound(name) => {
            console.say(format!("Contact {name} not found, please try again."))
        }
        AppError::DuplicateIdentifier(id) => console.say(format!(
            "The id {id} already exists, please enter an unique ID."
        )),
        other => {
            tracing::error!(error = %other, "operation failed");
            console.say(format!("Error: {other}"))
        }
    }
}

fn create_contact<S, R, W>(
    manager: &mut ContactManager<S>,
    console: &mut Console<R, W>,
) -> Result<(), AppError>
where
    S: ContactStore,
    R: BufRead,
    W: Write,
{
    let id = console.prompt_int("Enter ID: ", ID_RETRY)?;
    let name = console.prompt("Enter name: ")?;
    let age = console.prompt_int("Enter age: ", AGE_RETRY)?;
    let phone = console.prompt("Enter phone number: ")?;
    let email = console.prompt("Enter email: ")?;

    let result = manager.insert(&Contact::new(id, &name, age, &phone, &email))?;

    if result.acknowledged {
        console.say(format!("Successfully created with id: {}", result.inserted_id))
    } else {
        console.say("Insert not acknowledged.")
    }
}

fn search_one<S, R, W>(
    manager: &ContactManager<S>,
    console: &mut Console<R, W>,
) -> Result<(), AppError>
where
    S: ContactStore,
    R: BufRead,
    W: Write,
{
    let name = console.prompt("Enter name to search: ")?;

    match manager.find_by_name(&name)? {
        Some(contact) => console.say_framed(contact),
        None => Err(AppError::NotFound(capitalize(&normalize(&name)))),
    }
}

fn show_all<S, R, W>(
    manager: &ContactManager<S>,
    console: &mut Console<R, W>,
) -> Result<(), AppError>
where
    S: ContactStore,
    R: BufRead,
    W: Write,
{
    match manager.find_all()? {
        Listing::Empty => console.say_framed("No data found."),
        Listing::Contacts(cursor) => {
            for contact in cursor {
                console.say(super::SEPARATOR)?;
                console.say(contact?)?;
            }
            console.say(super::SEPARATOR)
        }
    }
}

/// Looks a contact up by name. When several share the name the user picks one by id.
fn select_contact<S, R, W>(
    manager: &ContactManager<S>,
    console: &mut Console<R, W>,
    prompt: &str,
) -> Result<Option<Contact>, AppError>
where
    S: ContactStore,
    R: BufRead,
    W: Write,
{
    let name = console.prompt(prompt)?;
    let display_name = capitalize(&normalize(&name));
    let mut matches = manager.find_all_by_name(&name)?;

    match matches.len() {
        0 => Err(AppError::NotFound(display_name)),
        1 => Ok(matches.pop()),
        n => {
            console.say(format!("Found {n} contacts named {display_name}:"))?;
            for contact in &matches {
                console.say(super::SEPARATOR)?;
                console.say(contact)?;
            }
            console.say(super::SEPARATOR)?;

            let id = console.prompt_int("Enter the ID of the contact: ", ID_RETRY)?;
            match matches.into_iter().find(|c| c.id == id) {
                Some(contact) => Ok(Some(contact)),
                None => {
                    console.say(format!("No contact named {display_name} has id {id}."))?;
                    Ok(None)
                }
            }
        }
    }
}

fn update<S, R, W>(
    manager: &mut ContactManager<S>,
    console: &mut Console<R, W>,
) -> Result<(), AppError>
where
    S: ContactStore,
    R: BufRead,
    W: Write,
{
    let Some(contact) = select_contact(manager, console, "Enter name to search: ")? else {
        return Ok(());
    };
    console.say_framed(&contact)?;

    let field = console.retry(
        "What field do you want to update? ",
        |input| input.parse::<ContactField>(),
        |err| match err {
            AppError::ImmutableField(_) => "You can't modify the ID. (It's immutable!)".to_string(),
            AppError::UnknownField(field) => format!("Field {field} does not exist."),
            other => other.to_string(),
        },
    )?;

    let update = console.retry(
        "Enter the value: ",
        |input| field.parse_value(input),
        |_| AGE_RETRY.to_string(),
    )?;

    let result = manager.update_field(contact.id, &update)?;

    if result.acknowledged {
        console.say(format!(
            "Successfully updated. [{}] [{}]",
            result.matched_count, result.modified_count
        ))
    } else {
        console.say("Update not acknowledged.")
    }
}

fn delete<S, R, W>(
    manager: &mut ContactManager<S>,
    console: &mut Console<R, W>,
) -> Result<(), AppError>
where
    S: ContactStore,
    R: BufRead,
    W: Write,
{
    let Some(contact) = select_contact(manager, console, "Enter name to delete: ")? else {
        return Ok(());
    };
    console.say_framed(&contact)?;

    if !console.confirm("Are you sure you want to delete this contact? (Y/N) > ")? {
        return console.say("Deletion cancelled.");
    }

    let result = manager.delete_by_id(contact.id)?;

    if result.acknowledged {
        console.say("Contact deleted.")
    } else {
        console.say("Delete not acknowledged.")
    }
}
